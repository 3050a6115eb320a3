//! Error types for the relational engine

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure a statement can produce.
///
/// All of them are local to one statement: the catalog is never left holding a
/// half-built table, and the [Database](crate::Database) boundary turns each one
/// into an `ERROR: ` prefixed message.
#[derive(Error, Debug)]
pub enum Error {
    // Request shape
    #[error("Malformed query: {0}")]
    Malformed(String),

    // Unresolved references
    #[error("table {0} does not exist")]
    TableNotFound(String),

    #[error("column {0} does not exist")]
    ColumnNotFound(String),

    // Type conflicts
    #[error("{0}")]
    TypeConflict(String),

    // Arithmetic faults
    #[error("division by zero")]
    DivisionByZero,

    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    // Schema violations
    #[error("row does not match the given table")]
    SchemaViolation,

    // Persisted tables
    #[error("couldn't access table file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Attaches `path` to an I/O error raised on an anonymous stream.
    pub(crate) fn at(self, path: &Path) -> Self {
        match self {
            Self::Io { source, .. } => Self::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}
