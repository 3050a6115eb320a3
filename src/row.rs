use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// An immutable, fixed-arity tuple of literals.
///
/// Rows never grow in place: joins and projections build new rows out of the
/// literals of their inputs. The literals are shared behind an [Arc], which is
/// safe because nothing can mutate a row once it exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    values: Arc<[Value]>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values: values.into(),
        }
    }

    /// Returns a new row made of `self` followed by `other`.
    pub fn concat(&self, other: &Row) -> Row {
        self.extended(other.values.iter().cloned())
    }

    /// Returns a new row made of `self` followed by the given literals.
    pub fn extended(&self, tail: impl IntoIterator<Item = Value>) -> Row {
        let values: Vec<Value> = self.values.iter().cloned().chain(tail).collect();
        Row::new(values)
    }

    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}
