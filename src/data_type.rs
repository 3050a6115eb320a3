use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Represents the supported data types in a table schema.
/// The type of a column is positional: the literal stored at position `i` of a
/// row is interpreted with the type declared at position `i` of the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// A quoted character string, stored with its quotes (e.g. `'Alice'`).
    String,
    /// A signed integer.
    Int,
    /// A floating-point number, always stored with exactly 3 fractional digits.
    Float,
}

impl DataType {
    /// Classifies a stored literal.
    ///
    /// - contains a `'` quote delimiter: [DataType::String]
    /// - contains a decimal point: [DataType::Float]
    /// - anything else: [DataType::Int]
    ///
    /// Returns `None` when the literal does not actually read as the number its
    /// shape announces (e.g. `abc` or `1.2.3`).
    pub fn classify(literal: &str) -> Option<DataType> {
        if literal.contains('\'') {
            Some(DataType::String)
        } else if literal.contains('.') {
            literal.parse::<f64>().ok().map(|_| DataType::Float)
        } else {
            literal.parse::<i64>().ok().map(|_| DataType::Int)
        }
    }

    /// Infers the type of a literal operand inside an expression or condition.
    ///
    /// Anything that reads as a number is numeric: integral numbers are
    /// [DataType::Int] (so `2.0` is an int), the rest [DataType::Float].
    /// Everything else is a [DataType::String].
    pub fn infer_operand(literal: &str) -> DataType {
        match literal.trim().parse::<f64>() {
            Ok(v) if is_integral(v) => DataType::Int,
            Ok(_) => DataType::Float,
            Err(_) => DataType::String,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Int => "int",
            DataType::Float => "float",
        }
    }
}

pub(crate) fn is_integral(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "string" => Ok(DataType::String),
            "int" => Ok(DataType::Int),
            "float" => Ok(DataType::Float),
            other => Err(Error::malformed(format!("invalid column type {other:?}"))),
        }
    }
}
