use std::fmt;
use std::sync::Arc;

use crate::data_type::DataType;
use crate::error::{Error, Result};

/// The sentinel literal marking an intentionally absent value.
pub const NOVALUE: &str = "NOVALUE";

/// Represents one literal stored in a row.
///
/// Literals keep their exact text (`'Alice'` with its quotes, `007`, `2.500`);
/// their meaning comes from the schema type at the same position. Text is
/// wrapped in an [Arc] so rows can be copied between tables cheaply.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// The `NOVALUE` sentinel, exempt from type checking.
    NoValue,
    /// The textual representation of a scalar value.
    Literal(Arc<str>),
}

impl Value {
    /// Builds a value from raw literal text, recognizing the `NOVALUE` sentinel.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text == NOVALUE {
            Self::NoValue
        } else {
            Self::Literal(Arc::from(text))
        }
    }

    /// Builds a string literal by wrapping `content` in quotes.
    pub fn quoted(content: &str) -> Self {
        Self::Literal(Arc::from(format!("'{content}'")))
    }

    pub fn int(v: i64) -> Self {
        Self::Literal(Arc::from(v.to_string()))
    }

    /// Builds a float literal, re-encoded with exactly 3 fractional digits.
    pub fn float(v: f64) -> Self {
        Self::Literal(Arc::from(format_float(v)))
    }

    /// Returns `true` if the value is [Value::NoValue].
    pub fn is_novalue(&self) -> bool {
        matches!(self, Self::NoValue)
    }

    /// Returns the literal text, or `None` for [Value::NoValue].
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(s) => Some(s),
            Self::NoValue => None,
        }
    }

    /// Reads the literal as an integer.
    pub fn as_int(&self) -> Option<i64> {
        self.as_literal().and_then(|s| s.parse().ok())
    }

    /// Reads the literal as a float; integer literals are accepted too.
    pub fn as_float(&self) -> Option<f64> {
        self.as_literal().and_then(|s| s.parse().ok())
    }

    /// Classifies the literal (see [DataType::classify]).
    ///
    /// Returns `Ok(None)` for [Value::NoValue]. Text with no valid
    /// classification can never match a schema and is a schema violation.
    pub fn classify(&self) -> Result<Option<DataType>> {
        match self {
            Self::NoValue => Ok(None),
            Self::Literal(s) => DataType::classify(s)
                .map(Some)
                .ok_or(Error::SchemaViolation),
        }
    }

    /// Returns the stored form of this value for a column of type `data_type`.
    ///
    /// Floats are re-encoded to 3 fractional digits; everything else is kept.
    /// The operation is idempotent.
    pub fn normalized(self, data_type: DataType) -> Self {
        match (data_type, self.as_float()) {
            (DataType::Float, Some(v)) => Self::float(v),
            _ => self,
        }
    }
}

/// Number of fractional digits of a stored float.
const FLOAT_DIGITS: usize = 3;

/// Formats a float with exactly 3 fractional digits.
///
/// Rounding is half-up (away from zero) on the shortest decimal form of `v`,
/// so `0.0625` becomes `0.063`.
pub fn format_float(v: f64) -> String {
    if !v.is_finite() {
        return format!("{v:.3}");
    }

    let shortest = v.abs().to_string();
    let (int_part, frac_part) = shortest.split_once('.').unwrap_or((shortest.as_str(), ""));

    // every kept digit, integer part first, frac part padded to 3 digits
    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(FLOAT_DIGITS))
        .map(|b| b - b'0')
        .collect();

    if frac_part.as_bytes().get(FLOAT_DIGITS).is_some_and(|&d| d >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
        }
    }

    let split = digits.len() - FLOAT_DIGITS;
    let render = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();
    let sign = if v.is_sign_negative() { "-" } else { "" };
    format!("{sign}{}.{}", render(&digits[..split]), render(&digits[split..]))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoValue => f.write_str(NOVALUE),
            Self::Literal(s) => f.write_str(s),
        }
    }
}
