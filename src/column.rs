use std::sync::Arc;

use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::value::Value;
use bitvec::prelude::*;

/// One output column of a projection.
///
/// Every projection expression evaluates into one or more columns over the
/// same filtered rows; the columns are then zipped back into rows.
#[derive(Debug, Clone)]
pub struct Column {
    /// The name of the column (the alias for computed columns).
    pub name: String,
    /// The logical data type of the column.
    pub data_type: DataType,
    /// The literal text of each value.
    data: Vec<Arc<str>>,
    /// A bitmap where a `true` bit indicates that the value at that index is `NOVALUE`.
    pub novalue_bitmap: BitVec,
}

impl Column {
    /// Creates a new, empty column with the specified name and data type.
    pub fn new(name: String, data_type: DataType) -> Self {
        Self {
            name,
            data_type,
            data: vec![],
            novalue_bitmap: bitvec!(),
        }
    }

    /// Appends a new value to the end of the column.
    ///
    /// # Errors
    /// Returns an error if the literal's classified type does not match the
    /// column's data type.
    ///
    /// # Behavior
    /// - If the value is `NOVALUE`, an empty placeholder is pushed to the data
    ///   vector to maintain index alignment with the `novalue_bitmap`.
    ///
    /// # Example
    /// ```
    /// # use reldb::{Column, DataType, Value};
    /// let mut col = Column::new("age".into(), DataType::Int);
    /// col.push(Value::parse("30")).unwrap();
    /// col.push(Value::NoValue).unwrap();
    ///
    /// assert_eq!(col.len(), 2);
    /// assert!(col.get(1).unwrap().is_novalue());
    /// ```
    pub fn push(&mut self, value: Value) -> Result<()> {
        match value {
            Value::NoValue => {
                self.novalue_bitmap.push(true);
                self.data.push(Arc::from(""));
            }
            Value::Literal(text) => {
                if DataType::classify(&text) != Some(self.data_type) {
                    return Err(Error::TypeConflict(format!(
                        "value {text} does not fit column {} of type {}",
                        self.name, self.data_type
                    )));
                }
                self.novalue_bitmap.push(false);
                self.data.push(text);
            }
        }
        Ok(())
    }

    /// Returns the number of rows currently stored in the column.
    pub fn len(&self) -> usize {
        self.novalue_bitmap.len()
    }

    /// Returns true if there is no row in the column, else false.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieves the value at the specified row index.
    ///
    /// Returns `None` if the index is out of bounds.
    pub fn get(&self, row_idx: usize) -> Option<Value> {
        (row_idx < self.len()).then(|| self.value(row_idx))
    }

    /// Returns the value at `row_idx`.
    ///
    /// # Panics
    /// Panics if `row_idx` is out of bounds.
    pub fn value(&self, row_idx: usize) -> Value {
        if self.novalue_bitmap[row_idx] {
            return Value::NoValue;
        }
        Value::Literal(Arc::clone(&self.data[row_idx]))
    }
}
