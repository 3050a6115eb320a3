use std::fmt;

use crate::ast::{Condition, Projection};
use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::row::Row;
use crate::value::Value;

/// Column definition in the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)
    }
}

/// Ordered list of columns describing the shape of a table.
///
/// Lookups by name return the first matching column when names repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of the first column called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Like [Schema::position] but reports a missing column as an error.
    pub fn resolve(&self, name: &str) -> Result<usize> {
        self.position(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{column}")?;
        }
        Ok(())
    }
}

/// A schema plus its rows, in insertion order.
///
/// Join, filter and projection never mutate a table: they read their inputs
/// and return a freshly built one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    schema: Schema,
    rows: Vec<Row>,
}

impl Table {
    /// Declares an empty table.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Assembles a table from rows already known to fit `schema`.
    pub(crate) fn from_parts(schema: Schema, rows: Vec<Row>) -> Self {
        Self { schema, rows }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn get_row(&self, row_idx: usize) -> Option<&Row> {
        self.rows.get(row_idx)
    }

    /// Inserts a new row.
    ///
    /// Every literal is classified and checked against the declared type at
    /// its position; `NOVALUE` is exempt. Float literals are stored with
    /// exactly 3 fractional digits.
    ///
    /// # Errors
    /// Returns [Error::SchemaViolation] if the arity differs from the schema or
    /// any literal has the wrong type. The table is left untouched in that case.
    pub fn insert(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.schema.len() {
            return Err(Error::SchemaViolation);
        }

        let mut literals = Vec::with_capacity(values.len());
        for (value, column) in values.into_iter().zip(&self.schema.columns) {
            if value
                .classify()?
                .is_some_and(|t| t != column.data_type)
            {
                return Err(Error::SchemaViolation);
            }
            literals.push(value.normalized(column.data_type));
        }

        self.rows.push(Row::new(literals));
        Ok(())
    }

    /// Filters then projects: the combined select operation.
    pub fn select(
        &self,
        projections: &[Projection],
        condition: Option<&Condition>,
    ) -> Result<Table> {
        self.filter(condition)?.project(projections)
    }

    /// Applies `projections` once per condition clause.
    ///
    /// Each clause runs against the output of the previous (projection,
    /// condition) step, so a later clause only sees the columns and aliases
    /// produced by the step before it. Without clauses the projection runs
    /// once, unfiltered.
    pub fn evaluate(&self, projections: &[Projection], conditions: &[Condition]) -> Result<Table> {
        let Some((first, rest)) = conditions.split_first() else {
            return self.select(projections, None);
        };

        let mut current = self.select(projections, Some(first))?;
        for condition in rest {
            current = current.select(projections, Some(condition))?;
        }
        Ok(current)
    }

    /// Renders the table: the header line `name type,...` followed by one
    /// line per row.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.schema)?;
        for row in &self.rows {
            write!(f, "\n{row}")?;
        }
        Ok(())
    }
}
