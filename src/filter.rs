//! Row filtering by a single comparison clause.

use bitvec::prelude::*;

use crate::ast::{ComparisonOp, Condition, Expr};
use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::row::Row;
use crate::table::{Schema, Table};
use crate::value::Value;

/// Right-hand side of a comparison, resolved against a schema.
enum Operand {
    Column(usize),
    Literal(Value),
}

/// A condition whose columns have been resolved and whose operand types
/// have been checked.
struct Comparison {
    left: usize,
    op: ComparisonOp,
    right: Operand,
    textual: bool,
}

impl Comparison {
    fn resolve(schema: &Schema, condition: &Condition) -> Result<Self> {
        let left = schema.resolve(&condition.column)?;
        let left_type = schema.columns[left].data_type;

        let (right, right_type) = match &condition.right {
            Expr::Column(name) => {
                let idx = schema.resolve(name)?;
                (Operand::Column(idx), Some(schema.columns[idx].data_type))
            }
            Expr::Literal(value) => {
                let data_type = value.as_literal().map(DataType::infer_operand);
                (Operand::Literal(value.clone()), data_type)
            }
            Expr::Binary { .. } => {
                return Err(Error::malformed(format!(
                    "condition operand {} must be a column or a literal",
                    condition.right
                )));
            }
        };

        let textual = left_type == DataType::String;
        if right_type.is_some_and(|t| (t == DataType::String) != textual) {
            return Err(Error::TypeConflict(
                "can't compare string and non-string".into(),
            ));
        }

        Ok(Self {
            left,
            op: condition.op,
            right,
            textual,
        })
    }

    /// Evaluates the comparison for one row. `NOVALUE` on either side never
    /// satisfies a comparison.
    fn matches(&self, row: &Row) -> Result<bool> {
        let lhs = &row.values()[self.left];
        let rhs = match &self.right {
            Operand::Column(idx) => &row.values()[*idx],
            Operand::Literal(value) => value,
        };

        let (Some(l), Some(r)) = (lhs.as_literal(), rhs.as_literal()) else {
            return Ok(false);
        };

        if self.textual {
            return Ok(holds(self.op, l, r));
        }

        Ok(holds(self.op, &to_number(l)?, &to_number(r)?))
    }
}

fn to_number(literal: &str) -> Result<f64> {
    literal
        .trim()
        .parse()
        .map_err(|_| Error::TypeConflict(format!("{literal} is not a number")))
}

fn holds<T: PartialOrd + ?Sized>(op: ComparisonOp, l: &T, r: &T) -> bool {
    match op {
        ComparisonOp::Eq => l == r,
        ComparisonOp::NotEq => l != r,
        ComparisonOp::LtEq => l <= r,
        ComparisonOp::GtEq => l >= r,
        ComparisonOp::Lt => l < r,
        ComparisonOp::Gt => l > r,
    }
}

impl Table {
    /// Keeps the rows satisfying `condition`, in their original order.
    ///
    /// `None` is the identity filter. Strings compare lexicographically;
    /// numeric columns (int and float alike) compare as floating point.
    ///
    /// # Errors
    /// - [Error::ColumnNotFound] if a referenced column does not exist.
    /// - [Error::TypeConflict] if a string is compared with a non-string,
    ///   including a string column against a numeric literal (`s == 1`). The
    ///   check is made against the schema before any row is read, so it fires
    ///   on empty tables too, rather than quietly matching no rows.
    pub fn filter(&self, condition: Option<&Condition>) -> Result<Table> {
        let Some(condition) = condition else {
            return Ok(self.clone());
        };

        let mask = self.selection(condition)?;
        let rows: Vec<Row> = self
            .rows()
            .iter()
            .zip(mask.iter().by_vals())
            .filter_map(|(row, keep)| keep.then(|| row.clone()))
            .collect();

        tracing::debug!(
            column = %condition.column,
            op = %condition.op,
            kept = rows.len(),
            total = self.row_count(),
            "filtered rows"
        );
        Ok(Table::from_parts(self.schema().clone(), rows))
    }

    /// Computes a bitmap where a `true` bit marks a row satisfying `condition`.
    pub fn selection(&self, condition: &Condition) -> Result<BitVec> {
        let comparison = Comparison::resolve(self.schema(), condition)?;

        let mut mask = BitVec::with_capacity(self.row_count());
        for row in self.rows() {
            mask.push(comparison.matches(row)?);
        }
        Ok(mask)
    }
}
