//! Projection of a row set through select-list expressions.

use std::sync::Arc;

use crate::ast::{ArithmeticOp, Expr, Projection};
use crate::column::Column;
use crate::data_type::{DataType, is_integral};
use crate::error::{Error, Result};
use crate::row::Row;
use crate::table::{ColumnDef, Schema, Table};
use crate::value::Value;

/// A runtime value inside an arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
enum Scalar {
    NoValue,
    Int(i64),
    Float(f64),
    Text(Arc<str>),
}

impl Scalar {
    /// Reads a stored literal according to its column type.
    fn from_column(value: &Value, data_type: DataType) -> Result<Self> {
        let Some(text) = value.as_literal() else {
            return Ok(Scalar::NoValue);
        };
        let not_a_number = || Error::TypeConflict(format!("{text} is not a number"));
        Ok(match data_type {
            DataType::String => Scalar::Text(Arc::from(text)),
            DataType::Int => Scalar::Int(value.as_int().ok_or_else(not_a_number)?),
            DataType::Float => Scalar::Float(value.as_float().ok_or_else(not_a_number)?),
        })
    }

    /// Reads a literal operand, inferring its type: integral numbers are ints,
    /// other numbers floats, everything else a string.
    fn from_literal(value: &Value) -> (Self, Option<DataType>) {
        let Some(text) = value.as_literal() else {
            return (Scalar::NoValue, None);
        };
        match text.trim().parse::<f64>() {
            Ok(v) if is_integral(v) => (Scalar::Int(v as i64), Some(DataType::Int)),
            Ok(v) => (Scalar::Float(v), Some(DataType::Float)),
            Err(_) => (Scalar::Text(Arc::from(text)), Some(DataType::String)),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Scalar::NoValue => Value::NoValue,
            Scalar::Int(i) => Value::int(i),
            Scalar::Float(f) => Value::float(f),
            Scalar::Text(s) => Value::Literal(s),
        }
    }
}

/// An expression whose column references have been resolved to positions.
enum Node {
    Column { idx: usize, data_type: DataType },
    Literal(Scalar),
    Binary {
        left: Box<Node>,
        op: ArithmeticOp,
        right: Box<Node>,
        result: DataType,
    },
}

/// Resolves `expr` against `schema` and computes its result type.
///
/// The type is `None` only for an expression made of `NOVALUE` alone.
fn compile(expr: &Expr, schema: &Schema) -> Result<(Node, Option<DataType>)> {
    match expr {
        Expr::Column(name) => {
            let idx = schema.resolve(name)?;
            let data_type = schema.columns[idx].data_type;
            Ok((Node::Column { idx, data_type }, Some(data_type)))
        }
        Expr::Literal(value) => {
            let (scalar, data_type) = Scalar::from_literal(value);
            Ok((Node::Literal(scalar), data_type))
        }
        Expr::Binary { left, op, right } => {
            let (left, lt) = compile(left, schema)?;
            let (right, rt) = compile(right, schema)?;
            let result = match (lt, rt) {
                (Some(l), Some(r)) => Some(result_type(l, *op, r)?),
                // NOVALUE takes the type of the other side
                (Some(t), None) | (None, Some(t)) => Some(result_type(t, *op, t)?),
                (None, None) => None,
            };
            let node = Node::Binary {
                left: Box::new(left),
                op: *op,
                right: Box::new(right),
                result: result.unwrap_or(DataType::Int),
            };
            Ok((node, result))
        }
    }
}

/// Type of `l op r`:
/// - string `+` string concatenates; other operators on strings are rejected.
/// - mixing a string with a number is a type conflict.
/// - int with int stays int, any float makes the result a float.
fn result_type(l: DataType, op: ArithmeticOp, r: DataType) -> Result<DataType> {
    match (l, r) {
        (DataType::String, DataType::String) if op == ArithmeticOp::Add => Ok(DataType::String),
        (DataType::String, DataType::String) => Err(Error::TypeConflict(format!(
            "operator {op} is not supported on strings"
        ))),
        (DataType::String, _) | (_, DataType::String) => Err(Error::TypeConflict(
            "can't compute string and non-string".into(),
        )),
        (DataType::Int, DataType::Int) => Ok(DataType::Int),
        _ => Ok(DataType::Float),
    }
}

impl Node {
    fn eval(&self, row: &Row) -> Result<Scalar> {
        match self {
            Node::Column { idx, data_type } => Scalar::from_column(&row.values()[*idx], *data_type),
            Node::Literal(scalar) => Ok(scalar.clone()),
            Node::Binary {
                left,
                op,
                right,
                result,
            } => {
                let l = left.eval(row)?;
                let r = right.eval(row)?;
                if l == Scalar::NoValue || r == Scalar::NoValue {
                    return Ok(Scalar::NoValue);
                }
                match result {
                    DataType::String => match (&l, &r) {
                        (Scalar::Text(l), Scalar::Text(r)) => Ok(Scalar::Text(concat(l, r).into())),
                        _ => Err(Error::TypeConflict(
                            "can't compute string and non-string".into(),
                        )),
                    },
                    DataType::Int => match (l, r) {
                        (Scalar::Int(l), Scalar::Int(r)) => int_arithmetic(l, *op, r).map(Scalar::Int),
                        _ => Err(Error::TypeConflict("expected two int operands".into())),
                    },
                    DataType::Float => match (l.as_f64(), r.as_f64()) {
                        (Some(l), Some(r)) => float_arithmetic(l, *op, r).map(Scalar::Float),
                        _ => Err(Error::TypeConflict(
                            "can't compute string and non-string".into(),
                        )),
                    },
                }
            }
        }
    }
}

/// Joins two quoted literals: the closing quote of the left one and the
/// opening quote of the right one are dropped, so `'ab'` + `'cd'` is `'abcd'`.
fn concat(l: &str, r: &str) -> String {
    let head = l.char_indices().next_back().map_or(l, |(i, _)| &l[..i]);
    let mut tail = r.chars();
    tail.next();
    format!("{head}{}", tail.as_str())
}

fn int_arithmetic(l: i64, op: ArithmeticOp, r: i64) -> Result<i64> {
    let result = match op {
        ArithmeticOp::Add => l.checked_add(r),
        ArithmeticOp::Sub => l.checked_sub(r),
        ArithmeticOp::Mul => l.checked_mul(r),
        ArithmeticOp::Div if r == 0 => return Err(Error::DivisionByZero),
        ArithmeticOp::Div => l.checked_div(r),
    };
    result.ok_or_else(|| Error::Arithmetic(format!("integer overflow in {l} {op} {r}")))
}

fn float_arithmetic(l: f64, op: ArithmeticOp, r: f64) -> Result<f64> {
    let result = match op {
        ArithmeticOp::Add => l + r,
        ArithmeticOp::Sub => l - r,
        ArithmeticOp::Mul => l * r,
        ArithmeticOp::Div if r == 0.0 => return Err(Error::DivisionByZero),
        ArithmeticOp::Div => l / r,
    };
    if !result.is_finite() {
        return Err(Error::Arithmetic(format!("float overflow in {l} {op} {r}")));
    }
    Ok(result)
}

impl Table {
    /// Evaluates every projection over the rows of this table and zips the
    /// resulting columns back into rows, in order.
    ///
    /// # Errors
    /// - [Error::ColumnNotFound] for a reference to a missing column.
    /// - [Error::TypeConflict] when strings meet numbers, or strings meet an
    ///   operator other than `+`.
    /// - [Error::DivisionByZero] and [Error::Arithmetic] for arithmetic faults.
    pub fn project(&self, projections: &[Projection]) -> Result<Table> {
        let mut columns: Vec<Column> = Vec::new();
        for projection in projections {
            columns.extend(self.project_one(projection)?);
        }

        let schema = Schema::new(
            columns
                .iter()
                .map(|c| ColumnDef::new(c.name.clone(), c.data_type))
                .collect(),
        );

        // Pivot: every column holds one value per input row
        let rows: Vec<Row> = (0..self.row_count())
            .map(|i| {
                Row::new(
                    columns
                        .iter()
                        .map(|c| c.value(i))
                        .collect(),
                )
            })
            .collect();

        tracing::debug!(
            columns = schema.len(),
            rows = rows.len(),
            "projected rows"
        );
        Ok(Table::from_parts(schema, rows))
    }

    fn project_one(&self, projection: &Projection) -> Result<Vec<Column>> {
        match projection {
            Projection::Star => self
                .schema()
                .columns
                .iter()
                .enumerate()
                .map(|(idx, def)| self.extract(idx, def.name.clone()))
                .collect(),
            Projection::Expr {
                expr: Expr::Column(name),
                alias,
            } => {
                let idx = self.schema().resolve(name)?;
                let name = alias.clone().unwrap_or_else(|| name.clone());
                Ok(vec![self.extract(idx, name)?])
            }
            Projection::Expr { expr, alias } => {
                let alias = alias.clone().ok_or_else(|| {
                    Error::malformed(format!("expression {expr} requires an alias"))
                })?;
                Ok(vec![self.compute(expr, alias)?])
            }
        }
    }

    /// Copies the column at `idx` as it is, under `name`.
    fn extract(&self, idx: usize, name: String) -> Result<Column> {
        let mut column = Column::new(name, self.schema().columns[idx].data_type);
        for row in self.rows() {
            column.push(row.values()[idx].clone())?;
        }
        Ok(column)
    }

    /// Evaluates an arithmetic expression for every row.
    fn compute(&self, expr: &Expr, alias: String) -> Result<Column> {
        let (node, data_type) = compile(expr, self.schema())?;
        let data_type = data_type.ok_or_else(|| {
            Error::TypeConflict(format!("cannot infer the type of expression {expr}"))
        })?;

        let mut column = Column::new(alias, data_type);
        for row in self.rows() {
            column.push(node.eval(row)?.into_value())?;
        }
        Ok(column)
    }
}
