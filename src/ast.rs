use std::fmt;

use crate::{ColumnDef, Value};

#[derive(Debug, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    CreateTableAs(CreateTableAs),
    Load(String),
    Store(String),
    DropTable(String),
    InsertInto(InsertInto),
    Print(String),
    Select(Select),
}

#[derive(Debug, PartialEq)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

#[derive(Debug, PartialEq)]
pub struct CreateTableAs {
    pub name: String,
    pub select: Select,
}

#[derive(Debug, PartialEq)]
pub struct InsertInto {
    pub table: String,
    pub values: Vec<Value>,
}

#[derive(Debug, PartialEq)]
pub struct Select {
    pub projections: Vec<Projection>,
    pub tables: Vec<String>,
    /// Clauses joined by `and`, applied one after another.
    pub conditions: Vec<Condition>,
}

/// One comma-separated entry of a select list.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// `*`: every column of the input.
    Star,
    /// A column or arithmetic expression, with its output name.
    Expr { expr: Expr, alias: Option<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(String),
    Literal(Value),
    Binary {
        left: Box<Expr>,
        op: ArithmeticOp,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// `column OP operand`, where the operand is a column or a literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub op: ComparisonOp,
    pub right: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    NotEq,
    LtEq,
    GtEq,
    Lt,
    Gt,
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
        })
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonOp::Eq => "==",
            ComparisonOp::NotEq => "!=",
            ComparisonOp::LtEq => "<=",
            ComparisonOp::GtEq => ">=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Gt => ">",
        })
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(name) => f.write_str(name),
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::Binary { left, op, right } => write!(f, "({left} {op} {right})"),
        }
    }
}
