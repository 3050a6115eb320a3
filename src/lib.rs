//! A small in-memory relational engine: named tables of typed literals,
//! natural joins, filtering and arithmetic projection, driven by a tiny
//! query language.

pub mod ast;
pub mod column;
pub mod config;
pub mod data_type;
pub mod database;
pub mod error;
pub mod filter;
pub mod join;
pub mod parser;
pub mod projection;
pub mod row;
pub mod storage;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use column::Column;
pub use config::DatabaseConfig;
pub use data_type::DataType;
pub use database::Database;
pub use error::{Error, Result};
pub use row::Row;
pub use table::{ColumnDef, Schema, Table};
pub use value::Value;
