//! Persisted table format.
//!
//! A table file is the rendered table followed by a newline:
//!
//! ```text
//! id int,name string,score float
//! 1,'ann',2.500
//! 2,NOVALUE,0.125
//! ```
//!
//! The first line declares the columns; each following line is one row of
//! literals. Reading stops at the first blank line or at end of input.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::parser::{parse_column_defs, parse_literals};
use crate::table::{Schema, Table};

fn stream_error(source: std::io::Error) -> Error {
    Error::Io {
        path: PathBuf::new(),
        source,
    }
}

/// Reads a table from `reader`.
///
/// Every row goes through [Table::insert], so literals are type checked and
/// floats come back normalized to 3 decimals.
///
/// # Errors
/// - [Error::Malformed] if the header is missing or a line does not parse.
/// - [Error::SchemaViolation] if a row does not fit the header.
pub fn read_table(reader: impl BufRead) -> Result<Table> {
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line.map_err(stream_error)?,
        None => String::new(),
    };
    if header.trim().is_empty() {
        return Err(Error::malformed("missing table header"));
    }

    let mut table = Table::new(Schema::new(parse_column_defs(&header)?));
    for line in lines {
        let line = line.map_err(stream_error)?;
        if line.trim().is_empty() {
            break;
        }
        table.insert(parse_literals(&line)?)?;
    }
    Ok(table)
}

/// Writes the rendered table plus a trailing newline.
pub fn write_table(table: &Table, mut writer: impl Write) -> Result<()> {
    writeln!(writer, "{table}").map_err(stream_error)?;
    writer.flush().map_err(stream_error)
}

/// Opens `path` and reads the table it holds.
pub fn load_table(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_table(BufReader::new(file)).map_err(|e| e.at(path))
}

/// Creates or truncates `path` and writes `table` into it.
pub fn store_table(table: &Table, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_table(table, BufWriter::new(file)).map_err(|e| e.at(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use crate::{ColumnDef, DataType};
    use tempfile::tempdir;

    fn scores() -> Table {
        let mut table = Table::new(Schema::new(vec![
            ColumnDef::new("id", DataType::Int),
            ColumnDef::new("score", DataType::Float),
        ]));
        table
            .insert(vec![Value::parse("1"), Value::parse("2.5")])
            .unwrap();
        table
            .insert(vec![Value::parse("2"), Value::NoValue])
            .unwrap();
        table
    }

    #[test]
    fn test_write_format() {
        let mut out = Vec::new();

        write_table(&scores(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id int,score float\n1,2.500\n2,NOVALUE\n"
        );
    }

    #[test]
    fn test_read_normalizes_floats() {
        let input = "id int,score float\n1,2.5\n2,7\n";

        let table = read_table(input.as_bytes());

        // an int literal in a float column is a schema violation
        assert!(matches!(table, Err(Error::SchemaViolation)));

        let table = read_table("id int,score float\n1,2.5\n".as_bytes()).unwrap();
        assert_eq!(table.render(), "id int,score float\n1,2.500");
    }

    #[test]
    fn test_read_stops_at_blank_line() {
        let input = "s string\n'a'\n'b'\n\n'ignored'\n";

        let table = read_table(input.as_bytes()).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.render(), "s string\n'a'\n'b'");
    }

    #[test]
    fn test_header_only() {
        let table = read_table("x int".as_bytes()).unwrap();

        assert_eq!(table.row_count(), 0);
        assert_eq!(table.schema().len(), 1);
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(read_table("".as_bytes()), Err(Error::Malformed(_))));
        assert!(matches!(
            read_table("\n1,2\n".as_bytes()),
            Err(Error::Malformed(_))
        ));
    }

    #[test]
    fn test_invalid_header_type() {
        let result = read_table("x bool\n".as_bytes());

        assert!(matches!(result, Err(Error::Malformed(_))));
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("scores.tbl");
        let second = dir.path().join("again.tbl");

        store_table(&scores(), &first).unwrap();
        let loaded = load_table(&first).unwrap();
        store_table(&loaded, &second).unwrap();

        assert_eq!(loaded.rows()[0].values()[1], Value::parse("2.500"));
        assert_eq!(
            std::fs::read(&first).unwrap(),
            std::fs::read(&second).unwrap()
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.tbl");

        let err = load_table(&path).unwrap_err();

        assert!(matches!(&err, Error::Io { path: p, .. } if p == &path));
        assert!(err.to_string().contains("absent.tbl"));
    }
}
