//! Join engine: natural join on shared column names, cross product otherwise.

use bitvec::prelude::*;

use crate::row::Row;
use crate::table::{Schema, Table};

impl Table {
    /// Combines `self` with `other`.
    ///
    /// When the two schemas share column names, rows are paired only if they
    /// agree on the literal text of every shared column, and the shared
    /// columns of `other` are dropped from the output. Without shared columns
    /// every pair of rows is emitted (cross product).
    ///
    /// Output rows follow `self`'s order, then `other`'s.
    ///
    /// # Example
    /// ```
    /// # use reldb::{ColumnDef, DataType, Schema, Table, Value};
    /// let mut a = Table::new(Schema::new(vec![ColumnDef::new("x", DataType::Int)]));
    /// a.insert(vec![Value::parse("1")]).unwrap();
    /// let mut c = Table::new(Schema::new(vec![ColumnDef::new("y", DataType::Int)]));
    /// c.insert(vec![Value::parse("9")]).unwrap();
    ///
    /// assert_eq!(a.merge(&c).render(), "x int,y int\n1,9");
    /// ```
    pub fn merge(&self, other: &Table) -> Table {
        let shared = self.shared_columns(other);

        // bits set on `other`'s columns that duplicate one of ours
        let mut skip: BitVec = bitvec![0; other.schema().len()];
        for &(_, j) in &shared {
            skip.set(j, true);
        }

        let schema = Schema::new(
            self.schema()
                .columns
                .iter()
                .chain(
                    other
                        .schema()
                        .columns
                        .iter()
                        .enumerate()
                        .filter(|(j, _)| !skip[*j])
                        .map(|(_, c)| c),
                )
                .cloned()
                .collect(),
        );

        let mut rows: Vec<Row> = Vec::new();
        for a in self.rows() {
            for b in other.rows() {
                let matched = shared
                    .iter()
                    .all(|&(i, j)| a.values()[i] == b.values()[j]);
                if !matched {
                    continue;
                }
                rows.push(
                    a.extended(
                        b.values()
                            .iter()
                            .enumerate()
                            .filter(|(j, _)| !skip[*j])
                            .map(|(_, v)| v.clone()),
                    ),
                );
            }
        }

        tracing::debug!(
            shared = shared.len(),
            left = self.row_count(),
            right = other.row_count(),
            output = rows.len(),
            "merged tables"
        );
        Table::from_parts(schema, rows)
    }

    /// Pairs `(i, j)` of equally named columns, in the order of `self`'s columns.
    fn shared_columns(&self, other: &Table) -> Vec<(usize, usize)> {
        let mut shared = Vec::new();
        for (i, left) in self.schema().columns.iter().enumerate() {
            for (j, right) in other.schema().columns.iter().enumerate() {
                if left.name == right.name {
                    shared.push((i, j));
                }
            }
        }
        shared
    }
}

/// Left fold of [Table::merge]: `((t1 ⨝ t2) ⨝ t3) ⨝ ...`, strictly in order.
///
/// Returns `None` for an empty list.
pub fn merge_all(tables: &[&Table]) -> Option<Table> {
    let (first, rest) = tables.split_first()?;
    let mut merged = (*first).clone();
    for table in rest {
        merged = merged.merge(table);
    }
    Some(merged)
}
