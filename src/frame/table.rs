use crate::types::Record;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Rows coerced into a common column set
///
/// The column set is the union of every row's keys in first-seen order.
/// Each stored row carries every column, in column order, with `null`
/// filling the keys a source record did not have.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Table {
    /// A table with no rows and no columns
    pub fn empty() -> Self {
        Table::default()
    }

    /// Assemble records into a table, preserving row order
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for record in &records {
            for key in record.keys() {
                if !seen.contains(key) {
                    seen.insert(key.clone());
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .into_iter()
            .map(|record| pad_record(&columns, record))
            .collect();

        Table { columns, rows }
    }

    /// Build a table from parts already laid out in column order
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Table { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Values of one column, top to bottom
    pub fn column<'a>(&'a self, name: &'a str) -> Option<impl Iterator<Item = &'a Value> + 'a> {
        if !self.has_column(name) {
            return None;
        }
        Some(self.rows.iter().map(move |row| row.get(name).unwrap_or(&Value::Null)))
    }

    /// Cell at `row`, `column`
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Stack tables row-wise; the result's columns are the union of all inputs
    pub fn concat<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = Table>,
    {
        let records: Vec<Record> = tables.into_iter().flat_map(|t| t.rows).collect();
        Table::from_records(records)
    }

    /// Set `column` to `value` on every row, appending the column if new
    pub fn with_column(mut self, column: &str, value: Value) -> Table {
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
        for row in &mut self.rows {
            row.insert(column.to_string(), value.clone());
        }
        self
    }

    /// Project onto `columns`, in the given order
    ///
    /// Names the table does not have come back as all-null columns.
    pub fn project(&self, columns: &[&str]) -> Table {
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| pad_record(&columns, row.clone()))
            .collect();
        Table { columns, rows }
    }
}

pub(crate) fn pad_record(columns: &[String], mut record: Record) -> Record {
    let mut padded = Map::new();
    for column in columns {
        let value = record.remove(column).unwrap_or(Value::Null);
        padded.insert(column.clone(), value);
    }
    padded
}
