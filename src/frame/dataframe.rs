//! Moving tables in and out of polars
//!
//! Rows cross the boundary as JSON Lines, so nested objects become struct
//! columns and arrays become list columns on the way in, and come back
//! unchanged on the way out.

use crate::error::FrameError;
use crate::frame::table::{pad_record, Table};
use polars::prelude::*;
use std::io::Cursor;

impl Table {
    /// Columnar copy of this table
    ///
    /// Column types are inferred from every row. A table with columns but
    /// no rows becomes a zero-height frame of null-typed columns.
    pub fn to_dataframe(&self) -> Result<DataFrame, FrameError> {
        if self.is_empty() {
            let columns: Vec<Column> = self
                .columns()
                .iter()
                .map(|name| Series::new_empty(name.as_str().into(), &DataType::Null).into())
                .collect();
            return Ok(DataFrame::new(columns)?);
        }

        let mut lines = Vec::new();
        for row in self.rows() {
            serde_json::to_writer(&mut lines, row)?;
            lines.push(b'\n');
        }

        let df = JsonReader::new(Cursor::new(lines))
            .with_json_format(JsonFormat::JsonLines)
            .infer_schema_len(None)
            .finish()?;
        Ok(df)
    }

    /// Rows of `df`, in frame order, with the frame's column order
    pub fn from_dataframe(df: &DataFrame) -> Result<Table, FrameError> {
        let columns: Vec<String> = df.get_column_names().iter().map(|c| c.to_string()).collect();

        let mut lines = Vec::new();
        let mut df = df.clone();
        JsonWriter::new(&mut lines)
            .with_json_format(JsonFormat::JsonLines)
            .finish(&mut df)?;

        let mut rows = Vec::with_capacity(df.height());
        for line in lines.split(|b| *b == b'\n').filter(|l| !l.is_empty()) {
            rows.push(pad_record(&columns, serde_json::from_slice(line)?));
        }

        Ok(Table::from_parts(columns, rows))
    }
}
