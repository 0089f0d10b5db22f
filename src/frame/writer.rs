use crate::frame::table::Table;
use anyhow::{Context, Result};
use std::io::Write;

/// Output layout for a written table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One JSON object per row
    #[default]
    JsonLines,
    /// The whole table as one `{"columns": [...], "rows": [...]}` document
    Document,
}

/// Writes tables to any `Write` sink
pub struct TableWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W) -> Self {
        TableWriter {
            writer,
            format: OutputFormat::default(),
            pretty: false,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn write_table(&mut self, table: &Table) -> Result<()> {
        match self.format {
            OutputFormat::JsonLines => {
                for row in table.rows() {
                    let json = if self.pretty {
                        serde_json::to_string_pretty(row)
                    } else {
                        serde_json::to_string(row)
                    }
                    .context("Failed to serialize row")?;
                    writeln!(self.writer, "{}", json).context("Failed to write row")?;
                }
            }
            OutputFormat::Document => {
                let json = if self.pretty {
                    serde_json::to_string_pretty(table)
                } else {
                    serde_json::to_string(table)
                }
                .context("Failed to serialize table")?;
                writeln!(self.writer, "{}", json).context("Failed to write table")?;
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
