//! Newline-delimited JSON loading with per-line failure isolation

use crate::error::Result;
use crate::frame::Table;
use crate::ingest::fetch::{Fetch, HttpClient, HttpFetcher};
use crate::types::{scalar_record, FetchConfig, Record};
use serde_json::Value;
use std::fmt;
use tracing::{error, info, warn};

/// Width of the zero-padded shard index in sharded dataset names
pub const SHARD_INDEX_WIDTH: usize = 12;

/// A line that could not be decoded and was skipped
#[derive(Debug)]
pub struct LineDiagnostic {
    /// 1-based line number within the downloaded body
    pub line_number: usize,
    pub line: String,
    pub error: serde_json::Error,
}

impl fmt::Display for LineDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "skipping invalid JSON line {}: {} due to error: {}",
            self.line_number, self.line, self.error
        )
    }
}

/// Result of one successful line-delimited load
#[derive(Debug)]
pub struct LoadReport {
    pub table: Table,
    pub skipped: Vec<LineDiagnostic>,
}

/// Result of loading several shards back to back
#[derive(Debug, Default)]
pub struct ShardReport {
    pub table: Table,
    /// URLs whose load aborted
    pub failed: Vec<String>,
    /// Total lines skipped across the shards that loaded
    pub skipped_lines: usize,
}

/// Decode each line of a body into a record
///
/// Leading and trailing whitespace of the whole body is dropped before
/// splitting on `\n`, so a trailing newline does not produce an empty line.
/// Every other line that fails to decode, blank ones included, becomes a
/// diagnostic. Line numbers count from the start of the untrimmed body.
pub fn parse_lines(body: &str) -> (Vec<Record>, Vec<LineDiagnostic>) {
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    let trimmed = body.trim_start();
    let leading_lines = body[..body.len() - trimmed.len()].matches('\n').count();
    let body = trimmed.trim_end();
    if body.is_empty() {
        return (records, skipped);
    }

    for (idx, line) in body.split('\n').enumerate() {
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(obj)) => records.push(obj),
            Ok(other) => records.push(scalar_record(other)),
            Err(error) => skipped.push(LineDiagnostic {
                line_number: leading_lines + idx + 1,
                line: line.to_string(),
                error,
            }),
        }
    }

    (records, skipped)
}

/// Replace `*` in `pattern` with each zero-padded index in `0..count`
pub fn expand_shards(pattern: &str, count: usize) -> Vec<String> {
    if !pattern.contains('*') {
        return vec![pattern.to_string()];
    }

    (0..count)
        .map(|i| {
            let index = format!("{:0width$}", i, width = SHARD_INDEX_WIDTH);
            pattern.replace('*', &index)
        })
        .collect()
}

/// Loads newline-delimited JSON resources into tables
pub struct LineDelimitedLoader<F: Fetch> {
    fetcher: F,
}

impl LineDelimitedLoader<HttpClient> {
    /// Loader backed by a blocking HTTP client
    pub fn http(config: FetchConfig) -> std::result::Result<Self, reqwest::Error> {
        Ok(LineDelimitedLoader::new(HttpFetcher::retrying(config)?))
    }
}

impl<F: Fetch> LineDelimitedLoader<F> {
    pub fn new(fetcher: F) -> Self {
        LineDelimitedLoader { fetcher }
    }

    /// Fetch and decode `url`, failing only when nothing usable was downloaded
    ///
    /// Lines that fail to decode are skipped; each one is logged as a
    /// warning once the whole body has been processed and is listed in the
    /// report.
    pub fn fetch(&self, url: &str) -> Result<LoadReport> {
        let response = self.fetcher.get(url)?.error_for_status()?;
        let (records, skipped) = parse_lines(&response.body);

        for diagnostic in &skipped {
            warn!(
                url,
                line_number = diagnostic.line_number,
                line = %diagnostic.line,
                error = %diagnostic.error,
                "skipping invalid JSON line"
            );
        }

        Ok(LoadReport {
            table: Table::from_records(records),
            skipped,
        })
    }

    /// Like [`fetch`](Self::fetch), but an aborted load is logged and
    /// returned as `None`
    pub fn load(&self, url: &str) -> Option<Table> {
        match self.fetch(url) {
            Ok(report) => Some(report.table),
            Err(err) => {
                error!(url, status = ?err.status(), error = %err, "error downloading data");
                None
            }
        }
    }

    /// Load each URL in turn and stack the results
    ///
    /// A shard that fails is logged and left out; the rest still load.
    pub fn load_shards<S: AsRef<str>>(&self, urls: &[S]) -> ShardReport {
        let mut tables = Vec::with_capacity(urls.len());
        let mut report = ShardReport::default();

        for url in urls {
            let url = url.as_ref();
            match self.fetch(url) {
                Ok(load) => {
                    info!(url, rows = load.table.len(), skipped = load.skipped.len(), "loaded shard");
                    report.skipped_lines += load.skipped.len();
                    tables.push(load.table);
                }
                Err(err) => {
                    error!(url, error = %err, "error downloading shard");
                    report.failed.push(url.to_string());
                }
            }
        }

        report.table = Table::concat(tables);
        report
    }
}
