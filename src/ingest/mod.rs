//! Ingestion - fetch web payloads and turn them into tables
//!
//! The loaders share one [`Fetch`] seam:
//!
//! - [`LineDelimitedLoader`] reads newline-delimited JSON, skipping lines
//!   that fail to decode
//! - [`EndpointNormalizer`] reads one JSON document, optionally unwraps a
//!   top-level field, and flattens nested objects into columns
//! - [`CsvLoader`] reads CSV datasets and tags them with their season
//!
//! Each blocks on one request per URL (plus retries); there is no shared
//! state between calls.

pub mod csv;
pub mod endpoint;
pub mod fetch;
pub mod ndjson;

pub use csv::{parse_csv, season_from_url, CsvLoader, HOME_RUN_COLUMNS, SEASON_COLUMN};
pub use endpoint::{parse_document, EndpointNormalizer};
pub use fetch::{Fetch, HttpClient, HttpFetcher, RawResponse, Retrying};
pub use ndjson::{expand_shards, parse_lines, LineDelimitedLoader, LineDiagnostic, LoadReport, ShardReport};
