//! # Ballpark - record ingestion for sports stats and fan datasets
//!
//! Pulls record-oriented JSON from web endpoints and storage buckets and
//! reshapes it into flat, union-of-keys tables.
//!
//! ## Modules
//!
//! - **ingest**: fetch newline-delimited JSON, single JSON documents, or CSV datasets
//! - **flatten**: collapse nested objects into separator-joined columns
//! - **frame**: the `Table` type, its polars conversion, and the
//!   explode/count/join steps run on the resulting frames
//! - **links**: media and content URLs built from ids
//!
//! ## Quick Start
//!
//! ### Newline-delimited JSON
//!
//! ```rust
//! use ballpark::ingest::parse_lines;
//! use ballpark::Table;
//!
//! let (records, skipped) = parse_lines("{\"x\":1}\n not json \n{\"x\":2}");
//! let table = Table::from_records(records);
//!
//! assert_eq!(table.len(), 2);
//! assert_eq!(skipped.len(), 1);
//! ```
//!
//! ### Normalizing a document
//!
//! ```rust
//! use ballpark::{EndpointNormalizer, FetchConfig, FlattenConfig};
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let normalizer = EndpointNormalizer::http(FetchConfig::default(), FlattenConfig::underscore())?;
//! let document = json!({
//!     "people": [{"id": 1, "name": {"first": "A", "last": "B"}}]
//! });
//!
//! let table = normalizer.normalize_document("inline", document, Some("people"))?;
//! assert_eq!(table.columns(), &["id", "name_first", "name_last"]);
//! # Ok(())
//! # }
//! ```

use tracing::error;

pub mod error;
pub mod flatten;
pub mod frame;
pub mod ingest;
pub mod links;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{FrameError, IngestError, NetworkError};
pub use flatten::JsonFlattener;
pub use frame::{Table, TableWriter};
pub use ingest::{
    CsvLoader, EndpointNormalizer, Fetch, HttpClient, HttpFetcher, LineDelimitedLoader,
    RawResponse, Retrying,
};
pub use types::{FetchConfig, FlattenConfig, Record};

/// Load a newline-delimited JSON resource with the default client
///
/// Returns `None` when the download fails; the failure is logged.
pub fn load_line_delimited(url: &str) -> Option<Table> {
    match LineDelimitedLoader::http(FetchConfig::default()) {
        Ok(loader) => loader.load(url),
        Err(err) => {
            error!(url, error = %err, "failed to build HTTP client");
            None
        }
    }
}

/// Fetch `url` with the default client and normalize it with `_` as the
/// nesting separator
pub fn normalize_endpoint(url: &str, unwrap_key: Option<&str>) -> error::Result<Table> {
    let normalizer = EndpointNormalizer::http(FetchConfig::default(), FlattenConfig::underscore())
        .map_err(|source| NetworkError::Transport {
            url: url.to_string(),
            source,
        })?;
    normalizer.normalize(url, unwrap_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_basic_normalizing() {
        let input = json!({
            "copyright": "Copyright 2025",
            "sports": [
                {"id": 1, "code": "mlb", "link": "/api/v1/sports/1"},
                {"id": 11, "code": "aaa", "league": {"id": 117}}
            ]
        });

        let normalizer = EndpointNormalizer::http(FetchConfig::default(), FlattenConfig::underscore())
            .unwrap();
        let table = normalizer
            .normalize_document("inline", input, Some("sports"))
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.columns(), &["id", "code", "link", "league_id"]);
    }
}
