use crate::error::{IngestError, Result};
use crate::flatten::JsonFlattener;
use crate::frame::Table;
use crate::ingest::fetch::{Fetch, HttpClient, HttpFetcher};
use crate::types::{FetchConfig, FlattenConfig};
use serde_json::Value;
use tracing::debug;

/// Fetches one JSON document and normalizes it into a flat table
pub struct EndpointNormalizer<F: Fetch> {
    fetcher: F,
    flattener: JsonFlattener,
}

impl EndpointNormalizer<HttpClient> {
    /// Normalizer backed by a blocking HTTP client
    pub fn http(
        fetch: FetchConfig,
        flatten: FlattenConfig,
    ) -> std::result::Result<Self, reqwest::Error> {
        Ok(EndpointNormalizer::new(HttpFetcher::retrying(fetch)?, flatten))
    }
}

impl<F: Fetch> EndpointNormalizer<F> {
    pub fn new(fetcher: F, config: FlattenConfig) -> Self {
        EndpointNormalizer {
            fetcher,
            flattener: JsonFlattener::new(config),
        }
    }

    /// Fetch `url` and normalize the whole document, or only the
    /// top-level field `unwrap_key` when given
    pub fn normalize(&self, url: &str, unwrap_key: Option<&str>) -> Result<Table> {
        let response = self.fetcher.get(url)?.error_for_status()?;
        let document = parse_document(url, &response.body)?;
        self.normalize_document(url, document, unwrap_key)
    }

    /// Normalize an already-parsed document
    ///
    /// An array yields one row per element, `null` yields no rows, and any
    /// other value is a single record.
    pub fn normalize_document(
        &self,
        url: &str,
        document: Value,
        unwrap_key: Option<&str>,
    ) -> Result<Table> {
        let source = match unwrap_key {
            Some(key) => unwrap_field(document, key).ok_or_else(|| IngestError::MissingKey {
                url: url.to_string(),
                key: key.to_string(),
            })?,
            None => document,
        };

        let records = match source {
            Value::Array(items) => self.flattener.flatten_all(items),
            Value::Null => Vec::new(),
            other => vec![self.flattener.flatten(other)],
        };

        Ok(Table::from_records(records))
    }
}

/// Take `key` out of a top-level object, discarding its siblings
fn unwrap_field(document: Value, key: &str) -> Option<Value> {
    match document {
        Value::Object(mut obj) => obj.remove(key),
        _ => None,
    }
}

/// Parse a whole response body as one JSON document
///
/// simd-json takes the first pass; serde_json re-parses on failure so the
/// reported error carries a line and column.
pub fn parse_document(url: &str, body: &str) -> Result<Value> {
    // simd-json parses in place and may leave the scratch buffer modified
    let mut scratch = body.as_bytes().to_vec();
    match simd_json::serde::from_slice::<Value>(&mut scratch) {
        Ok(value) => Ok(value),
        Err(simd_err) => {
            debug!(url, error = %simd_err, "simd-json rejected body, re-parsing with serde_json");
            serde_json::from_str(body).map_err(|source| IngestError::Parse {
                url: url.to_string(),
                source,
            })
        }
    }
}
