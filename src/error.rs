use polars::prelude::PolarsError;
use thiserror::Error;

/// Failure to obtain a usable response body
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl NetworkError {
    pub fn url(&self) -> &str {
        match self {
            NetworkError::Status { url, .. } | NetworkError::Transport { url, .. } => url,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::Status { status, .. } => Some(*status),
            NetworkError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
        }
    }
}

/// Aborting failures surfaced by the loaders
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("failed to parse JSON document from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("key `{key}` not found in document from {url}")]
    MissingKey { url: String, key: String },

    #[error("failed to read CSV from {url}: {source}")]
    Csv {
        url: String,
        #[source]
        source: FrameError,
    },
}

impl IngestError {
    /// HTTP status behind the failure, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            IngestError::Network(err) => err.status(),
            _ => None,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            IngestError::Network(err) => err.url(),
            IngestError::Parse { url, .. }
            | IngestError::MissingKey { url, .. }
            | IngestError::Csv { url, .. } => url,
        }
    }

    /// True when nothing was downloaded
    pub fn is_network(&self) -> bool {
        matches!(self, IngestError::Network(_))
    }
}

/// Failures moving tables in and out of polars frames
#[derive(Debug, Error)]
pub enum FrameError {
    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error("failed to convert rows: {0}")]
    Rows(#[from] serde_json::Error),
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err: IngestError = NetworkError::Status {
            url: "https://example.test/a.json".to_string(),
            status: 404,
        }
        .into();

        assert!(err.is_network());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.url(), "https://example.test/a.json");
        assert_eq!(
            err.to_string(),
            "https://example.test/a.json responded with HTTP 404"
        );
    }

    #[test]
    fn test_missing_key_names_key_and_url() {
        let err = IngestError::MissingKey {
            url: "https://example.test/teams".to_string(),
            key: "teams".to_string(),
        };

        assert!(!err.is_network());
        assert_eq!(err.status(), None);
        let msg = err.to_string();
        assert!(msg.contains("`teams`"));
        assert!(msg.contains("https://example.test/teams"));
    }

    #[test]
    fn test_csv_error_keeps_url_and_source() {
        let err = IngestError::Csv {
            url: "https://example.test/datasets/2024.csv".to_string(),
            source: PolarsError::NoData("empty CSV".into()).into(),
        };

        assert!(!err.is_network());
        assert_eq!(err.url(), "https://example.test/datasets/2024.csv");
        assert!(err.to_string().contains("empty CSV"));
    }
}
