use serde_json::{Map, Value};
use std::time::Duration;

/// One decoded record: column name to value, in insertion order
pub type Record = Map<String, Value>;

/// Column name used when a record is not a JSON object
pub const VALUE_COLUMN: &str = "value";

/// Configuration for the HTTP client behind the loaders
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Total request timeout (None = no timeout)
    pub timeout: Option<Duration>,

    /// Timeout for establishing the connection
    pub connect_timeout: Option<Duration>,

    /// Extra attempts after the first one, for transport failures only
    pub retries: u32,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            retries: 0,
            user_agent: format!("ballpark/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetchConfig {
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Total number of attempts a request may take
    pub fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

/// Configuration for flattening nested records into columns
#[derive(Debug, Clone)]
pub struct FlattenConfig {
    /// Separator placed between parent and child key names
    pub separator: String,

    /// Maximum object depth to flatten (None = unlimited, 0 = keep top level only)
    pub max_level: Option<usize>,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        FlattenConfig {
            separator: String::from("."),
            max_level: None,
        }
    }
}

impl FlattenConfig {
    /// The `_`-separated layout used for stats API endpoints
    pub fn underscore() -> Self {
        FlattenConfig {
            separator: String::from("_"),
            ..FlattenConfig::default()
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_max_level(mut self, max_level: Option<usize>) -> Self {
        self.max_level = max_level;
        self
    }
}

/// Wrap a non-object value so it can stand as a one-column row
pub fn scalar_record(value: Value) -> Record {
    let mut record = Map::new();
    record.insert(VALUE_COLUMN.to_string(), value);
    record
}
