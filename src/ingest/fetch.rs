use crate::error::{IngestError, NetworkError, Result};
use crate::types::FetchConfig;
use reqwest::blocking::Client;
use tracing::{debug, warn};

/// Unparsed body of one HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        RawResponse {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into a `NetworkError::Status`
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(NetworkError::Status {
                url: self.url,
                status: self.status,
            }
            .into())
        }
    }
}

/// Source of raw responses for the loaders
///
/// A response with any status is `Ok`; only failures to get a response at
/// all are errors. Status checking belongs to the caller.
pub trait Fetch {
    fn get(&self, url: &str) -> Result<RawResponse>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn get(&self, url: &str) -> Result<RawResponse> {
        (**self).get(url)
    }
}

/// Blocking HTTP fetcher configured by an explicit [`FetchConfig`]
///
/// Each `get` makes a single attempt; wrap it in [`Retrying`] (or build it
/// with [`HttpFetcher::retrying`]) to honor `FetchConfig::retries`.
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

/// The HTTP fetcher the loaders use by default
pub type HttpClient = Retrying<HttpFetcher>;

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> std::result::Result<Self, reqwest::Error> {
        // a None timeout also disables the blocking client's built-in default
        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout);
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build()?;
        Ok(HttpFetcher { client, config })
    }

    /// Fetcher that retries transport failures `config.retries` times
    pub fn retrying(config: FetchConfig) -> std::result::Result<HttpClient, reqwest::Error> {
        let retries = config.retries;
        Ok(Retrying::new(HttpFetcher::new(config)?, retries))
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn send(&self, url: &str) -> std::result::Result<RawResponse, reqwest::Error> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        debug!(url, status, "response");
        let body = response.text()?;
        Ok(RawResponse::new(url, status, body))
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> Result<RawResponse> {
        debug!(url, "GET");
        self.send(url).map_err(|source| {
            NetworkError::Transport {
                url: url.to_string(),
                source,
            }
            .into()
        })
    }
}

/// Retries transport failures of an inner [`Fetch`]
///
/// Only `NetworkError::Transport` is retried, immediately and without
/// back-off. A response with a non-2xx status is returned as-is.
pub struct Retrying<F: Fetch> {
    inner: F,
    retries: u32,
}

impl<F: Fetch> Retrying<F> {
    pub fn new(inner: F, retries: u32) -> Self {
        Retrying { inner, retries }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Total attempts made for one URL before giving up
    pub fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

impl<F: Fetch> Fetch for Retrying<F> {
    fn get(&self, url: &str) -> Result<RawResponse> {
        let attempts = self.attempts();
        let mut attempt = 1;

        loop {
            match self.inner.get(url) {
                Err(IngestError::Network(NetworkError::Transport { source, .. }))
                    if attempt < attempts =>
                {
                    warn!(url, attempt, error = %source, "request failed, retrying");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned bodies per URL; unknown URLs answer 404
    ///
    /// URLs registered with [`fail_first`](Self::fail_first) or
    /// [`unreachable`](Self::unreachable) answer with transport errors
    /// before (or instead of) their canned body.
    #[derive(Default)]
    pub struct StaticFetcher {
        responses: HashMap<String, (u16, String)>,
        failures: RefCell<HashMap<String, u32>>,
        calls: RefCell<Vec<String>>,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            StaticFetcher::default()
        }

        pub fn with(mut self, url: &str, status: u16, body: &str) -> Self {
            self.responses
                .insert(url.to_string(), (status, body.to_string()));
            self
        }

        /// The next `times` requests for `url` fail at the transport level
        pub fn fail_first(self, url: &str, times: u32) -> Self {
            self.failures.borrow_mut().insert(url.to_string(), times);
            self
        }

        /// Every request for `url` fails at the transport level
        pub fn unreachable(self, url: &str) -> Self {
            self.fail_first(url, u32::MAX)
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    /// A real `reqwest::Error`, produced without touching the network by
    /// building a request for an unparsable URL
    pub fn transport_error(url: &str) -> IngestError {
        let source = reqwest::blocking::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        NetworkError::Transport {
            url: url.to_string(),
            source,
        }
        .into()
    }

    impl Fetch for StaticFetcher {
        fn get(&self, url: &str) -> Result<RawResponse> {
            self.calls.borrow_mut().push(url.to_string());

            if let Some(left) = self.failures.borrow_mut().get_mut(url) {
                if *left > 0 {
                    if *left != u32::MAX {
                        *left -= 1;
                    }
                    return Err(transport_error(url));
                }
            }

            match self.responses.get(url) {
                Some((status, body)) => Ok(RawResponse::new(url, *status, body.as_str())),
                None => Ok(RawResponse::new(url, 404, "Not Found")),
            }
        }
    }
}
