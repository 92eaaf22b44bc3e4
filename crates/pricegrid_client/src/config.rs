use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/search";
pub const DEFAULT_MAX_RESULTS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid endpoint url {url:?}: {source}")]
    InvalidEndpoint {
        url: String,
        source: url::ParseError,
    },
    #[error("endpoint must use http or https, got {0:?}")]
    UnsupportedScheme(String),
    #[error("max_results must be at least 1")]
    InvalidMaxResults,
}

/// Resolved once at startup and handed to the search client.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub endpoint: Url,
    /// Sent when the caller does not ask for a specific count.
    pub default_max_results: Option<u32>,
    pub connect_timeout: Duration,
    /// `None` waits for as long as the server takes.
    pub request_timeout: Option<Duration>,
    pub max_bytes: u64,
}

impl SearchConfig {
    pub fn new(endpoint_url: &str) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(endpoint_url.trim()).map_err(|source| {
            ConfigError::InvalidEndpoint {
                url: endpoint_url.to_string(),
                source,
            }
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(endpoint.scheme().to_string()));
        }

        Ok(Self {
            endpoint,
            default_max_results: Some(DEFAULT_MAX_RESULTS),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            max_bytes: 5 * 1024 * 1024,
        })
    }

    pub fn with_max_results(mut self, max_results: u32) -> Result<Self, ConfigError> {
        if max_results == 0 {
            return Err(ConfigError::InvalidMaxResults);
        }
        self.default_max_results = Some(max_results);
        Ok(self)
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Per-call options for [`crate::SearchClient::search`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Overrides [`SearchConfig::default_max_results`].
    pub max_results: Option<u32>,
}
