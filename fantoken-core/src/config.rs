//! Serializable API configuration.
//!
//! Everything the fetch engine consumes from the outside world lives here:
//! endpoint, auth token, batch size, retry budget, page ceiling. The struct is
//! passed explicitly into the client so the core never reads ambient
//! environment state and tests never need environment mocking.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default GraphQL endpoint of the upstream API.
pub const DEFAULT_ENDPOINT: &str = "https://api.airstack.xyz/gql";

/// Batch size for the earnings query's `entityIds` argument.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Maximum attempts for a single remote call.
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Fixed delay between retry attempts, in seconds.
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 2;

/// Ceiling on pages followed for one paginated query.
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// Configuration for the remote fetch engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// GraphQL endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bearer token sent in the `Authorization` header.
    pub auth_token: String,

    /// Entities per earnings query batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Attempts per remote call before the failure propagates.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay between attempts, in seconds.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// Hard ceiling on pages per paginated query. A server that never reports
    /// `hasNextPage: false` aborts with `PageLimitExceeded` instead of
    /// looping forever.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_retry_delay_secs() -> u64 {
    DEFAULT_RETRY_DELAY_SECS
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

impl ApiConfig {
    /// Config with default tuning for the given auth token.
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            endpoint: default_endpoint(),
            auth_token: auth_token.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Load from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: ApiConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be at least 1".into()));
        }
        if self.max_retries == 0 {
            return Err(ConfigError::Invalid("max_retries must be at least 1".into()));
        }
        if self.max_pages == 0 {
            return Err(ConfigError::Invalid("max_pages must be at least 1".into()));
        }
        Ok(())
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
