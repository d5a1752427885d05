//! Transport errors and their mapping onto [`VfxdError`].

use thiserror::Error;
use vfxd_error::VfxdError;

/// Provider-related errors
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Invalid URL format
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// Offending URL
        url: String,
        /// Parse failure
        reason: String,
    },

    /// Invalid client configuration
    #[error("Invalid provider configuration: {0}")]
    InvalidConfig(String),

    /// Request did not complete in time
    #[error("Request to {url} timed out after {secs}s")]
    Timeout {
        /// Endpoint URL
        url: String,
        /// Configured timeout
        secs: u64,
    },

    /// Endpoint asked us to slow down
    #[error("Rate limited by {url}")]
    RateLimited {
        /// Endpoint URL
        url: String,
        /// Retry-After hint, seconds
        retry_after_secs: u64,
    },

    /// Non-success HTTP status
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Endpoint URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Connection or protocol failure
    #[error("HTTP error for {url}: {source}")]
    Http {
        /// Endpoint URL
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// Body was not the expected JSON
    #[error("Invalid JSON from {url}: {source}")]
    Json {
        /// Endpoint URL
        url: String,
        /// Decode error
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

impl From<ProviderError> for VfxdError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidUrl { .. } | ProviderError::InvalidConfig(_) => {
                VfxdError::ConfigError(err.to_string())
            }
            ProviderError::Timeout { secs, .. } => VfxdError::TransportTimeout { seconds: secs },
            ProviderError::RateLimited {
                retry_after_secs, ..
            } => VfxdError::RateLimited { retry_after_secs },
            ProviderError::Status { url, status } => VfxdError::HttpStatus {
                endpoint: url,
                status,
            },
            ProviderError::Http { url, source } => VfxdError::Transport {
                endpoint: url,
                reason: source.without_url().to_string(),
            },
            ProviderError::Json { url, source } => VfxdError::InvalidResponse {
                endpoint: url,
                reason: source.to_string(),
            },
        }
    }
}
