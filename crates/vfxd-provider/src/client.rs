//! REST client with connection pooling and rate limiting.

use crate::config::{HttpClientConfig, RateLimitConfig};
use crate::error::{ProviderError, Result};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use vfxd_resilience::HttpRetryClassifier;

/// JSON-over-HTTP client for the ledger API
pub struct RestClient {
    client: Client,
    rate_limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    timeout_secs: u64,
    requests: AtomicU64,
}

impl RestClient {
    /// Creates a client with default configuration and no rate limit
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default(), None)
    }

    /// Creates a client with custom configuration
    pub fn with_config(
        http_config: HttpClientConfig,
        rate_limit: Option<RateLimitConfig>,
    ) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(http_config.pool_max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(http_config.pool_idle_timeout_secs))
            .connect_timeout(Duration::from_secs(http_config.connect_timeout_secs))
            .timeout(Duration::from_secs(http_config.request_timeout_secs))
            .user_agent(&http_config.user_agent)
            .gzip(http_config.gzip)
            .build()
            .map_err(|e| ProviderError::InvalidConfig(e.to_string()))?;

        let rate_limiter = match rate_limit {
            Some(config) => {
                let per_second = NonZeroU32::new(config.requests_per_second).ok_or_else(|| {
                    ProviderError::InvalidConfig("requests_per_second must be non-zero".into())
                })?;
                let burst = NonZeroU32::new(config.burst_size).ok_or_else(|| {
                    ProviderError::InvalidConfig("burst_size must be non-zero".into())
                })?;
                Some(RateLimiter::direct(
                    Quota::per_second(per_second).allow_burst(burst),
                ))
            }
            None => None,
        };

        Ok(Self {
            client,
            rate_limiter,
            timeout_secs: http_config.request_timeout_secs,
            requests: AtomicU64::new(0),
        })
    }

    /// GET a JSON document. `404 Not Found` yields `Ok(None)`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        self.throttle().await;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(url, "ledger resource not found");
            return Ok(None);
        }
        let response = Self::check_status(url, response)?;
        self.decode(url, response).await.map(Some)
    }

    /// POST a JSON body and decode the JSON reply.
    ///
    /// Client errors other than 404/408/425/429 still have their body decoded,
    /// since the ledger reports rejections that way.
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.throttle().await;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        let status = response.status();
        let carries_rejection = status.is_client_error()
            && status != StatusCode::NOT_FOUND
            && !HttpRetryClassifier::is_status_retryable(status.as_u16());
        if carries_rejection {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| self.transport_error(url, e))?;
            return serde_json::from_slice(&bytes).map_err(|_| ProviderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let response = Self::check_status(url, response)?;
        self.decode(url, response).await
    }

    /// Requests issued so far
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    async fn throttle(&self) {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    fn check_status(url: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if HttpRetryClassifier::is_rate_limited(status.as_u16()) {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(HttpRetryClassifier::parse_retry_after)
                .map(|d| d.as_secs())
                .unwrap_or(1);
            return Err(ProviderError::RateLimited {
                url: url.to_string(),
                retry_after_secs,
            });
        }
        Err(ProviderError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }

    async fn decode<T: DeserializeOwned>(&self, url: &str, response: Response) -> Result<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(url, e))?;
        serde_json::from_slice(&bytes).map_err(|source| ProviderError::Json {
            url: url.to_string(),
            source,
        })
    }

    fn transport_error(&self, url: &str, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout {
                url: url.to_string(),
                secs: self.timeout_secs,
            }
        } else {
            ProviderError::Http {
                url: url.to_string(),
                source: err,
            }
        }
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("request_count", &self.request_count())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
