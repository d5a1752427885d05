//! Endpoint health tracking and failover.

use crate::config::ProviderConfig;
use crate::error::Result;
use parking_lot::Mutex;
use std::time::Instant;

/// Health status of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointHealth {
    /// Answering quickly
    Healthy,
    /// Slow or intermittently failing
    Degraded,
    /// Failing more often than not
    Unhealthy,
    /// Not yet used
    Unknown,
}

/// Statistics for one endpoint
#[derive(Debug, Clone)]
pub struct EndpointInfo {
    /// The endpoint base URL
    pub url: String,
    /// Current health status
    pub health: EndpointHealth,
    /// Last successful request time
    pub last_success: Option<Instant>,
    /// Last failed request time
    pub last_failure: Option<Instant>,
    /// Total requests made
    pub total_requests: u64,
    /// Total failures
    pub total_failures: u64,
    /// Average response time of successful requests, milliseconds
    pub avg_response_ms: u64,
}

impl EndpointInfo {
    fn new(url: String) -> Self {
        Self {
            url,
            health: EndpointHealth::Unknown,
            last_success: None,
            last_failure: None,
            total_requests: 0,
            total_failures: 0,
            avg_response_ms: 0,
        }
    }

    fn successes(&self) -> u64 {
        self.total_requests - self.total_failures
    }

    fn record_success(&mut self, response_ms: u64) {
        self.last_success = Some(Instant::now());
        self.total_requests += 1;
        let n = self.successes();
        self.avg_response_ms = (self.avg_response_ms * (n - 1) + response_ms) / n;
        self.refresh_health();
    }

    fn record_failure(&mut self) {
        self.last_failure = Some(Instant::now());
        self.total_requests += 1;
        self.total_failures += 1;
        self.refresh_health();
    }

    fn refresh_health(&mut self) {
        let failure_rate = 1.0 - self.success_rate();
        self.health = if failure_rate > 0.5 {
            EndpointHealth::Unhealthy
        } else if failure_rate > 0.2 || self.avg_response_ms >= 1000 {
            EndpointHealth::Degraded
        } else {
            EndpointHealth::Healthy
        };
    }

    /// Returns the success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            1.0
        } else {
            self.successes() as f64 / self.total_requests as f64
        }
    }
}

#[derive(Debug)]
struct EndpointState {
    endpoints: Vec<EndpointInfo>,
    current: usize,
}

/// Primary plus fallback endpoints with a moving "current" pointer.
///
/// The lock is never held across an await.
#[derive(Debug)]
pub struct EndpointSet {
    state: Mutex<EndpointState>,
}

impl EndpointSet {
    /// Builds the set from a validated config
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;
        let endpoints = config
            .all_urls()
            .into_iter()
            .map(|u| EndpointInfo::new(u.trim_end_matches('/').to_string()))
            .collect();
        Ok(Self {
            state: Mutex::new(EndpointState {
                endpoints,
                current: 0,
            }),
        })
    }

    /// Number of endpoints
    pub fn len(&self) -> usize {
        self.state.lock().endpoints.len()
    }

    /// True if there are no endpoints (never the case for a validated config)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Base URL requests should go to now
    pub fn current_url(&self) -> String {
        let state = self.state.lock();
        state.endpoints[state.current].url.clone()
    }

    /// Records a success for `url`
    pub fn record_success(&self, url: &str, response_ms: u64) {
        let mut state = self.state.lock();
        if let Some(endpoint) = state.endpoints.iter_mut().find(|e| e.url == url) {
            endpoint.record_success(response_ms);
        }
    }

    /// Records a failure for `url` and moves to the next endpoint that is
    /// not unhealthy. Returns the new current URL if it changed.
    pub fn record_failure(&self, url: &str) -> Option<String> {
        let mut state = self.state.lock();
        if let Some(endpoint) = state.endpoints.iter_mut().find(|e| e.url == url) {
            endpoint.record_failure();
        }

        let count = state.endpoints.len();
        let from = state.current;
        for step in 1..count {
            let next = (from + step) % count;
            if state.endpoints[next].health != EndpointHealth::Unhealthy {
                tracing::info!(
                    from = %state.endpoints[from].url,
                    to = %state.endpoints[next].url,
                    "failing over ledger endpoint"
                );
                state.current = next;
                return Some(state.endpoints[next].url.clone());
            }
        }
        None
    }

    /// Snapshot of endpoint statistics
    pub fn stats(&self) -> Vec<EndpointInfo> {
        self.state.lock().endpoints.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_info() {
        let mut info = EndpointInfo::new("https://example.com".into());
        assert_eq!(info.health, EndpointHealth::Unknown);
        assert_eq!(info.success_rate(), 1.0);

        info.record_success(100);
        assert_eq!(info.health, EndpointHealth::Healthy);
        assert_eq!(info.avg_response_ms, 100);

        info.record_failure();
        assert_eq!(info.total_failures, 1);
        assert_eq!(info.success_rate(), 0.5);
        assert_eq!(info.health, EndpointHealth::Degraded);

        info.record_failure();
        assert_eq!(info.health, EndpointHealth::Unhealthy);
    }

    #[test]
    fn test_slow_endpoint_degraded() {
        let mut info = EndpointInfo::new("https://slow.example".into());
        info.record_success(1500);
        assert_eq!(info.health, EndpointHealth::Degraded);
    }

    #[test]
    fn test_failover_on_failure() {
        let config = ProviderConfig::new("https://primary.example/api/")
            .with_fallback("https://fallback.example/api");
        let set = EndpointSet::new(&config).unwrap();

        assert_eq!(set.current_url(), "https://primary.example/api");
        let next = set.record_failure("https://primary.example/api");
        assert_eq!(next.as_deref(), Some("https://fallback.example/api"));
        assert_eq!(set.current_url(), "https://fallback.example/api");

        set.record_success("https://fallback.example/api", 20);
        let stats = set.stats();
        assert_eq!(stats[0].total_failures, 1);
        assert_eq!(stats[1].health, EndpointHealth::Healthy);
    }

    #[test]
    fn test_single_endpoint_has_no_failover() {
        let set = EndpointSet::new(&ProviderConfig::new("https://only.example")).unwrap();
        assert_eq!(set.record_failure("https://only.example"), None);
        assert_eq!(set.current_url(), "https://only.example");
        assert_eq!(set.len(), 1);
    }
}
