//! Builder for configuring dashboard instances.

use std::sync::Arc;
use std::time::Duration;

use crate::api::{DashboardApi, HttpApiClient};
use crate::cache::StaleTime;
use crate::error::ComandaError;
use crate::Result;

use super::Dashboard;

/// Main entry point for creating dashboard instances.
pub struct Comanda;

impl Comanda {
    /// Create a new builder for configuring the dashboard.
    pub fn builder() -> ComandaBuilder {
        ComandaBuilder::new()
    }
}

/// Builder for configuring dashboard instances.
pub struct ComandaBuilder {
    base_url: Option<String>,
    api: Option<Arc<dyn DashboardApi>>,
    timeout: Option<Duration>,
    stale_time: StaleTime,
}

impl ComandaBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            api: None,
            timeout: None,
            stale_time: StaleTime::default(),
        }
    }

    /// Base URL of the remote dashboard API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Use a custom [`DashboardApi`] implementation instead of the HTTP
    /// client (e.g. a stub in tests). Takes precedence over `base_url`.
    pub fn api(mut self, api: Arc<dyn DashboardApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Request timeout for the HTTP client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Freshness horizon for listings and metrics. Defaults to always
    /// revalidating; profile and restaurant data is session-cached
    /// regardless.
    pub fn stale_time(mut self, stale_time: StaleTime) -> Self {
        self.stale_time = stale_time;
        self
    }

    /// Build the dashboard.
    pub fn build(self) -> Result<Dashboard> {
        let api: Arc<dyn DashboardApi> = match (self.api, self.base_url) {
            (Some(api), _) => api,
            (None, Some(base_url)) => {
                let client = match self.timeout {
                    Some(timeout) => HttpApiClient::with_timeout(base_url, timeout)?,
                    None => HttpApiClient::new(base_url)?,
                };
                Arc::new(client)
            }
            (None, None) => {
                return Err(ComandaError::Configuration(
                    "either base_url or a custom api implementation is required".into(),
                ));
            }
        };
        Ok(Dashboard::new(api, self.stale_time))
    }
}

impl Default for ComandaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_without_api_or_url_fails() {
        let result = Comanda::builder().build();
        assert!(matches!(result, Err(ComandaError::Configuration(_))));
    }

    #[test]
    fn build_with_base_url_succeeds() {
        let dashboard = Comanda::builder()
            .base_url("http://localhost:3333/")
            .timeout(Duration::from_secs(5))
            .build();
        assert!(dashboard.is_ok());
    }
}
