//! Provider configuration injected into adapters at construction time.

use serde::Deserialize;
use std::time::Duration;

/// Externally supplied settings for provider adapters.
///
/// The base endpoint and access credential are deployment-specific; the
/// retry/backoff and cache knobs bound the adapter's external call volume.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderSettings {
    /// Base URL of the Currency Beacon API.
    pub base_url: String,
    /// API access key.
    pub api_key: String,
    /// Per-request timeout, in seconds.
    pub request_timeout_secs: u64,
    /// Maximum automatic retries for server-side (5xx) failures.
    pub max_retries: u32,
    /// Exponential backoff factor, in seconds. The delay before retry `n`
    /// is `backoff_factor * 2^n`.
    pub backoff_factor: f64,
    /// Time-to-live for cached spot rates, in seconds.
    pub cache_ttl_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.currencybeacon.com/v1".to_string(),
            api_key: String::new(),
            request_timeout_secs: 10,
            max_retries: 3,
            backoff_factor: 0.3,
            cache_ttl_secs: 300,
        }
    }
}

impl ProviderSettings {
    /// Request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Spot cache TTL as a `Duration`.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
