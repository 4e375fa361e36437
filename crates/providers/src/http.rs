//! HTTP transport with bounded retry and exponential backoff.

use log::warn;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::settings::ProviderSettings;

/// Server-side statuses worth retrying. Client errors (4xx) are the
/// caller's fault and are never retried.
const RETRYABLE_STATUSES: &[u16] = &[500, 502, 503, 504];

/// A reqwest wrapper that retries 5xx responses with exponential backoff.
///
/// The delay before retry `n` (0-based) is `backoff_factor * 2^n` seconds.
/// Transport failures (connect, DNS, timeout) propagate immediately.
pub struct RetryingClient {
    provider: &'static str,
    client: Client,
    max_retries: u32,
    backoff_factor: f64,
}

impl RetryingClient {
    pub fn new(provider: &'static str, settings: &ProviderSettings) -> Self {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            provider,
            client,
            max_retries: settings.max_retries,
            backoff_factor: settings.backoff_factor,
        }
    }

    /// GET `url` with `query` parameters and decode the JSON body.
    ///
    /// Retries up to `max_retries` times on 500/502/503/504; any other
    /// non-success status is returned as [`ProviderError::Http`] at once.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let mut attempt: u32 = 0;

        loop {
            let response = self
                .client
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(|e| ProviderError::from_reqwest(self.provider, e))?;

            let status = response.status().as_u16();

            if RETRYABLE_STATUSES.contains(&status) && attempt < self.max_retries {
                let delay = self.backoff_delay(attempt);
                warn!(
                    "Provider '{}' returned HTTP {}, retrying in {:?} (attempt {}/{})",
                    self.provider,
                    status,
                    delay,
                    attempt + 1,
                    self.max_retries
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            if !response.status().is_success() {
                return Err(ProviderError::Http {
                    provider: self.provider.to_string(),
                    status,
                });
            }

            return response.json::<T>().await.map_err(|e| ProviderError::Decode {
                provider: self.provider.to_string(),
                message: e.to_string(),
            });
        }
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        Duration::from_secs_f64(self.backoff_factor * 2f64.powi(attempt as i32))
    }
}
