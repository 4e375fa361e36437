//! Provider registry: ordered adapter instances with sequential failover.
//!
//! The registry is rebuilt from the active provider configs on every
//! resolution request, trading instantiation cost for always-current
//! priority and active state.

mod factory;

pub use factory::{ProviderFactory, CURRENCY_BEACON_KEY, MOCK_KEY};

use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::cache::RateCache;
use crate::models::ProviderConfig;
use crate::provider::RateProvider;
use crate::settings::ProviderSettings;

/// An ordered list of live provider adapters.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn RateProvider>>,
}

impl ProviderRegistry {
    /// Build a registry from pre-instantiated adapters, kept in the
    /// given order.
    pub fn new(providers: Vec<Arc<dyn RateProvider>>) -> Self {
        Self { providers }
    }

    /// Instantiate adapters for the active configs, ascending by
    /// priority (lower value tried first).
    ///
    /// A config whose implementation key is not registered is skipped
    /// with a warning; it never aborts loading the rest.
    pub fn from_configs(
        configs: &[ProviderConfig],
        factory: &ProviderFactory,
        settings: &ProviderSettings,
        cache: Arc<dyn RateCache>,
    ) -> Self {
        let mut active: Vec<&ProviderConfig> = configs.iter().filter(|c| c.active).collect();
        active.sort_by_key(|c| c.priority);

        let mut providers = Vec::with_capacity(active.len());
        for config in active {
            match factory.build(&config.implementation, settings, cache.clone()) {
                Some(provider) => providers.push(provider),
                None => warn!(
                    "Skipping provider config '{}': implementation '{}' is not registered",
                    config.name, config.implementation
                ),
            }
        }

        Self { providers }
    }

    /// The adapters, in failover order.
    pub fn providers(&self) -> &[Arc<dyn RateProvider>] {
        &self.providers
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Sequential failover spot lookup.
    ///
    /// The first provider returning a rate wins, regardless of what later
    /// providers might say. Transport errors and empty answers are logged
    /// and absorbed; exhaustion returns `None`.
    pub async fn spot_rate(&self, source: &str, target: &str) -> Option<(Decimal, &'static str)> {
        for provider in &self.providers {
            match provider.spot(source, target).await {
                Ok(Some(rate)) => {
                    debug!(
                        "Provider '{}' answered {}/{} = {}",
                        provider.id(),
                        source,
                        target,
                        rate
                    );
                    return Some((rate, provider.id()));
                }
                Ok(None) => {
                    debug!(
                        "Provider '{}' has no rate for {}/{}, trying next",
                        provider.id(),
                        source,
                        target
                    );
                }
                Err(e) => {
                    warn!(
                        "Provider '{}' failed for {}/{}: {}, trying next",
                        provider.id(),
                        source,
                        target,
                        e
                    );
                }
            }
        }

        None
    }
}
