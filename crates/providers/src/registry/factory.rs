//! Named-registration table mapping implementation keys to constructors.
//!
//! Provider configs reference their implementation by a string key (e.g.
//! `"currency_beacon"`). The factory resolves those keys to constructors
//! at registry load time, and lets the admin surface validate a key
//! before a config is accepted.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::RateCache;
use crate::provider::{CurrencyBeaconProvider, MockRateProvider, RateProvider};
use crate::settings::ProviderSettings;

/// Implementation key for [`CurrencyBeaconProvider`].
pub const CURRENCY_BEACON_KEY: &str = "currency_beacon";
/// Implementation key for [`MockRateProvider`].
pub const MOCK_KEY: &str = "mock";

type Constructor =
    Box<dyn Fn(&ProviderSettings, Arc<dyn RateCache>) -> Arc<dyn RateProvider> + Send + Sync>;

pub struct ProviderFactory {
    table: HashMap<String, Constructor>,
}

impl ProviderFactory {
    /// An empty factory with no registered implementations.
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// The default table: Currency Beacon and the mock provider.
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        factory.register(CURRENCY_BEACON_KEY, |settings, cache| {
            Arc::new(CurrencyBeaconProvider::new(settings, cache))
        });
        factory.register(MOCK_KEY, |_settings, _cache| Arc::new(MockRateProvider::new()));
        factory
    }

    /// Register (or replace) a constructor under `key`.
    pub fn register<F>(&mut self, key: &str, constructor: F)
    where
        F: Fn(&ProviderSettings, Arc<dyn RateCache>) -> Arc<dyn RateProvider>
            + Send
            + Sync
            + 'static,
    {
        self.table.insert(key.to_string(), Box::new(constructor));
    }

    /// Whether `key` resolves to a usable implementation. The admin
    /// surface calls this when validating provider configs.
    pub fn is_registered(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// Instantiate the implementation registered under `key`.
    pub fn build(
        &self,
        key: &str,
        settings: &ProviderSettings,
        cache: Arc<dyn RateCache>,
    ) -> Option<Arc<dyn RateProvider>> {
        self.table.get(key).map(|ctor| ctor(settings, cache))
    }
}

impl Default for ProviderFactory {
    fn default() -> Self {
        Self::with_defaults()
    }
}
