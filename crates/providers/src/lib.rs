//! Exchange rate provider adapters.
//!
//! This crate hosts the outward-facing half of rate resolution: the
//! [`RateProvider`] capability trait, concrete adapters (Currency Beacon
//! and a mock), the TTL spot cache, the retrying HTTP client, and the
//! priority-ordered [`ProviderRegistry`] with its construction factory.

pub mod cache;
pub mod errors;
pub mod http;
pub mod models;
pub mod provider;
pub mod registry;
pub mod settings;

pub use cache::{InMemoryRateCache, RateCache};
pub use errors::ProviderError;
pub use models::{ProviderConfig, RatesSeries, RatesSnapshot};
pub use provider::{CurrencyBeaconProvider, MockRateProvider, RateProvider};
pub use registry::{ProviderFactory, ProviderRegistry, CURRENCY_BEACON_KEY, MOCK_KEY};
pub use settings::ProviderSettings;
