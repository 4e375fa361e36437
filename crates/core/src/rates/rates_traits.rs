use async_trait::async_trait;
use chrono::NaiveDate;

use super::rates_model::{ExchangeRate, NewExchangeRate};
use crate::errors::Result;
use fxhub_providers::ProviderConfig;

/// Repository interface for the rate store.
#[async_trait]
pub trait RateRepositoryTrait: Send + Sync {
    /// Exact match on pair and valuation date.
    fn get_rate(
        &self,
        source: &str,
        target: &str,
        date: NaiveDate,
    ) -> Result<Option<ExchangeRate>>;

    /// Most recent stored rate for the pair, any date.
    fn get_latest_rate(&self, source: &str, target: &str) -> Result<Option<ExchangeRate>>;

    /// Inserts or replaces the rate for (source, target, date). Implicitly
    /// registers both currencies if they are unknown.
    async fn upsert_rate(&self, rate: NewExchangeRate) -> Result<ExchangeRate>;
}

/// Repository interface for provider configurations.
#[async_trait]
pub trait ProviderConfigRepositoryTrait: Send + Sync {
    /// Active configs only, in storage order. Callers sort by priority.
    fn get_active(&self) -> Result<Vec<ProviderConfig>>;

    fn list(&self) -> Result<Vec<ProviderConfig>>;

    async fn insert(&self, config: ProviderConfig) -> Result<ProviderConfig>;

    async fn update(&self, config: ProviderConfig) -> Result<ProviderConfig>;

    async fn delete(&self, id: &str) -> Result<()>;
}
