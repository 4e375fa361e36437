use async_trait::async_trait;

use super::currencies_model::{Currency, CurrencyUpdate, NewCurrency};
use crate::errors::Result;

/// Repository interface for currency persistence.
///
/// Reads are synchronous against the pool; writes go through the single
/// writer and are therefore async.
#[async_trait]
pub trait CurrencyRepositoryTrait: Send + Sync {
    /// Looks up a currency by its normalized code.
    fn get_by_code(&self, code: &str) -> Result<Option<Currency>>;

    fn list(&self) -> Result<Vec<Currency>>;

    /// Returns the existing row for `code`, inserting a bare one if absent.
    async fn get_or_create(&self, code: &str) -> Result<Currency>;

    async fn create(&self, currency: NewCurrency) -> Result<Currency>;

    async fn update(&self, code: &str, update: CurrencyUpdate) -> Result<Currency>;

    async fn delete(&self, code: &str) -> Result<()>;
}
