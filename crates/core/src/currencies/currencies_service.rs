use std::sync::Arc;

use super::currencies_model::{
    validate_currency_code, Currency, CurrencyUpdate, NewCurrency,
};
use super::currencies_traits::CurrencyRepositoryTrait;
use crate::errors::{Error, Result};

/// CRUD over registered currencies.
///
/// Unlike rate resolution, which creates currency rows on demand, this
/// service is strict: operations on a code that does not exist fail with
/// [`Error::CurrencyNotFound`].
#[derive(Clone)]
pub struct CurrencyService {
    repository: Arc<dyn CurrencyRepositoryTrait>,
}

impl CurrencyService {
    pub fn new(repository: Arc<dyn CurrencyRepositoryTrait>) -> Self {
        Self { repository }
    }

    pub fn get_currency(&self, code: &str) -> Result<Currency> {
        let code = validate_currency_code(code)?;
        self.repository
            .get_by_code(&code)?
            .ok_or(Error::CurrencyNotFound(code))
    }

    pub fn list_currencies(&self) -> Result<Vec<Currency>> {
        self.repository.list()
    }

    pub async fn create_currency(&self, mut currency: NewCurrency) -> Result<Currency> {
        currency.code = validate_currency_code(&currency.code)?;
        self.repository.create(currency).await
    }

    pub async fn update_currency(&self, code: &str, update: CurrencyUpdate) -> Result<Currency> {
        let code = validate_currency_code(code)?;
        if self.repository.get_by_code(&code)?.is_none() {
            return Err(Error::CurrencyNotFound(code));
        }
        self.repository.update(&code, update).await
    }

    pub async fn delete_currency(&self, code: &str) -> Result<()> {
        let code = validate_currency_code(code)?;
        if self.repository.get_by_code(&code)?.is_none() {
            return Err(Error::CurrencyNotFound(code));
        }
        self.repository.delete(&code).await
    }
}
