use chrono::{NaiveDate, Utc};
use log::{debug, info};
use std::sync::Arc;

use super::rates_model::{truncate_rate, ExchangeRate, NewExchangeRate};
use super::rates_traits::{ProviderConfigRepositoryTrait, RateRepositoryTrait};
use crate::currencies::{validate_currency_code, CurrencyRepositoryTrait};
use crate::errors::{Error, Result};
use fxhub_providers::{ProviderFactory, ProviderRegistry, ProviderSettings, RateCache};

/// Resolves a rate for a pair and date, store first, providers second.
///
/// Resolution walks a fixed sequence: normalize the pair, register both
/// currencies, answer from the store when it already holds the exact date,
/// otherwise fail over across the active providers and persist the winner.
/// The registry is rebuilt from the config table on every provider pass so
/// priority or activation changes take effect immediately.
#[derive(Clone)]
pub struct RateResolver {
    rates: Arc<dyn RateRepositoryTrait>,
    currencies: Arc<dyn CurrencyRepositoryTrait>,
    provider_configs: Arc<dyn ProviderConfigRepositoryTrait>,
    factory: Arc<ProviderFactory>,
    settings: ProviderSettings,
    cache: Arc<dyn RateCache>,
}

impl RateResolver {
    pub fn new(
        rates: Arc<dyn RateRepositoryTrait>,
        currencies: Arc<dyn CurrencyRepositoryTrait>,
        provider_configs: Arc<dyn ProviderConfigRepositoryTrait>,
        factory: Arc<ProviderFactory>,
        settings: ProviderSettings,
        cache: Arc<dyn RateCache>,
    ) -> Self {
        Self {
            rates,
            currencies,
            provider_configs,
            factory,
            settings,
            cache,
        }
    }

    /// Resolves the rate for `source`/`target` on `date` (today if `None`).
    ///
    /// A stored rate for the exact date wins without touching any provider
    /// or even loading provider configs. Otherwise the first provider in
    /// priority order to answer supplies the rate, which is truncated and
    /// persisted before being returned. Persistence failures surface; a
    /// resolved rate that cannot be stored is an error, not a result.
    pub async fn resolve(
        &self,
        source: &str,
        target: &str,
        date: Option<NaiveDate>,
    ) -> Result<ExchangeRate> {
        let source = validate_currency_code(source)?;
        let target = validate_currency_code(target)?;

        self.currencies.get_or_create(&source).await?;
        self.currencies.get_or_create(&target).await?;

        let date = date.unwrap_or_else(|| Utc::now().date_naive());

        if let Some(stored) = self.rates.get_rate(&source, &target, date)? {
            debug!("Store hit for {}/{} on {}", source, target, date);
            return Ok(stored);
        }

        let configs = self.provider_configs.get_active()?;
        let registry = ProviderRegistry::from_configs(
            &configs,
            &self.factory,
            &self.settings,
            self.cache.clone(),
        );

        let (rate, provider_id) = registry
            .spot_rate(&source, &target)
            .await
            .ok_or_else(|| Error::RateUnavailable {
                source: source.clone(),
                target: target.clone(),
            })?;

        info!(
            "Resolved {}/{} on {} from provider '{}'",
            source, target, date, provider_id
        );

        self.rates
            .upsert_rate(NewExchangeRate {
                source_currency: source,
                target_currency: target,
                valuation_date: date,
                rate_value: truncate_rate(rate),
            })
            .await
    }
}
