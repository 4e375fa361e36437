use chrono::NaiveDate;
use log::info;
use std::sync::Arc;

use super::rates_model::{
    truncate_rate, HistoricalRatesQuery, NewExchangeRate, TimeseriesEntry, TimeseriesQuery,
};
use super::rates_traits::{ProviderConfigRepositoryTrait, RateRepositoryTrait};
use crate::currencies::{validate_currency_code, CurrencyRepositoryTrait};
use crate::errors::{Error, Result, ValidationError};
use fxhub_providers::{
    ProviderError, ProviderFactory, ProviderRegistry, ProviderSettings, RateCache, RateProvider,
    RatesSnapshot,
};

/// Historical and timeseries fetches through the highest-priority provider.
///
/// These are pass-through reads: nothing is persisted unless the caller
/// forwards the snapshot to [`save_snapshot`]. Unlike spot resolution there
/// is no failover here; the non-200 payload surfaces as an error so the
/// caller can see which provider refused and why.
#[derive(Clone)]
pub struct RatesService {
    provider_configs: Arc<dyn ProviderConfigRepositoryTrait>,
    factory: Arc<ProviderFactory>,
    settings: ProviderSettings,
    cache: Arc<dyn RateCache>,
}

impl RatesService {
    pub fn new(
        provider_configs: Arc<dyn ProviderConfigRepositoryTrait>,
        factory: Arc<ProviderFactory>,
        settings: ProviderSettings,
        cache: Arc<dyn RateCache>,
    ) -> Self {
        Self {
            provider_configs,
            factory,
            settings,
            cache,
        }
    }

    fn first_provider(&self) -> Result<Arc<dyn RateProvider>> {
        let configs = self.provider_configs.get_active()?;
        let registry = ProviderRegistry::from_configs(
            &configs,
            &self.factory,
            &self.settings,
            self.cache.clone(),
        );

        registry
            .providers()
            .first()
            .cloned()
            .ok_or_else(|| Error::Unexpected("no active provider configured".to_string()))
    }

    /// All rates for the query's base on a single past date.
    pub async fn historical_rates(&self, query: HistoricalRatesQuery) -> Result<RatesSnapshot> {
        let base = validate_currency_code(required(&query.base, "base")?)?;
        let date = parse_date(required(&query.date, "date")?)?;
        let symbols = validate_symbols(&query.symbols)?;

        let provider = self.first_provider()?;
        let (snapshot, code) = provider.historical(&base, date, &symbols).await?;

        if code != 200 {
            return Err(ProviderError::Http {
                provider: provider.id().to_string(),
                status: code,
            }
            .into());
        }

        Ok(snapshot)
    }

    /// Daily observations over an inclusive date range, flattened into one
    /// entry per (currency, date).
    pub async fn timeseries_rates(&self, query: TimeseriesQuery) -> Result<Vec<TimeseriesEntry>> {
        let base = validate_currency_code(required(&query.base, "base")?)?;
        let start = parse_date(required(&query.start_date, "startDate")?)?;
        let end = parse_date(required(&query.end_date, "endDate")?)?;
        if start > end {
            return Err(ValidationError::InvalidInput(format!(
                "start date {} is after end date {}",
                start, end
            ))
            .into());
        }
        let symbols = validate_symbols(&query.symbols)?;

        let provider = self.first_provider()?;
        let (series, code) = provider.timeseries(&base, start, end, &symbols).await?;

        if code != 200 {
            return Err(ProviderError::Http {
                provider: provider.id().to_string(),
                status: code,
            }
            .into());
        }

        let mut entries = Vec::new();
        for (date, rates) in series.rates {
            for (currency, rate) in rates {
                entries.push(TimeseriesEntry {
                    base: base.clone(),
                    currency,
                    date,
                    rate,
                });
            }
        }

        Ok(entries)
    }
}

/// Persists every rate of a snapshot, registering unknown currencies.
///
/// Rates are truncated to the storage scale before the upsert. Used by the
/// backfill job after a successful provider fetch.
pub async fn save_snapshot(
    snapshot: &RatesSnapshot,
    rates: &Arc<dyn RateRepositoryTrait>,
    currencies: &Arc<dyn CurrencyRepositoryTrait>,
) -> Result<usize> {
    currencies.get_or_create(&snapshot.base).await?;

    let mut saved = 0;
    for (target, rate) in &snapshot.rates {
        currencies.get_or_create(target).await?;
        rates
            .upsert_rate(NewExchangeRate {
                source_currency: snapshot.base.clone(),
                target_currency: target.clone(),
                valuation_date: snapshot.date,
                rate_value: truncate_rate(*rate),
            })
            .await?;
        saved += 1;
    }

    info!(
        "Saved {} rates for base '{}' on {}",
        saved, snapshot.base, snapshot.date
    );
    Ok(saved)
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field.to_string()).into());
    }
    Ok(trimmed)
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(input, "%Y-%m-%d")?)
}

fn validate_symbols(symbols: &[String]) -> Result<Vec<String>> {
    symbols
        .iter()
        .map(|s| validate_currency_code(s).map_err(Error::from))
        .collect()
}
