//! Mock provider producing random but well-formed rates.
//!
//! Useful for local development and as a last-resort fallback in test
//! deployments where no real API credential is configured.

use async_trait::async_trait;
use chrono::NaiveDate;
use num_traits::FromPrimitive;
use rand::Rng;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::errors::ProviderError;
use crate::models::{RatesSeries, RatesSnapshot};
use crate::provider::RateProvider;

const PROVIDER_ID: &str = "MOCK";

#[derive(Default)]
pub struct MockRateProvider;

impl MockRateProvider {
    pub fn new() -> Self {
        Self
    }

    /// A uniform random rate in [0.5, 1.5), rounded to 6 decimals.
    fn random_rate() -> Decimal {
        let value = rand::thread_rng().gen_range(0.5..1.5);
        Decimal::from_f64(value)
            .unwrap_or(Decimal::ONE)
            .round_dp(6)
    }

    fn snapshot_for(source: &str, date: NaiveDate, symbols: &[String]) -> RatesSnapshot {
        let rates: BTreeMap<String, Decimal> = symbols
            .iter()
            .map(|symbol| (symbol.clone(), Self::random_rate()))
            .collect();

        RatesSnapshot {
            base: source.to_string(),
            date,
            rates,
        }
    }
}

#[async_trait]
impl RateProvider for MockRateProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn spot(&self, _source: &str, _target: &str) -> Result<Option<Decimal>, ProviderError> {
        Ok(Some(Self::random_rate()))
    }

    async fn historical(
        &self,
        source: &str,
        date: NaiveDate,
        symbols: &[String],
    ) -> Result<(RatesSnapshot, u16), ProviderError> {
        Ok((Self::snapshot_for(source, date, symbols), 200))
    }

    async fn timeseries(
        &self,
        source: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
        symbols: &[String],
    ) -> Result<(RatesSeries, u16), ProviderError> {
        let mut rates = BTreeMap::new();
        let mut date = from_date;
        while date <= to_date {
            rates.insert(date, Self::snapshot_for(source, date, symbols).rates);
            date = match date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        let series = RatesSeries {
            base: source.to_string(),
            start_date: from_date,
            end_date: to_date,
            rates,
        };

        Ok((series, 200))
    }
}
