//! Currency Beacon provider.
//!
//! Wraps the Currency Beacon HTTP API (`/latest`, `/historical`,
//! `/timeseries`). Responses arrive in an envelope carrying a `meta.code`
//! status alongside the HTTP status; a non-200 payload status yields an
//! empty payload rather than an error, mirroring the upstream contract.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::warn;
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::RateCache;
use crate::errors::ProviderError;
use crate::http::RetryingClient;
use crate::models::{RatesSeries, RatesSnapshot};
use crate::provider::RateProvider;
use crate::settings::ProviderSettings;

const PROVIDER_ID: &str = "CURRENCY_BEACON";

#[derive(Debug, Deserialize)]
struct Meta {
    code: u16,
}

/// Common response envelope: `{"meta": {...}, "response": {...}}`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    meta: Option<Meta>,
    response: Option<T>,
}

/// Body of `/latest` and `/historical` responses.
#[derive(Debug, Deserialize)]
struct DatedRates {
    base: Option<String>,
    date: Option<NaiveDate>,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Body of `/timeseries` responses: date -> (currency -> rate).
type SeriesBody = BTreeMap<NaiveDate, HashMap<String, f64>>;

pub struct CurrencyBeaconProvider {
    client: RetryingClient,
    base_url: String,
    api_key: String,
    cache: Arc<dyn RateCache>,
    cache_ttl: Duration,
}

impl CurrencyBeaconProvider {
    pub fn new(settings: &ProviderSettings, cache: Arc<dyn RateCache>) -> Self {
        Self {
            client: RetryingClient::new(PROVIDER_ID, settings),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            cache,
            cache_ttl: settings.cache_ttl(),
        }
    }

    fn cache_key(source: &str, target: &str) -> String {
        format!("{}/{}", source, target)
    }
}

/// Converts provider floats to decimals, dropping values that have no
/// decimal representation (NaN, infinities).
fn rates_to_decimal(rates: HashMap<String, f64>) -> BTreeMap<String, Decimal> {
    rates
        .into_iter()
        .filter_map(|(code, value)| Decimal::from_f64(value).map(|rate| (code, rate)))
        .collect()
}

fn payload_code(meta: &Option<Meta>) -> u16 {
    meta.as_ref().map(|m| m.code).unwrap_or(0)
}

#[async_trait]
impl RateProvider for CurrencyBeaconProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn spot(&self, source: &str, target: &str) -> Result<Option<Decimal>, ProviderError> {
        let key = Self::cache_key(source, target);
        if let Some(rate) = self.cache.get(&key) {
            return Ok(Some(rate));
        }

        let url = format!("{}/latest", self.base_url);
        let query = [
            ("api_key", self.api_key.as_str()),
            ("base", source),
            ("symbols", target),
        ];

        let envelope: Envelope<DatedRates> = match self.client.get_json(&url, &query).await {
            Ok(envelope) => envelope,
            Err(e) if e.is_transport() => {
                // Best-effort lookup: absence lets the caller fail over.
                warn!("Spot lookup failed on '{}': {}", PROVIDER_ID, e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if payload_code(&envelope.meta) != 200 {
            return Ok(None);
        }

        let rate = envelope
            .response
            .and_then(|body| body.rates.get(target).copied())
            .and_then(Decimal::from_f64);

        if let Some(rate) = rate {
            self.cache.put(&key, rate, self.cache_ttl);
        }

        Ok(rate)
    }

    async fn historical(
        &self,
        source: &str,
        date: NaiveDate,
        symbols: &[String],
    ) -> Result<(RatesSnapshot, u16), ProviderError> {
        let url = format!("{}/historical", self.base_url);
        let date_str = date.format("%Y-%m-%d").to_string();
        let joined = symbols.join(",");

        let mut query = vec![
            ("api_key", self.api_key.as_str()),
            ("base", source),
            ("date", date_str.as_str()),
        ];
        if !joined.is_empty() {
            query.push(("symbols", joined.as_str()));
        }

        let envelope: Envelope<DatedRates> = self.client.get_json(&url, &query).await?;
        let code = payload_code(&envelope.meta);

        if code != 200 {
            return Ok((RatesSnapshot::empty(source, date), code));
        }

        let body = envelope.response.ok_or_else(|| ProviderError::Decode {
            provider: PROVIDER_ID.to_string(),
            message: "missing response body".to_string(),
        })?;

        let snapshot = RatesSnapshot {
            base: body.base.unwrap_or_else(|| source.to_string()),
            date: body.date.unwrap_or(date),
            rates: rates_to_decimal(body.rates),
        };

        Ok((snapshot, code))
    }

    async fn timeseries(
        &self,
        source: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
        symbols: &[String],
    ) -> Result<(RatesSeries, u16), ProviderError> {
        let url = format!("{}/timeseries", self.base_url);
        let start = from_date.format("%Y-%m-%d").to_string();
        let end = to_date.format("%Y-%m-%d").to_string();
        let joined = symbols.join(",");

        let mut query = vec![
            ("api_key", self.api_key.as_str()),
            ("base", source),
            ("start_date", start.as_str()),
            ("end_date", end.as_str()),
        ];
        if !joined.is_empty() {
            query.push(("symbols", joined.as_str()));
        }

        let envelope: Envelope<SeriesBody> = self.client.get_json(&url, &query).await?;
        let code = payload_code(&envelope.meta);

        if code != 200 {
            return Ok((RatesSeries::empty(source, from_date, to_date), code));
        }

        let body = envelope.response.unwrap_or_default();
        let series = RatesSeries {
            base: source.to_string(),
            start_date: from_date,
            end_date: to_date,
            rates: body
                .into_iter()
                .map(|(date, rates)| (date, rates_to_decimal(rates)))
                .collect(),
        };

        Ok((series, code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_latest_envelope() {
        let json = r#"{
            "meta": {"code": 200},
            "response": {"base": "USD", "date": "2024-03-01", "rates": {"EUR": 0.92, "GBP": 0.79}}
        }"#;

        let envelope: Envelope<DatedRates> = serde_json::from_str(json).unwrap();
        assert_eq!(payload_code(&envelope.meta), 200);

        let body = envelope.response.unwrap();
        assert_eq!(body.base.as_deref(), Some("USD"));
        assert_eq!(body.rates.len(), 2);
    }

    #[test]
    fn test_parse_timeseries_envelope() {
        let json = r#"{
            "meta": {"code": 200},
            "response": {
                "2024-03-01": {"EUR": 0.92},
                "2024-03-02": {"EUR": 0.93}
            }
        }"#;

        let envelope: Envelope<SeriesBody> = serde_json::from_str(json).unwrap();
        let body = envelope.response.unwrap();
        assert_eq!(body.len(), 2);

        let first = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(body[&first]["EUR"], 0.92);
    }

    #[test]
    fn test_rates_to_decimal_drops_non_finite() {
        let mut rates = HashMap::new();
        rates.insert("EUR".to_string(), 0.92_f64);
        rates.insert("BAD".to_string(), f64::NAN);

        let converted = rates_to_decimal(rates);
        assert_eq!(converted.len(), 1);
        assert_eq!(converted["EUR"], dec!(0.92));
    }

    #[test]
    fn test_envelope_without_meta_is_not_success() {
        let json = r#"{"response": {"rates": {}}}"#;
        let envelope: Envelope<DatedRates> = serde_json::from_str(json).unwrap();
        assert_ne!(payload_code(&envelope.meta), 200);
    }
}
