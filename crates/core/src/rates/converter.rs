use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::rates_model::{ConversionEntry, ExchangeRate};
use super::rates_traits::RateRepositoryTrait;
use super::resolver::RateResolver;
use crate::constants::{AMOUNT_SCALE, UNAVAILABLE};
use crate::currencies::{validate_currency_code, CurrencyRepositoryTrait};
use crate::errors::{Error, Result};

/// Converts one amount into many target currencies in a single call.
///
/// Stored rates are preferred; a target with no stored rate triggers a live
/// resolution. Targets that still cannot be priced come back as `"N/A"`
/// lines rather than failing the whole batch.
#[derive(Clone)]
pub struct ConverterService {
    currencies: Arc<dyn CurrencyRepositoryTrait>,
    rates: Arc<dyn RateRepositoryTrait>,
    resolver: RateResolver,
}

impl ConverterService {
    pub fn new(
        currencies: Arc<dyn CurrencyRepositoryTrait>,
        rates: Arc<dyn RateRepositoryTrait>,
        resolver: RateResolver,
    ) -> Self {
        Self {
            currencies,
            rates,
            resolver,
        }
    }

    /// Converts `amount` of `source` into every requested target.
    ///
    /// With an empty `targets` list, every registered currency except the
    /// source is used. Unlike resolution, the source must already be
    /// registered; an unknown source is the caller's mistake, not a cue to
    /// create it.
    pub async fn convert(
        &self,
        source: &str,
        amount: Decimal,
        targets: &[String],
    ) -> Result<Vec<ConversionEntry>> {
        let source = validate_currency_code(source)?;
        if self.currencies.get_by_code(&source)?.is_none() {
            return Err(Error::CurrencyNotFound(source));
        }

        let targets: Vec<String> = if targets.is_empty() {
            self.currencies
                .list()?
                .into_iter()
                .map(|c| c.code)
                .filter(|code| code != &source)
                .collect()
        } else {
            let mut validated = Vec::with_capacity(targets.len());
            for target in targets {
                let target = validate_currency_code(target)?;
                if self.currencies.get_by_code(&target)?.is_none() {
                    return Err(Error::CurrencyNotFound(target));
                }
                validated.push(target);
            }
            validated
        };

        let mut entries = Vec::with_capacity(targets.len());
        for target in targets {
            if target == source {
                continue;
            }
            entries.push(self.convert_one(&source, &target, amount).await?);
        }

        Ok(entries)
    }

    async fn convert_one(
        &self,
        source: &str,
        target: &str,
        amount: Decimal,
    ) -> Result<ConversionEntry> {
        let symbol = self
            .currencies
            .get_by_code(target)?
            .map(|c| c.symbol)
            .unwrap_or_default();

        let rate = match self.rates.get_latest_rate(source, target)? {
            Some(stored) => Some(stored),
            None => match self.resolver.resolve(source, target, None).await {
                Ok(resolved) => Some(resolved),
                Err(Error::RateUnavailable { .. }) => {
                    debug!("No obtainable rate for {}/{}", source, target);
                    None
                }
                Err(e) => return Err(e),
            },
        };

        Ok(match rate {
            Some(ExchangeRate { rate_value, .. }) => ConversionEntry {
                target_currency: target.to_string(),
                converted_amount: (amount * rate_value).round_dp(AMOUNT_SCALE).to_string(),
                rate_value: rate_value.to_string(),
                symbol,
            },
            None => ConversionEntry {
                target_currency: target.to_string(),
                converted_amount: UNAVAILABLE.to_string(),
                rate_value: UNAVAILABLE.to_string(),
                symbol,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::rates_model::NewExchangeRate;
    use super::super::rates_traits::ProviderConfigRepositoryTrait;
    use crate::currencies::{Currency, CurrencyUpdate, NewCurrency};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use fxhub_providers::{InMemoryRateCache, ProviderConfig, ProviderFactory, ProviderSettings};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct SeededCurrencyRepository {
        rows: Mutex<HashMap<String, Currency>>,
    }

    impl SeededCurrencyRepository {
        fn with(entries: &[(&str, &str)]) -> Arc<Self> {
            let rows = entries
                .iter()
                .map(|(code, symbol)| {
                    (
                        code.to_string(),
                        Currency {
                            code: code.to_string(),
                            name: String::new(),
                            symbol: symbol.to_string(),
                        },
                    )
                })
                .collect();
            Arc::new(Self {
                rows: Mutex::new(rows),
            })
        }
    }

    #[async_trait]
    impl CurrencyRepositoryTrait for SeededCurrencyRepository {
        fn get_by_code(&self, code: &str) -> Result<Option<Currency>> {
            Ok(self.rows.lock().unwrap().get(code).cloned())
        }

        fn list(&self) -> Result<Vec<Currency>> {
            let mut all: Vec<_> = self.rows.lock().unwrap().values().cloned().collect();
            all.sort_by(|a, b| a.code.cmp(&b.code));
            Ok(all)
        }

        async fn get_or_create(&self, code: &str) -> Result<Currency> {
            let mut rows = self.rows.lock().unwrap();
            Ok(rows
                .entry(code.to_string())
                .or_insert_with(|| Currency {
                    code: code.to_string(),
                    name: String::new(),
                    symbol: String::new(),
                })
                .clone())
        }

        async fn create(&self, currency: NewCurrency) -> Result<Currency> {
            Ok(Currency {
                code: currency.code,
                name: currency.name,
                symbol: currency.symbol,
            })
        }

        async fn update(&self, _code: &str, _update: CurrencyUpdate) -> Result<Currency> {
            unimplemented!("not used by the converter")
        }

        async fn delete(&self, _code: &str) -> Result<()> {
            unimplemented!("not used by the converter")
        }
    }

    #[derive(Default)]
    struct SeededRateRepository {
        rows: Mutex<HashMap<(String, String, NaiveDate), ExchangeRate>>,
    }

    impl SeededRateRepository {
        fn with(entries: &[(&str, &str, NaiveDate, Decimal)]) -> Arc<Self> {
            let rows = entries
                .iter()
                .map(|(s, t, d, r)| {
                    (
                        (s.to_string(), t.to_string(), *d),
                        ExchangeRate {
                            source_currency: s.to_string(),
                            target_currency: t.to_string(),
                            valuation_date: *d,
                            rate_value: *r,
                        },
                    )
                })
                .collect();
            Arc::new(Self {
                rows: Mutex::new(rows),
            })
        }
    }

    #[async_trait]
    impl RateRepositoryTrait for SeededRateRepository {
        fn get_rate(
            &self,
            source: &str,
            target: &str,
            date: NaiveDate,
        ) -> Result<Option<ExchangeRate>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .get(&(source.to_string(), target.to_string(), date))
                .cloned())
        }

        fn get_latest_rate(&self, source: &str, target: &str) -> Result<Option<ExchangeRate>> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .values()
                .filter(|r| r.source_currency == source && r.target_currency == target)
                .max_by_key(|r| r.valuation_date)
                .cloned())
        }

        async fn upsert_rate(&self, rate: NewExchangeRate) -> Result<ExchangeRate> {
            let row = ExchangeRate {
                source_currency: rate.source_currency,
                target_currency: rate.target_currency,
                valuation_date: rate.valuation_date,
                rate_value: rate.rate_value,
            };
            self.rows.lock().unwrap().insert(
                (
                    row.source_currency.clone(),
                    row.target_currency.clone(),
                    row.valuation_date,
                ),
                row.clone(),
            );
            Ok(row)
        }
    }

    struct NoConfigRepository;

    #[async_trait]
    impl ProviderConfigRepositoryTrait for NoConfigRepository {
        fn get_active(&self) -> Result<Vec<ProviderConfig>> {
            Ok(Vec::new())
        }

        fn list(&self) -> Result<Vec<ProviderConfig>> {
            Ok(Vec::new())
        }

        async fn insert(&self, config: ProviderConfig) -> Result<ProviderConfig> {
            Ok(config)
        }

        async fn update(&self, config: ProviderConfig) -> Result<ProviderConfig> {
            Ok(config)
        }

        async fn delete(&self, _id: &str) -> Result<()> {
            Ok(())
        }
    }

    fn converter(
        currencies: Arc<SeededCurrencyRepository>,
        rates: Arc<SeededRateRepository>,
    ) -> ConverterService {
        let resolver = RateResolver::new(
            rates.clone(),
            currencies.clone(),
            Arc::new(NoConfigRepository),
            Arc::new(ProviderFactory::with_defaults()),
            ProviderSettings::default(),
            Arc::new(InMemoryRateCache::new()),
        );
        ConverterService::new(currencies, rates, resolver)
    }

    #[tokio::test]
    async fn test_converts_with_stored_rates_and_rounds_amounts() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let currencies = SeededCurrencyRepository::with(&[("USD", "$"), ("EUR", "€")]);
        let rates = SeededRateRepository::with(&[("USD", "EUR", date, dec!(0.925511))]);

        let entries = converter(currencies, rates)
            .convert("USD", dec!(100), &["EUR".to_string()])
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].target_currency, "EUR");
        assert_eq!(entries[0].converted_amount, "92.55");
        assert_eq!(entries[0].rate_value, "0.925511");
        assert_eq!(entries[0].symbol, "€");
    }

    #[tokio::test]
    async fn test_unresolvable_target_yields_placeholder_line() {
        let currencies = SeededCurrencyRepository::with(&[("USD", "$"), ("JPY", "¥")]);
        let rates = Arc::new(SeededRateRepository::default());

        let entries = converter(currencies, rates)
            .convert("USD", dec!(50), &["JPY".to_string()])
            .await
            .unwrap();

        assert_eq!(entries[0].converted_amount, UNAVAILABLE);
        assert_eq!(entries[0].rate_value, UNAVAILABLE);
        assert_eq!(entries[0].symbol, "¥");
    }

    #[tokio::test]
    async fn test_mixed_batch_keeps_numeric_and_placeholder_lines() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let currencies =
            SeededCurrencyRepository::with(&[("USD", "$"), ("EUR", "€"), ("JPY", "¥")]);
        let rates = SeededRateRepository::with(&[("USD", "EUR", date, dec!(0.92))]);

        let entries = converter(currencies, rates)
            .convert("USD", dec!(100), &["EUR".to_string(), "JPY".to_string()])
            .await
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].converted_amount, "92.00");
        assert_eq!(entries[1].converted_amount, UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_empty_targets_expands_to_all_other_currencies() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let currencies =
            SeededCurrencyRepository::with(&[("USD", "$"), ("EUR", "€"), ("GBP", "£")]);
        let rates = SeededRateRepository::with(&[
            ("USD", "EUR", date, dec!(0.92)),
            ("USD", "GBP", date, dec!(0.79)),
        ]);

        let entries = converter(currencies, rates)
            .convert("USD", dec!(10), &[])
            .await
            .unwrap();

        let targets: Vec<_> = entries.iter().map(|e| e.target_currency.as_str()).collect();
        assert_eq!(targets, vec!["EUR", "GBP"]);
    }

    #[tokio::test]
    async fn test_unknown_explicit_target_is_rejected() {
        let currencies = SeededCurrencyRepository::with(&[("USD", "$")]);
        let rates = Arc::new(SeededRateRepository::default());

        let err = converter(currencies, rates)
            .convert("USD", dec!(1), &["XXX".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CurrencyNotFound(code) if code == "XXX"));
    }

    #[tokio::test]
    async fn test_unknown_source_is_rejected() {
        let currencies = SeededCurrencyRepository::with(&[("EUR", "€")]);
        let rates = SeededRateRepository::with(&[]);

        let err = converter(currencies, rates)
            .convert("USD", dec!(1), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CurrencyNotFound(code) if code == "USD"));
    }
}
