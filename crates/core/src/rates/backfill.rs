use chrono::NaiveDate;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

use super::rates_service::save_snapshot;
use super::rates_traits::RateRepositoryTrait;
use crate::constants::{DEFAULT_BACKFILL_DELAY_SECS, DEFAULT_BACKFILL_RETRIES};
use crate::currencies::CurrencyRepositoryTrait;
use crate::errors::{Error, Result};
use fxhub_providers::RateProvider;

/// Scheduled job that fetches a full historical snapshot and persists it.
///
/// An attempt counts as failed when the provider errors, answers with a
/// non-200 payload, or returns an empty snapshot. Failed attempts are
/// retried after a fixed pause, up to `max_retries` retries beyond the
/// first call.
pub struct BackfillJob {
    provider: Arc<dyn RateProvider>,
    rates: Arc<dyn RateRepositoryTrait>,
    currencies: Arc<dyn CurrencyRepositoryTrait>,
    max_retries: u32,
    retry_delay: Duration,
}

impl BackfillJob {
    pub fn new(
        provider: Arc<dyn RateProvider>,
        rates: Arc<dyn RateRepositoryTrait>,
        currencies: Arc<dyn CurrencyRepositoryTrait>,
    ) -> Self {
        Self {
            provider,
            rates,
            currencies,
            max_retries: DEFAULT_BACKFILL_RETRIES,
            retry_delay: Duration::from_secs(DEFAULT_BACKFILL_DELAY_SECS),
        }
    }

    pub fn with_retry_policy(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Runs the backfill for `base` on `date`, returning how many rates
    /// were stored.
    pub async fn run(&self, base: &str, date: NaiveDate, symbols: &[String]) -> Result<usize> {
        let attempts = self.max_retries + 1;

        for attempt in 1..=attempts {
            match self.provider.historical(base, date, symbols).await {
                Ok((snapshot, 200)) if !snapshot.is_empty() => {
                    info!(
                        "Backfill for '{}' on {} succeeded on attempt {}",
                        base, date, attempt
                    );
                    return save_snapshot(&snapshot, &self.rates, &self.currencies).await;
                }
                Ok((_, code)) => {
                    warn!(
                        "Backfill attempt {}/{} for '{}' came back empty (payload code {})",
                        attempt, attempts, base, code
                    );
                }
                Err(e) => {
                    warn!(
                        "Backfill attempt {}/{} for '{}' failed: {}",
                        attempt, attempts, base, e
                    );
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        Err(Error::BackfillExhausted {
            source: base.to_string(),
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currencies::{Currency, CurrencyUpdate, NewCurrency};
    use crate::rates::rates_model::{ExchangeRate, NewExchangeRate};
    use async_trait::async_trait;
    use fxhub_providers::{ProviderError, RatesSeries, RatesSnapshot};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Fails a fixed number of times, then answers with one EUR rate.
    struct FlakyProvider {
        failures_before_success: usize,
        calls: AtomicUsize,
    }

    impl FlakyProvider {
        fn new(failures_before_success: usize) -> Arc<Self> {
            Arc::new(Self {
                failures_before_success,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl RateProvider for FlakyProvider {
        fn id(&self) -> &'static str {
            "FLAKY"
        }

        async fn spot(
            &self,
            _source: &str,
            _target: &str,
        ) -> std::result::Result<Option<Decimal>, ProviderError> {
            Ok(None)
        }

        async fn historical(
            &self,
            source: &str,
            date: NaiveDate,
            _symbols: &[String],
        ) -> std::result::Result<(RatesSnapshot, u16), ProviderError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures_before_success {
                return Err(ProviderError::Timeout {
                    provider: "FLAKY".to_string(),
                });
            }

            let mut rates = BTreeMap::new();
            rates.insert("EUR".to_string(), dec!(0.92));
            Ok((
                RatesSnapshot {
                    base: source.to_string(),
                    date,
                    rates,
                },
                200,
            ))
        }

        async fn timeseries(
            &self,
            source: &str,
            from_date: NaiveDate,
            to_date: NaiveDate,
            _symbols: &[String],
        ) -> std::result::Result<(RatesSeries, u16), ProviderError> {
            Ok((RatesSeries::empty(source, from_date, to_date), 200))
        }
    }

    /// Always answers with a 200 payload carrying no rates.
    struct EmptyProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RateProvider for EmptyProvider {
        fn id(&self) -> &'static str {
            "EMPTY"
        }

        async fn spot(
            &self,
            _source: &str,
            _target: &str,
        ) -> std::result::Result<Option<Decimal>, ProviderError> {
            Ok(None)
        }

        async fn historical(
            &self,
            source: &str,
            date: NaiveDate,
            _symbols: &[String],
        ) -> std::result::Result<(RatesSnapshot, u16), ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((RatesSnapshot::empty(source, date), 200))
        }

        async fn timeseries(
            &self,
            source: &str,
            from_date: NaiveDate,
            to_date: NaiveDate,
            _symbols: &[String],
        ) -> std::result::Result<(RatesSeries, u16), ProviderError> {
            Ok((RatesSeries::empty(source, from_date, to_date), 200))
        }
    }

    #[derive(Default)]
    struct SinkRepos {
        upserts: Mutex<Vec<NewExchangeRate>>,
    }

    #[async_trait]
    impl RateRepositoryTrait for SinkRepos {
        fn get_rate(
            &self,
            _source: &str,
            _target: &str,
            _date: NaiveDate,
        ) -> Result<Option<ExchangeRate>> {
            Ok(None)
        }

        fn get_latest_rate(&self, _source: &str, _target: &str) -> Result<Option<ExchangeRate>> {
            Ok(None)
        }

        async fn upsert_rate(&self, rate: NewExchangeRate) -> Result<ExchangeRate> {
            let row = ExchangeRate {
                source_currency: rate.source_currency.clone(),
                target_currency: rate.target_currency.clone(),
                valuation_date: rate.valuation_date,
                rate_value: rate.rate_value,
            };
            self.upserts.lock().unwrap().push(rate);
            Ok(row)
        }
    }

    #[async_trait]
    impl CurrencyRepositoryTrait for SinkRepos {
        fn get_by_code(&self, _code: &str) -> Result<Option<Currency>> {
            Ok(None)
        }

        fn list(&self) -> Result<Vec<Currency>> {
            Ok(Vec::new())
        }

        async fn get_or_create(&self, code: &str) -> Result<Currency> {
            Ok(Currency {
                code: code.to_string(),
                name: String::new(),
                symbol: String::new(),
            })
        }

        async fn create(&self, currency: NewCurrency) -> Result<Currency> {
            Ok(Currency {
                code: currency.code,
                name: currency.name,
                symbol: currency.symbol,
            })
        }

        async fn update(&self, _code: &str, _update: CurrencyUpdate) -> Result<Currency> {
            unimplemented!("not used by backfill")
        }

        async fn delete(&self, _code: &str) -> Result<()> {
            unimplemented!("not used by backfill")
        }
    }

    fn job(provider: Arc<FlakyProvider>, repos: Arc<SinkRepos>) -> BackfillJob {
        BackfillJob::new(provider, repos.clone(), repos)
            .with_retry_policy(3, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let provider = FlakyProvider::new(2);
        let repos = Arc::new(SinkRepos::default());
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let saved = job(provider.clone(), repos.clone())
            .run("USD", date, &[])
            .await
            .unwrap();

        assert_eq!(saved, 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
        assert_eq!(repos.upserts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let provider = FlakyProvider::new(usize::MAX);
        let repos = Arc::new(SinkRepos::default());
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let err = job(provider.clone(), repos.clone())
            .run("USD", date, &[])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::BackfillExhausted { attempts: 4, .. }
        ));
        // One initial call plus three retries, never more.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
        assert!(repos.upserts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_snapshot_counts_as_failed_attempt() {
        let provider = Arc::new(EmptyProvider {
            calls: AtomicUsize::new(0),
        });
        let repos = Arc::new(SinkRepos::default());
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let job = BackfillJob::new(provider.clone(), repos.clone(), repos.clone())
            .with_retry_policy(3, Duration::from_millis(1));
        let err = job.run("USD", date, &[]).await.unwrap_err();

        // A 200 payload with no rates is retried like an error, then
        // reported as permanent failure with nothing persisted.
        assert!(matches!(
            err,
            Error::BackfillExhausted { attempts: 4, .. }
        ));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
        assert!(repos.upserts.lock().unwrap().is_empty());
    }
}
