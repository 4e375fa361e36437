//! The capability-set trait every rate provider implements.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::ProviderError;
use crate::models::{RatesSeries, RatesSnapshot};

/// A single external exchange rate source.
///
/// The three operations fail independently and carry deliberately
/// different error contracts:
///
/// - [`spot`](Self::spot) is a best-effort fill used during resolution;
///   implementations absorb their own network failures into `Ok(None)` so
///   the caller simply moves on to the next provider.
/// - [`historical`](Self::historical) and
///   [`timeseries`](Self::timeseries) back explicit user requests, so
///   transport failures propagate to the caller.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "CURRENCY_BEACON".
    /// Used for logging and failover diagnostics.
    fn id(&self) -> &'static str;

    /// Current rate for the (source, target) pair.
    ///
    /// Consults the injected response cache before issuing a network
    /// call. Returns `Ok(None)` when the provider has no rate for the
    /// pair or the call failed at the network level.
    async fn spot(&self, source: &str, target: &str) -> Result<Option<Decimal>, ProviderError>;

    /// Rates for `source` against `symbols` on the given date.
    ///
    /// Returns the payload together with the provider's own status code;
    /// a non-200 status yields an empty payload.
    async fn historical(
        &self,
        source: &str,
        date: NaiveDate,
        symbols: &[String],
    ) -> Result<(RatesSnapshot, u16), ProviderError>;

    /// Daily rate snapshots for `source` against `symbols` across an
    /// inclusive date range.
    async fn timeseries(
        &self,
        source: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
        symbols: &[String],
    ) -> Result<(RatesSeries, u16), ProviderError>;
}
