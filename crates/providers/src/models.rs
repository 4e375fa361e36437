//! Provider-facing data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point-in-time rates for one base currency on one valuation date.
///
/// This is the payload shape shared by historical lookups and the
/// backfill job: `rates` maps target currency code to the rate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatesSnapshot {
    pub base: String,
    pub date: NaiveDate,
    pub rates: BTreeMap<String, Decimal>,
}

impl RatesSnapshot {
    /// An empty snapshot, used when the provider answers with a
    /// non-success payload status.
    pub fn empty(base: &str, date: NaiveDate) -> Self {
        Self {
            base: base.to_string(),
            date,
            rates: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Daily rate snapshots across a date range for one base currency.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatesSeries {
    pub base: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Valuation date -> (target currency -> rate).
    pub rates: BTreeMap<NaiveDate, BTreeMap<String, Decimal>>,
}

impl RatesSeries {
    pub fn empty(base: &str, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            base: base.to_string(),
            start_date,
            end_date,
            rates: BTreeMap::new(),
        }
    }
}

/// One configured external provider, as stored by the admin surface.
///
/// `implementation` is a key into the provider factory's registration
/// table; a config whose key does not resolve is rejected at validation
/// time and skipped (with a warning) by the registry loader.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub id: String,
    pub name: String,
    pub implementation: String,
    /// Lower values are tried first.
    pub priority: i32,
    pub active: bool,
}
