use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::constants::RATE_SCALE;

/// A persisted exchange rate for a currency pair on a valuation date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub source_currency: String,
    pub target_currency: String,
    pub valuation_date: NaiveDate,
    #[serde(serialize_with = "serialize_rate")]
    pub rate_value: Decimal,
}

/// Input for storing a rate. The value is truncated to the storage scale
/// before it is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExchangeRate {
    pub source_currency: String,
    pub target_currency: String,
    pub valuation_date: NaiveDate,
    pub rate_value: Decimal,
}

/// Truncates toward zero at the storage scale. 0.1234567 becomes 0.123456,
/// never 0.123457.
pub fn truncate_rate(value: Decimal) -> Decimal {
    value.trunc_with_scale(RATE_SCALE)
}

fn serialize_rate<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&truncate_rate(*value).to_string())
}

/// One line of a batch conversion result.
///
/// Amounts are strings so that targets without an obtainable rate can carry
/// the `"N/A"` placeholder alongside numeric lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionEntry {
    pub target_currency: String,
    pub converted_amount: String,
    pub rate_value: String,
    pub symbol: String,
}

/// Query parameters for a historical rates fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalRatesQuery {
    pub base: String,
    /// `%Y-%m-%d`.
    pub date: String,
    #[serde(default)]
    pub symbols: Vec<String>,
}

/// Query parameters for a timeseries fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeseriesQuery {
    pub base: String,
    /// `%Y-%m-%d`.
    pub start_date: String,
    /// `%Y-%m-%d`.
    pub end_date: String,
    #[serde(default)]
    pub symbols: Vec<String>,
}

/// A single flattened timeseries observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeseriesEntry {
    pub base: String,
    pub currency: String,
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_rate")]
    pub rate: Decimal,
}
