use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// A registered currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    /// Uppercase ISO 4217 code, e.g. `"USD"`.
    pub code: String,
    pub name: String,
    /// Display symbol, e.g. `"$"`. Empty when unknown.
    pub symbol: String,
}

/// Input for registering a currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCurrency {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

/// Partial update for an existing currency. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyUpdate {
    pub name: Option<String>,
    pub symbol: Option<String>,
}

/// Uppercases and trims a currency code.
pub fn normalize_currency_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Accepts exactly three ASCII letters, in either case.
pub fn validate_currency_code(code: &str) -> Result<String, ValidationError> {
    let normalized = normalize_currency_code(code);
    if normalized.len() == 3 && normalized.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(normalized)
    } else {
        Err(ValidationError::InvalidCurrencyCode(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_uppercases_and_trims() {
        assert_eq!(normalize_currency_code(" usd "), "USD");
        assert_eq!(normalize_currency_code("EUR"), "EUR");
    }

    #[test]
    fn test_validate_rejects_bad_codes() {
        assert!(validate_currency_code("usd").is_ok());
        assert!(validate_currency_code("US").is_err());
        assert!(validate_currency_code("USDX").is_err());
        assert!(validate_currency_code("U5D").is_err());
        assert!(validate_currency_code("").is_err());
    }
}
