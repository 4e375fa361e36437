pub mod currencies_model;
pub mod currencies_service;
pub mod currencies_traits;

pub use currencies_model::{
    normalize_currency_code, validate_currency_code, Currency, CurrencyUpdate, NewCurrency,
};
pub use currencies_service::CurrencyService;
pub use currencies_traits::CurrencyRepositoryTrait;
