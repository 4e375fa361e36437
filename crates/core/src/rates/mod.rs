pub mod backfill;
pub mod converter;
pub mod provider_configs;
pub mod rates_model;
pub mod rates_service;
pub mod rates_traits;
pub mod resolver;

pub use backfill::BackfillJob;
pub use converter::ConverterService;
pub use provider_configs::ProviderConfigService;
pub use rates_model::{
    truncate_rate, ConversionEntry, ExchangeRate, HistoricalRatesQuery, NewExchangeRate,
    TimeseriesEntry, TimeseriesQuery,
};
pub use rates_service::{save_snapshot, RatesService};
pub use rates_traits::{ProviderConfigRepositoryTrait, RateRepositoryTrait};
pub use resolver::RateResolver;
