mod repository;

pub use repository::CurrencyRepository;
pub(crate) use repository::get_or_create_currency;
