//! Provider adapter implementations.

pub mod currency_beacon;
pub mod mock;
mod traits;

pub use currency_beacon::CurrencyBeaconProvider;
pub use mock::MockRateProvider;
pub use traits::RateProvider;
