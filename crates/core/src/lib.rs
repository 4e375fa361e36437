//! Domain services for the exchange rate hub.
//!
//! Everything here is storage-agnostic: services depend on repository
//! traits and on the provider crate, and the SQLite implementations live
//! in `fxhub-storage-sqlite`.

pub mod constants;
pub mod currencies;
pub mod errors;
pub mod rates;

pub use errors::{DatabaseError, Error, Result, ValidationError};
