//! SQLite storage implementation for the exchange rate hub.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in `fxhub-core`
//! and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for currencies, rates, and provider configs
//!
//! This is the only crate in the workspace with a Diesel dependency; the
//! domain crates are database-agnostic and work with traits.

pub mod currencies;
pub mod db;
pub mod errors;
pub mod provider_configs;
pub mod rates;
pub mod schema;

pub use currencies::CurrencyRepository;
pub use db::{create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool, WriteHandle};
pub use errors::{IntoCore, StorageError};
pub use provider_configs::ProviderConfigRepository;
pub use rates::RateRepository;

// Re-export from fxhub-core for convenience
pub use fxhub_core::errors::{DatabaseError, Error, Result};
