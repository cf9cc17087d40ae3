//! PostgreSQL-backed storage.

pub mod connection;
pub mod payment_repository;

pub use connection::{DbConnection, PostgresConfig, PostgresConfigError};
pub use payment_repository::PostgresStorage;
