//! # Storage Module
//!
//! Persistence for payments and accounts.
//!
//! The core service only sees the [`PaymentStorage`] trait, so the backing
//! store can be swapped without touching the domain or IO layers.
//!
//! ## Key Responsibilities
//!
//! - **Data Retrieval**: Listing stored payments and account identifiers
//! - **Atomic Booking**: Recording a payment and moving balances as one unit
//! - **Connection Management**: Owning the Postgres pool and its lifecycle
//!
//! ## Current Implementation
//!
//! - **Primary Storage**: PostgreSQL through SQLx, with booking delegated to
//!   the `send_payment_proc` stored procedure
//! - **Development Mode**: [`InMemoryStorage`] for tests and local runs

pub mod memory;
pub mod postgres;
pub mod traits;

pub use memory::InMemoryStorage;
pub use postgres::{DbConnection, PostgresConfig, PostgresConfigError, PostgresStorage};
pub use traits::PaymentStorage;
