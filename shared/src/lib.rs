//! # Shared Types
//!
//! Types exchanged between the payments server and its clients.
//!
//! Everything that crosses the HTTP boundary lives here so the server's
//! encoders and the client's decoders are compiled against the same
//! definitions:
//!
//! - **Payment model**: `Payment`, `PaymentInput`, `Direction`
//! - **Account model**: `Account`
//! - **Error taxonomy**: `ServiceError` and its `ErrorBody` wire envelope
//! - **Execution context**: `Context` carrying a deadline and a cancellation signal
//! - **Capability set**: the `PaymentService` trait implemented by the core
//!   service, every middleware layer, and the remote client

pub mod account;
pub mod amount;
pub mod context;
pub mod error;
pub mod payment;
pub mod service;

pub use account::Account;
pub use amount::{parse_amount, AmountError};
pub use context::{CancelHandle, Cancelled, Context};
pub use error::{ErrorBody, ErrorKind, ServiceError, INTERNAL_ERROR_MESSAGE};
pub use payment::{Direction, Payment, PaymentInput, ValidationError};
pub use service::PaymentService;

/// Path of the payments collection (list and send).
pub const PAYMENTS_PATH: &str = "/api/v1/payments";

/// Path of the available accounts listing.
pub const ACCOUNTS_PATH: &str = "/api/v1/accounts";
