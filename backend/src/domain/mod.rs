//! # Domain Module
//!
//! Business logic of the payments service and the decorators layered on it.
//!
//! ## Module Organization
//!
//! - **payment_service**: the core service, delegating to storage and
//!   classifying its failures
//! - **middleware**: logging and metrics decorators over any `PaymentService`
//!
//! ## Composition
//!
//! [`build_service`] fixes the layering used by the server:
//!
//! ```text
//! InstrumentingMiddleware   (outermost, timing includes logging)
//!     ↓
//! LoggingMiddleware
//!     ↓
//! CorePaymentService
//!     ↓
//! PaymentStorage
//! ```

pub mod middleware;
pub mod payment_service;

pub use middleware::{InstrumentingMiddleware, LoggingMiddleware, PaymentMetrics};
pub use payment_service::CorePaymentService;

use crate::storage::PaymentStorage;

/// The fully decorated service the HTTP layer dispatches to.
pub type AppService<S> = InstrumentingMiddleware<LoggingMiddleware<CorePaymentService<S>>>;

/// Wrap `storage` in the core service, then logging, then metrics.
pub fn build_service<S: PaymentStorage>(storage: S, metrics: PaymentMetrics) -> AppService<S> {
    let service = CorePaymentService::new(storage);
    let service = LoggingMiddleware::new(service);
    InstrumentingMiddleware::new(service, metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;
    use prometheus::Registry;
    use rust_decimal::Decimal;
    use shared::{Account, Context, PaymentService};

    #[tokio::test]
    async fn test_build_service_serves_from_storage() {
        let storage = InMemoryStorage::with_accounts([
            Account::new("bob123", Decimal::from(10), "USD"),
            Account::new("alice456", Decimal::from(10), "USD"),
        ])
        .unwrap();
        let registry = Registry::new();
        let metrics = PaymentMetrics::new("coins_payments", &registry).unwrap();
        let service = build_service(storage, metrics);

        let accounts = service
            .get_available_accounts(&Context::background())
            .await
            .unwrap();

        assert_eq!(accounts, vec!["bob123", "alice456"]);
        assert_eq!(registry.gather().len(), 1);
    }
}
