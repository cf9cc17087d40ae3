//! # Service Middleware
//!
//! Decorators that wrap any [`PaymentService`] and expose the same
//! capability set, observing each call without changing its result.
//!
//! - **logging**: failed calls are logged with method, error and latency
//! - **metrics**: every call lands in a latency histogram labelled by
//!   method and outcome

pub mod logging;
pub mod metrics;

pub use logging::LoggingMiddleware;
pub use metrics::{InstrumentingMiddleware, PaymentMetrics};

#[cfg(test)]
pub(crate) mod tests {
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use shared::{Context, Direction, Payment, PaymentInput, PaymentService, ServiceError};
    use tokio::sync::Notify;

    /// Service that answers every call with a canned outcome.
    pub(crate) struct StubService {
        failure: Option<ServiceError>,
    }

    impl StubService {
        pub(crate) fn healthy() -> Self {
            Self { failure: None }
        }

        pub(crate) fn failing(err: ServiceError) -> Self {
            Self { failure: Some(err) }
        }

        pub(crate) fn input() -> PaymentInput {
            PaymentInput {
                from_account: "bob123".to_string(),
                amount: Decimal::from(100),
                to_account: "alice456".to_string(),
                direction: Direction::Outgoing,
            }
        }

        fn outcome<T>(&self, value: T) -> Result<T, ServiceError> {
            match &self.failure {
                Some(err) => Err(err.clone()),
                None => Ok(value),
            }
        }
    }

    #[async_trait]
    impl PaymentService for StubService {
        type Error = ServiceError;

        async fn get_all_payments(&self, _ctx: &Context) -> Result<Vec<Payment>, ServiceError> {
            self.outcome(Vec::new())
        }

        async fn send_payment(
            &self,
            _ctx: &Context,
            _input: PaymentInput,
        ) -> Result<(), ServiceError> {
            self.outcome(())
        }

        async fn get_available_accounts(
            &self,
            _ctx: &Context,
        ) -> Result<Vec<String>, ServiceError> {
            self.outcome(vec!["bob123".to_string(), "alice456".to_string()])
        }
    }

    /// Service whose account listing blocks until its context is cancelled.
    #[derive(Default)]
    pub(crate) struct StallingService {
        pub(crate) started: Notify,
        pub(crate) cancelled: Notify,
    }

    #[async_trait]
    impl PaymentService for StallingService {
        type Error = ServiceError;

        async fn get_all_payments(&self, _ctx: &Context) -> Result<Vec<Payment>, ServiceError> {
            Ok(Vec::new())
        }

        async fn send_payment(
            &self,
            _ctx: &Context,
            _input: PaymentInput,
        ) -> Result<(), ServiceError> {
            Ok(())
        }

        async fn get_available_accounts(
            &self,
            ctx: &Context,
        ) -> Result<Vec<String>, ServiceError> {
            self.started.notify_one();
            ctx.cancelled().await;
            self.cancelled.notify_one();
            Err(ServiceError::internal("request cancelled"))
        }
    }
}
