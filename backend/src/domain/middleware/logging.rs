use std::time::{Duration, Instant};

use async_trait::async_trait;
use shared::{Context, Payment, PaymentInput, PaymentService};
use tracing::error;

/// Logs every failed call with its method name, error and elapsed time.
///
/// Results pass through untouched; successful calls are not logged.
pub struct LoggingMiddleware<S> {
    inner: S,
}

impl<S> LoggingMiddleware<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

fn log_failure<T, E: std::fmt::Display>(method: &str, started: Instant, result: &Result<T, E>) {
    if let Err(err) = result {
        let took: Duration = started.elapsed();
        error!(method, error = %err, took = ?took, "payment service call failed");
    }
}

#[async_trait]
impl<S: PaymentService> PaymentService for LoggingMiddleware<S> {
    type Error = S::Error;

    async fn get_all_payments(&self, ctx: &Context) -> Result<Vec<Payment>, Self::Error> {
        let started = Instant::now();
        let result = self.inner.get_all_payments(ctx).await;
        log_failure("get_all_payments", started, &result);
        result
    }

    async fn send_payment(&self, ctx: &Context, input: PaymentInput) -> Result<(), Self::Error> {
        let started = Instant::now();
        let result = self.inner.send_payment(ctx, input).await;
        log_failure("send_payment", started, &result);
        result
    }

    async fn get_available_accounts(&self, ctx: &Context) -> Result<Vec<String>, Self::Error> {
        let started = Instant::now();
        let result = self.inner.get_available_accounts(ctx).await;
        log_failure("get_available_accounts", started, &result);
        result
    }
}
