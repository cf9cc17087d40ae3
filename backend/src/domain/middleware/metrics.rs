use std::time::Instant;

use async_trait::async_trait;
use prometheus::{exponential_buckets, HistogramOpts, HistogramVec, Registry};
use shared::{Context, Payment, PaymentInput, PaymentService};

/// Request latency histogram shared by every instrumented service.
#[derive(Clone)]
pub struct PaymentMetrics {
    requests: HistogramVec,
}

impl PaymentMetrics {
    /// Create `<prefix>_requests` and register it with `registry`.
    pub fn new(prefix: &str, registry: &Registry) -> prometheus::Result<Self> {
        let opts = HistogramOpts::new(
            format!("{}_requests", prefix),
            "Payment service request duration in seconds",
        )
        .buckets(exponential_buckets(0.001, 2.0, 14)?);
        let requests = HistogramVec::new(opts, &["method", "error"])?;
        registry.register(Box::new(requests.clone()))?;
        Ok(Self { requests })
    }

    fn observe(&self, method: &str, failed: bool, started: Instant) {
        let failed = if failed { "true" } else { "false" };
        self.requests
            .with_label_values(&[method, failed])
            .observe(started.elapsed().as_secs_f64());
    }
}

/// Records how long every call takes, labelled by method and outcome.
pub struct InstrumentingMiddleware<S> {
    inner: S,
    metrics: PaymentMetrics,
}

impl<S> InstrumentingMiddleware<S> {
    pub fn new(inner: S, metrics: PaymentMetrics) -> Self {
        Self { inner, metrics }
    }
}

#[async_trait]
impl<S: PaymentService> PaymentService for InstrumentingMiddleware<S> {
    type Error = S::Error;

    async fn get_all_payments(&self, ctx: &Context) -> Result<Vec<Payment>, Self::Error> {
        let started = Instant::now();
        let result = self.inner.get_all_payments(ctx).await;
        self.metrics
            .observe("get_all_payments", result.is_err(), started);
        result
    }

    async fn send_payment(&self, ctx: &Context, input: PaymentInput) -> Result<(), Self::Error> {
        let started = Instant::now();
        let result = self.inner.send_payment(ctx, input).await;
        self.metrics.observe("send_payment", result.is_err(), started);
        result
    }

    async fn get_available_accounts(&self, ctx: &Context) -> Result<Vec<String>, Self::Error> {
        let started = Instant::now();
        let result = self.inner.get_available_accounts(ctx).await;
        self.metrics
            .observe("get_available_accounts", result.is_err(), started);
        result
    }
}
