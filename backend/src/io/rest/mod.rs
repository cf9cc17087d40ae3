//! # REST API Interface Layer
//!
//! HTTP endpoints of the payments service.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: the three payment routes under `/api/v1`
//! - **Request Decoding**: JSON bodies parsed and validated before they
//!   reach the service
//! - **Error Handling**: every failure rendered as `{"error": "<message>"}`
//!   with its status code, internal messages redacted
//! - **Observability**: the Prometheus scrape endpoint and the CPU profiler
//!
//! Handlers hold no state of their own; they translate between HTTP and
//! the `PaymentService` found in [`AppState`](crate::AppState).

pub mod account_apis;
pub mod error;
pub mod metrics_apis;
pub mod payment_apis;
pub mod profile_apis;

use axum::{routing::get, Router};
use shared::{ACCOUNTS_PATH, PAYMENTS_PATH};

use crate::AppState;

pub use account_apis::list_available_accounts;
pub use error::ApiError;
pub use metrics_apis::get_metrics;
pub use payment_apis::{list_payments, send_payment};
pub use profile_apis::{get_profile, ProfileConfig};

/// Path of the Prometheus scrape endpoint.
pub const METRICS_PATH: &str = "/metrics";

/// Path of the CPU profiling endpoint.
pub const PROFILE_PATH: &str = "/debug/pprof/profile";

/// The payment routes, method-qualified.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route(PAYMENTS_PATH, get(list_payments).post(send_payment))
        .route(ACCOUNTS_PATH, get(list_available_accounts))
        .with_state(state)
}
