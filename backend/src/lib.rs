//! # Payments Backend
//!
//! Server side of the payments service.
//!
//! This crate brings together:
//! - **Domain**: the core service and the logging/metrics decorators around it
//! - **Storage**: persistence of payments and accounts (PostgreSQL, in-memory)
//! - **IO**: the HTTP interface, its error encoding and the server lifecycle
//! - **Config**: process configuration loaded once at startup
//!
//! ## Architecture
//!
//! ```text
//! HTTP client
//!     ↓
//! IO Layer (axum router, request decoding, error encoding)
//!     ↓
//! Domain Layer (metrics → logging → core service)
//!     ↓
//! Storage Layer (PaymentStorage)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use prometheus::Registry;
use shared::{Context, PaymentService, ServiceError};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};

use crate::io::rest::{get_metrics, get_profile, ProfileConfig, METRICS_PATH, PROFILE_PATH};
use crate::io::ServerConfig;

/// Service handle shared by every request handler.
pub type DynPaymentService = Arc<dyn PaymentService<Error = ServiceError>>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub payment_service: DynPaymentService,
    pub registry: Registry,
    request_root: Context,
    request_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(payment_service: DynPaymentService, registry: Registry) -> Self {
        Self {
            payment_service,
            registry,
            request_root: Context::background(),
            request_timeout: None,
        }
    }

    /// Derive request contexts from `root`, each bounded by `timeout` when set.
    pub fn with_request_context(mut self, root: Context, timeout: Option<Duration>) -> Self {
        self.request_root = root;
        self.request_timeout = timeout;
        self
    }

    /// A fresh context for one request.
    pub fn request_context(&self) -> Context {
        let ctx = self.request_root.clone();
        match self.request_timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}

/// Create the Axum router with all routes and layers configured
pub fn create_router(state: AppState, config: &ServerConfig) -> Result<Router> {
    let metrics = Router::new()
        .route(METRICS_PATH, get(get_metrics))
        .with_state(state.clone());
    let profile = Router::new()
        .route(PROFILE_PATH, get(get_profile))
        .with_state(ProfileConfig {
            write_timeout: config.write_timeout,
        });

    let mut router = io::api_router(state).merge(metrics).merge(profile);

    if let Some(timeout) = config.write_timeout {
        router = router.layer(TimeoutLayer::new(timeout));
    }
    if let Some(timeout) = config.read_timeout {
        router = router.layer(RequestBodyTimeoutLayer::new(timeout));
    }
    if let Some(cors) = cors_layer(&config.allowed_origins)? {
        router = router.layer(cors);
    }

    Ok(router)
}

/// CORS policy for the configured origins; `None` when no origin is allowed.
fn cors_layer(origins: &[String]) -> Result<Option<CorsLayer>> {
    if origins.is_empty() {
        return Ok(None);
    }

    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let origins = origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("invalid allowed origin: {:?}", origin))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]),
    ))
}
