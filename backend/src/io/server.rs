//! HTTP server lifecycle.
//!
//! The server runs until its context is cancelled, then stops accepting
//! connections and waits for in-flight requests. Requests still running when
//! the shutdown timeout expires have their contexts cancelled and the server
//! reports an error.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use prometheus::Registry;
use shared::Context;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{create_router, AppState, DynPaymentService};

pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Bound on reading a request body, `None` for no limit
    pub read_timeout: Option<Duration>,
    /// Bound on producing a response, `None` for no limit
    pub write_timeout: Option<Duration>,
    pub shutdown_timeout: Duration,
    /// Origins allowed by CORS; no CORS handling when empty
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 0,
            read_timeout: None,
            write_timeout: None,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            allowed_origins: Vec::new(),
        }
    }
}

pub struct Server {
    config: ServerConfig,
    service: DynPaymentService,
    registry: Registry,
}

impl Server {
    pub fn new(config: ServerConfig, service: DynPaymentService, registry: Registry) -> Self {
        Self {
            config,
            service,
            registry,
        }
    }

    /// Listen on all interfaces at the configured port until `ctx` is cancelled.
    pub async fn serve(self, ctx: Context) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        self.serve_with_listener(listener, ctx).await
    }

    /// Serve on an already bound listener until `ctx` is cancelled.
    pub async fn serve_with_listener(self, listener: TcpListener, ctx: Context) -> Result<()> {
        let (requests_root, abort_requests) = Context::background().with_cancel();
        let state = AppState::new(self.service, self.registry)
            .with_request_context(requests_root, self.config.write_timeout);
        let app = create_router(state, &self.config)?;

        let addr = listener.local_addr().context("failed to read local address")?;
        info!("Listening on {}", addr);

        let shutdown = {
            let ctx = ctx.clone();
            async move { ctx.cancelled().await }
        };
        let mut serving = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
        });

        tokio::select! {
            result = &mut serving => {
                result.context("http server task panicked")?.context("http server failed")?;
                return Ok(());
            }
            _ = ctx.cancelled() => {}
        }

        info!("Shutting down http server");
        match tokio::time::timeout(self.config.shutdown_timeout, &mut serving).await {
            Ok(result) => {
                result.context("http server task panicked")?.context("http server failed")?;
                info!("Http server stopped");
                Ok(())
            }
            Err(_) => {
                error!(
                    "Requests still running after {:?}, cancelling them",
                    self.config.shutdown_timeout
                );
                abort_requests.cancel();
                serving.abort();
                bail!(
                    "failed to shutdown server: timed out after {:?}",
                    self.config.shutdown_timeout
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::middleware::tests::StallingService;
    use crate::domain::{build_service, PaymentMetrics};
    use crate::storage::InMemoryStorage;
    use std::sync::Arc;

    fn setup_test_server(config: ServerConfig) -> Server {
        let registry = Registry::new();
        let metrics =
            PaymentMetrics::new("coins_payments", &registry).expect("Failed to create metrics");
        let service = build_service(InMemoryStorage::new(), metrics);
        Server::new(config, Arc::new(service), registry)
    }

    #[tokio::test]
    async fn test_serve_stops_when_context_is_cancelled() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let (ctx, handle) = Context::background().with_cancel();
        let server = setup_test_server(ServerConfig::default());

        let task = tokio::spawn(server.serve_with_listener(listener, ctx));
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("Server did not stop")
            .expect("Server task panicked");
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_cors_origin_fails_before_serving() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let server = setup_test_server(ServerConfig {
            allowed_origins: vec!["bad\norigin".to_string()],
            ..ServerConfig::default()
        });

        let result = server
            .serve_with_listener(listener, Context::background())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_shutdown_timeout_cancels_running_requests() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().unwrap();
        let service = Arc::new(StallingService::default());
        let server = Server::new(
            ServerConfig {
                shutdown_timeout: Duration::from_millis(100),
                ..ServerConfig::default()
            },
            service.clone(),
            Registry::new(),
        );
        let (ctx, handle) = Context::background().with_cancel();
        let task = tokio::spawn(server.serve_with_listener(listener, ctx));

        let request = tokio::spawn(reqwest::get(format!("http://{}/api/v1/accounts", addr)));
        tokio::time::timeout(Duration::from_secs(5), service.started.notified())
            .await
            .expect("Request never reached the service");
        handle.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("Server did not stop")
            .expect("Server task panicked");
        let err = result.expect_err("Shutdown should have timed out");
        assert!(err.to_string().contains("failed to shutdown server: timed out after"));

        tokio::time::timeout(Duration::from_secs(5), service.cancelled.notified())
            .await
            .expect("Request context was not cancelled");
        request.abort();
    }
}
