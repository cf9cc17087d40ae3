//! # Payments Client
//!
//! Remote implementation of [`PaymentService`] speaking the service's HTTP
//! API. Each call encodes the operation as a request against the configured
//! base URL, runs it under the caller's [`Context`] and the configured
//! timeout, and decodes either the typed result or the `{"error": ...}`
//! envelope back into a [`ServiceError`] with the original status code.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use shared::{
    Cancelled, Context, ErrorBody, Payment, PaymentInput, PaymentService, ServiceError,
    ACCOUNTS_PATH, PAYMENTS_PATH,
};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the service, e.g. `http://localhost:8080`
    pub service_url: String,
    /// Upper bound on every HTTP exchange
    pub timeout: Duration,
}

impl ClientConfig {
    fn validate(&self) -> Result<Url, ClientError> {
        if self.service_url.is_empty() {
            return Err(ClientError::Config("must provide service_url".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(ClientError::Config("invalid timeout".to_string()));
        }

        let url = Url::parse(&self.service_url)
            .map_err(|e| ClientError::Config(format!("invalid service_url: {}", e)))?;
        if url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "invalid service_url: {} cannot be a base URL",
                self.service_url
            )));
        }
        Ok(url)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The service answered with a classified error
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("invalid client configuration: {0}")]
    Config(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode JSON response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

impl ClientError {
    /// The classified error sent by the service, if that is what this is.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            ClientError::Service(err) => Some(err),
            _ => None,
        }
    }
}

/// API client for communicating with the payments service
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = config.validate()?;
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { base_url, http })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Config(format!("invalid request path {}: {}", path, e)))
    }

    /// Send the request and return the body of a successful response.
    async fn execute(&self, ctx: &Context, request: RequestBuilder) -> Result<Vec<u8>, ClientError> {
        ctx.run(async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            if !status.is_success() {
                debug!(%status, "payments service returned an error");
                return Err(ClientError::Service(decode_error(status, &body)));
            }
            Ok::<_, ClientError>(body.to_vec())
        })
        .await?
    }

    async fn get_json<T: DeserializeOwned>(&self, ctx: &Context, path: &str) -> Result<T, ClientError> {
        let request = self.http.get(self.url(path)?);
        let body = self.execute(ctx, request).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Rebuild the classified error carried by a non-2xx response.
///
/// Falls back to the canonical status text when the body is missing,
/// malformed or has an empty message.
pub fn decode_error(status: StatusCode, body: &[u8]) -> ServiceError {
    let message = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody { error }) if !error.is_empty() => error,
        _ => status.canonical_reason().unwrap_or_default().to_string(),
    };
    ServiceError::from_status(status.as_u16(), message)
}

#[async_trait]
impl PaymentService for ApiClient {
    type Error = ClientError;

    async fn get_all_payments(&self, ctx: &Context) -> Result<Vec<Payment>, ClientError> {
        self.get_json(ctx, PAYMENTS_PATH).await
    }

    async fn send_payment(&self, ctx: &Context, input: PaymentInput) -> Result<(), ClientError> {
        let request = self.http.post(self.url(PAYMENTS_PATH)?).json(&input);
        self.execute(ctx, request).await?;
        Ok(())
    }

    async fn get_available_accounts(&self, ctx: &Context) -> Result<Vec<String>, ClientError> {
        self.get_json(ctx, ACCOUNTS_PATH).await
    }
}
