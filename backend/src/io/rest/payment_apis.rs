//! # REST API for Payments
//!
//! Endpoints for listing and sending payments.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use shared::{Payment, PaymentInput, ServiceError, PAYMENTS_PATH};
use tracing::{info, warn};

use super::error::ApiError;
use crate::AppState;

/// List every stored payment
pub async fn list_payments(State(state): State<AppState>) -> Result<Json<Vec<Payment>>, ApiError> {
    info!("GET {}", PAYMENTS_PATH);

    let ctx = state.request_context();
    let payments = state.payment_service.get_all_payments(&ctx).await?;
    Ok(Json(payments))
}

/// Send a payment; succeeds with an empty 200 response
pub async fn send_payment(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, ApiError> {
    info!("POST {}", PAYMENTS_PATH);

    let input = decode_send_payment_request(body).map_err(|err| {
        warn!("POST {} - rejected: {}", PAYMENTS_PATH, err.message());
        err
    })?;

    let ctx = state.request_context();
    state.payment_service.send_payment(&ctx, input).await?;
    Ok(StatusCode::OK)
}

/// Parse and validate the JSON body of a send request.
///
/// The body is read as raw bytes so a missing or unexpected `Content-Type`
/// header does not reject an otherwise valid request.
pub fn decode_send_payment_request(
    body: Result<Bytes, BytesRejection>,
) -> Result<PaymentInput, ServiceError> {
    let body = body
        .map_err(|e| ServiceError::bad_request(format!("failed to read request body: {}", e)))?;

    let input: PaymentInput = serde_json::from_slice(&body)
        .map_err(|e| ServiceError::bad_request(format!("failed to decode JSON request: {}", e)))?;

    input
        .validate()
        .map_err(|e| ServiceError::bad_request(format!("invalid payment: {}", e)))?;

    Ok(input)
}
