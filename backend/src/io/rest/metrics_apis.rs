//! Prometheus scrape endpoint.

use anyhow::Context as _;
use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::IntoResponse,
};
use prometheus::{Encoder, TextEncoder};

use super::error::ApiError;
use crate::AppState;

/// Render every registered metric in the text exposition format
pub async fn get_metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&state.registry.gather(), &mut buffer)
        .context("failed to encode metrics")?;

    let content_type = HeaderValue::from_str(encoder.format_type())
        .context("invalid metrics content type")?;
    Ok(([(header::CONTENT_TYPE, content_type)], buffer))
}
