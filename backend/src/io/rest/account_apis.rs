//! # REST API for Accounts

use axum::{extract::State, Json};
use shared::ACCOUNTS_PATH;
use tracing::info;

use super::error::ApiError;
use crate::AppState;

/// List identifiers of the accounts that can receive funds
pub async fn list_available_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    info!("GET {}", ACCOUNTS_PATH);

    let ctx = state.request_context();
    let accounts = state.payment_service.get_available_accounts(&ctx).await?;
    Ok(Json(accounts))
}
