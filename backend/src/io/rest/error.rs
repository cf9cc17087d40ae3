//! Translation of service failures into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ServiceError;
use tracing::error;

/// Anything a handler can fail with.
///
/// Classified errors keep their status; anything else is reported as an
/// internal failure. Internal messages never reach the response body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ApiError {
    /// The classified form of this error.
    pub fn into_service_error(self) -> ServiceError {
        match self {
            ApiError::Service(err) => err,
            ApiError::Unexpected(err) => {
                error!("unexpected error: {:#}", err);
                ServiceError::internal(format!("{:#}", err))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.into_service_error();
        match StatusCode::from_u16(err.code()) {
            Ok(status) => (status, Json(err.to_body())).into_response(),
            Err(_) => {
                error!("service error with invalid status code: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ServiceError::internal(err.message()).to_body()),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use shared::ErrorBody;

    async fn render(err: ApiError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        (status, serde_json::from_slice(&bytes).expect("Failed to parse body"))
    }

    #[tokio::test]
    async fn test_bad_request_message_passes_through() {
        let (status, body) = render(ServiceError::bad_request("empty to_account").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "empty to_account");
    }

    #[tokio::test]
    async fn test_internal_message_is_replaced() {
        let (status, body) =
            render(ServiceError::internal("failed to send payment: disk full").into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "internal error");
    }

    #[tokio::test]
    async fn test_unclassified_error_is_internal() {
        let (status, body) = render(anyhow::anyhow!("password=hunter2 rejected").into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "internal error");
    }

    #[tokio::test]
    async fn test_other_status_codes_are_preserved() {
        let (status, body) = render(ServiceError::from_status(404, "no such payment").into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "no such payment");
    }
}
