use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use restyle_core::error::CoreError;
use restyle_leonardo::workflow::WorkflowError;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce the service's JSON error
/// shape, `{"error": "<message>"}` — workflow failures keep the exact
/// messages the endpoint has always returned.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A workflow failure. Every documented failure point maps to 500.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Invalid client input caught before the workflow starts.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// A malformed request (missing part, unparseable value).
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Workflow(err) => {
                tracing::error!(error = %err, "Workflow invocation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = json!({ "error": message });

        (status, axum::Json(body)).into_response()
    }
}
