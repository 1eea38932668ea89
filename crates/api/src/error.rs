use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use burntbeats_core::error::CoreError;
use serde_json::json;

/// Error returned by every handler.
///
/// Rendered as `{ "success": false, "error": ..., "code": ... }` so clients
/// can branch on `success` for generation and validation failures alike.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Lookup or input errors raised by `burntbeats_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Request body failed structural validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Malformed body or multipart form.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An external generation job failed. The message is shown to the user.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Server-side failure; the message is logged, not returned.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Handler result.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                errors.to_string(),
            ),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Generation(msg) => {
                tracing::warn!(error = %msg, "Generation request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GENERATION_FAILED",
                    msg.clone(),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "success": false,
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
