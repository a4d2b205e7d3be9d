use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// The response bodies mirror what callers of the matching endpoint already
/// depend on, so every variant maps to a fixed wire shape.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body failed shape validation. Rejected before any filesystem
    /// or subprocess activity.
    #[error("Missing or invalid 'requirement' or 'resumes'.")]
    Validation,

    /// The scoring process exited non-zero or timed out.
    /// Carries the captured stderr text as the detail.
    #[error("Python script failed: {details}")]
    Scorer { details: String },

    /// The scoring process exited zero but its stdout was not valid JSON.
    #[error("Invalid JSON output from Python script.")]
    Decode,

    /// Anything else: workspace creation failure, I/O errors, bugs.
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Builds the scorer-failure variant from captured stderr, substituting
    /// the generic fallback when the process said nothing.
    pub fn scorer_failure(stderr: &[u8]) -> Self {
        let details = String::from_utf8_lossy(stderr).trim().to_string();
        AppError::Scorer {
            details: if details.is_empty() {
                "Unknown error.".to_string()
            } else {
                details
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Missing or invalid 'requirement' or 'resumes'." }),
            ),
            AppError::Scorer { details } => {
                tracing::error!("Scorer failed: {details}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Python script failed.", "details": details }),
                )
            }
            AppError::Decode => {
                tracing::error!("Scorer produced non-JSON stdout");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Invalid JSON output from Python script." }),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error." }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
