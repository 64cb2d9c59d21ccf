use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scrapedesk_core::error::CoreError;
use scrapedesk_core::jobs::request::RequestError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for session and store errors and [`RequestError`] for
/// refused job requests. Implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `scrapedesk_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A job request refused before launch.
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),

            // Job requests keep their exact messages; the UI shows them verbatim.
            AppError::Request(request) => match request {
                RequestError::Unauthenticated => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    request.to_string(),
                ),
                RequestError::NotAdmin => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", request.to_string())
                }
                RequestError::InvalidArgument => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_ARGUMENT",
                    request.to_string(),
                ),
                RequestError::NotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", request.to_string())
                }
                RequestError::Store(core) => classify_core_error(core),
            },
        };

        let body = json!({
            "success": false,
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
