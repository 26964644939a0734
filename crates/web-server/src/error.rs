use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// A query parameter that parsed but is out of its allowed range, or a
    /// numeric parameter that did not parse at all.
    #[error("Invalid parameter: {0}")]
    Validation(String),
    /// An unrecognized enum value such as an unknown sort key.
    #[error(transparent)]
    Invalid(#[from] core_types::CoreError),
}

/// Converts our custom `AppError` into an HTTP response. Every variant is a
/// client mistake, so everything maps to 400 with a JSON error body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Invalid(core_err) => (StatusCode::BAD_REQUEST, core_err.to_string()),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
