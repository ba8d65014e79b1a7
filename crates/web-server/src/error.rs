use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core_types::CoreError;
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Any failure while building or running a statement, or invalid input.
    /// `detail` is the lower-level message and is returned to the client as-is.
    #[error("{message}: {detail}")]
    BadRequest {
        message: &'static str,
        detail: String,
    },
    /// A well-formed statement that matched zero rows.
    #[error("{0}")]
    NotFound(&'static str),
}

impl AppError {
    /// Wraps a repository failure. Every database error is a 400 here,
    /// including an unreachable server.
    pub fn database(message: &'static str, err: DbError) -> Self {
        tracing::warn!(error = %err, "{}", message);
        AppError::BadRequest {
            message,
            detail: err.driver_message(),
        }
    }

    pub fn invalid(message: &'static str, err: CoreError) -> Self {
        AppError::BadRequest {
            message,
            detail: err.to_string(),
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest { message, detail } => (
                StatusCode::BAD_REQUEST,
                json!({ "message": message, "error": detail }),
            ),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "message": message })),
        };

        (status, Json(body)).into_response()
    }
}
