use axum::{Json, http::StatusCode};
use serde::Serialize;

use crate::error::AppError;

pub mod answers;
pub mod questions;

/// What every resource handler returns.
pub type Reply<T> = Result<(StatusCode, Json<ApiResponse<T>>), AppError>;

/// The body of every successful response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl ApiResponse<()> {
    pub fn message(message: &'static str) -> Self {
        Self {
            message,
            data: None,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn with_data(message: &'static str, data: T) -> Self {
        Self {
            message,
            data: Some(data),
        }
    }
}

/// # GET /test
/// Liveness probe. Does not touch the database.
pub async fn test_endpoint() -> Json<&'static str> {
    Json("Server API is working 🚀")
}
