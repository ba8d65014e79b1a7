use crate::{
    AppState,
    error::AppError,
    extract::{ApiPath, JsonBody},
    handlers::{ApiResponse, Reply},
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use core_types::{Answer, AnswerPayload, CoreError};
use std::sync::Arc;

/// # POST /questions/:id/answers
/// Content is checked before the database is touched. The parent question is
/// not looked up; a dangling id is left to the schema's foreign key.
pub async fn create_answer(
    State(state): State<Arc<AppState>>,
    ApiPath(question_id): ApiPath<String>,
    JsonBody(payload): JsonBody<AnswerPayload>,
) -> Reply<()> {
    let content = payload.validated_content().map_err(|e| match e {
        CoreError::TooLong { .. } => {
            AppError::invalid("Answer content must not exceed 300 characters.", e)
        }
        CoreError::MissingField(_) => AppError::invalid("Missing or invalid request data", e),
    })?;

    state
        .repo
        .insert_answer(&question_id, content, Utc::now())
        .await
        .map_err(|e| AppError::database("Missing or invalid request data", e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("Answer created successfully.")),
    ))
}

/// # GET /questions/:id/answers
/// An unknown question and a question without answers both yield 404.
pub async fn list_answers(
    State(state): State<Arc<AppState>>,
    ApiPath(question_id): ApiPath<String>,
) -> Reply<Vec<Answer>> {
    let answers = state
        .repo
        .list_answers(&question_id)
        .await
        .map_err(|e| AppError::database("Could not find server", e))?;

    if answers.is_empty() {
        return Err(AppError::NotFound("Answers not found"));
    }

    Ok((
        StatusCode::OK,
        Json(ApiResponse::with_data(
            "Successfully retrieved the answers.",
            answers,
        )),
    ))
}
