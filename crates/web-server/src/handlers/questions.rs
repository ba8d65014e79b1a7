use crate::{
    AppState,
    error::AppError,
    extract::{ApiPath, ApiQuery, JsonBody},
    handlers::{ApiResponse, Reply},
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use core_types::{Question, QuestionFilter, QuestionPayload};
use std::sync::Arc;

/// # POST /questions
/// Inserts one row. Missing fields reach the database as NULL and are
/// rejected there.
pub async fn create_question(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<QuestionPayload>,
) -> Reply<()> {
    state
        .repo
        .insert_question(&payload, Utc::now())
        .await
        .map_err(|e| AppError::database("Missing or invalid request data", e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("Question created successfully.")),
    ))
}

/// # GET /questions?title=&category=
pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<QuestionFilter>,
) -> Reply<Vec<Question>> {
    let questions = state
        .repo
        .list_questions(&filter)
        .await
        .map_err(|e| AppError::database("Could not find server", e))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::with_data(
            "OK: Successfully retrieved the list of questions.",
            questions,
        )),
    ))
}

/// # GET /questions/:id
pub async fn get_question(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> Reply<Vec<Question>> {
    let questions = state
        .repo
        .find_question(&id)
        .await
        .map_err(|e| AppError::database("Could not find server", e))?;

    if questions.is_empty() {
        return Err(AppError::NotFound("Question not found"));
    }

    Ok((
        StatusCode::OK,
        Json(ApiResponse::with_data(
            "Successfully retrieved the questions.",
            questions,
        )),
    ))
}

/// # PUT /questions/:id
/// Replaces title, description and category. Omitted fields are written as NULL.
pub async fn update_question(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
    JsonBody(payload): JsonBody<QuestionPayload>,
) -> Reply<()> {
    let affected = state
        .repo
        .update_question(&id, &payload, Utc::now())
        .await
        .map_err(|e| AppError::database("Missing or invalid request data.", e))?;

    if affected == 0 {
        return Err(AppError::NotFound("Question not found."));
    }

    Ok((
        StatusCode::OK,
        Json(ApiResponse::message("Successfully updated the question.")),
    ))
}

/// # DELETE /questions/:id
pub async fn delete_question(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> Reply<()> {
    let affected = state
        .repo
        .delete_question(&id)
        .await
        .map_err(|e| AppError::database("Missing or invalid request data.", e))?;

    if affected == 0 {
        return Err(AppError::NotFound("Question not found."));
    }

    Ok((
        StatusCode::OK,
        Json(ApiResponse::message("Successfully deleted the question.")),
    ))
}
