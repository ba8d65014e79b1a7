use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::CoreError;

/// Upper bound on answer length, counted in characters.
pub const ANSWER_CONTENT_MAX_CHARS: usize = 300;

/// A row of the `answers` table. Timestamps are `TIMESTAMPTZ`, as for questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Answer {
    pub id: i32,
    pub question_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /questions/:id/answers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub content: Option<String>,
}

impl AnswerPayload {
    /// Returns the content once it is present and within the length limit.
    pub fn validated_content(&self) -> Result<&str, CoreError> {
        let content = self
            .content
            .as_deref()
            .ok_or(CoreError::MissingField("content"))?;

        let actual = content.chars().count();
        if actual > ANSWER_CONTENT_MAX_CHARS {
            return Err(CoreError::TooLong {
                field: "content",
                max: ANSWER_CONTENT_MAX_CHARS,
                actual,
            });
        }
        Ok(content)
    }
}
