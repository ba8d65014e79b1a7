//! A process-local stand-in for the Postgres tables.
//!
//! Mirrors the observable behaviour of `schema.sql`: serial ids, integer
//! parsing of path ids, `NOT NULL` text columns, and the answers foreign key
//! with `ON DELETE CASCADE`. Rejections carry the same message text Postgres
//! would send.

use crate::{DbError, QaRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{Answer, Question, QuestionFilter, QuestionPayload};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Tables {
    questions: Vec<Question>,
    answers: Vec<Answer>,
    question_seq: i32,
    answer_seq: i32,
}

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tables: Mutex<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored question, in insertion order.
    pub async fn questions(&self) -> Vec<Question> {
        self.tables.lock().await.questions.clone()
    }

    /// Snapshot of every stored answer, in insertion order.
    pub async fn answers(&self) -> Vec<Answer> {
        self.tables.lock().await.answers.clone()
    }
}

/// Parses a path id the way Postgres casts text to `integer`.
fn parse_int(raw: &str) -> Result<i32, DbError> {
    let wide: i64 = raw.trim().parse().map_err(|_| {
        DbError::Rejected(format!("invalid input syntax for type integer: \"{raw}\""))
    })?;
    i32::try_from(wide)
        .map_err(|_| DbError::Rejected(format!("value \"{raw}\" is out of range for type integer")))
}

fn not_null(value: Option<&str>, column: &str, relation: &str) -> Result<String, DbError> {
    value.map(str::to_owned).ok_or_else(|| {
        DbError::Rejected(format!(
            "null value in column \"{column}\" of relation \"{relation}\" violates not-null constraint"
        ))
    })
}

struct QuestionColumns {
    title: String,
    description: String,
    category: String,
}

fn question_columns(payload: &QuestionPayload) -> Result<QuestionColumns, DbError> {
    Ok(QuestionColumns {
        title: not_null(payload.title.as_deref(), "title", "questions")?,
        description: not_null(payload.description.as_deref(), "description", "questions")?,
        category: not_null(payload.category.as_deref(), "category", "questions")?,
    })
}

#[async_trait]
impl QaRepository for InMemoryRepository {
    async fn insert_question(
        &self,
        payload: &QuestionPayload,
        now: DateTime<Utc>,
    ) -> Result<u64, DbError> {
        let columns = question_columns(payload)?;
        let mut tables = self.tables.lock().await;
        tables.question_seq += 1;
        let id = tables.question_seq;
        tables.questions.push(Question {
            id,
            title: columns.title,
            description: columns.description,
            category: columns.category,
            created_at: now,
            updated_at: now,
        });
        Ok(1)
    }

    async fn list_questions(&self, filter: &QuestionFilter) -> Result<Vec<Question>, DbError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .questions
            .iter()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect())
    }

    async fn find_question(&self, id: &str) -> Result<Vec<Question>, DbError> {
        let id = parse_int(id)?;
        let tables = self.tables.lock().await;
        Ok(tables
            .questions
            .iter()
            .filter(|q| q.id == id)
            .cloned()
            .collect())
    }

    async fn update_question(
        &self,
        id: &str,
        payload: &QuestionPayload,
        now: DateTime<Utc>,
    ) -> Result<u64, DbError> {
        let id = parse_int(id)?;
        let mut tables = self.tables.lock().await;
        let Some(question) = tables.questions.iter_mut().find(|q| q.id == id) else {
            // Constraints are only checked on rows that are actually updated.
            return Ok(0);
        };

        let columns = question_columns(payload)?;
        question.title = columns.title;
        question.description = columns.description;
        question.category = columns.category;
        question.updated_at = now;
        Ok(1)
    }

    async fn delete_question(&self, id: &str) -> Result<u64, DbError> {
        let id = parse_int(id)?;
        let mut tables = self.tables.lock().await;
        let before = tables.questions.len();
        tables.questions.retain(|q| q.id != id);
        let removed = (before - tables.questions.len()) as u64;
        if removed > 0 {
            tables.answers.retain(|a| a.question_id != id);
        }
        Ok(removed)
    }

    async fn insert_answer(
        &self,
        question_id: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<u64, DbError> {
        let question_id = parse_int(question_id)?;
        let mut tables = self.tables.lock().await;
        if !tables.questions.iter().any(|q| q.id == question_id) {
            return Err(DbError::Rejected(
                "insert or update on table \"answers\" violates foreign key constraint \"answers_question_id_fkey\""
                    .to_string(),
            ));
        }

        tables.answer_seq += 1;
        let id = tables.answer_seq;
        tables.answers.push(Answer {
            id,
            question_id,
            content: content.to_owned(),
            created_at: now,
            updated_at: now,
        });
        Ok(1)
    }

    async fn list_answers(&self, question_id: &str) -> Result<Vec<Answer>, DbError> {
        let question_id = parse_int(question_id)?;
        let tables = self.tables.lock().await;
        Ok(tables
            .answers
            .iter()
            .filter(|a| a.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn close(&self) {}
}
