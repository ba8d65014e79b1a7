use crate::DbError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{Answer, Question, QuestionFilter, QuestionPayload};
use sqlx::postgres::PgPool;

/// Data access for the `questions` and `answers` tables.
///
/// Identifiers arrive exactly as they appeared in the request path. Write
/// methods return the number of affected rows; callers treat `0` as "not
/// found". Timestamps are supplied by the caller, never by the database.
#[async_trait]
pub trait QaRepository: Send + Sync {
    async fn insert_question(
        &self,
        payload: &QuestionPayload,
        now: DateTime<Utc>,
    ) -> Result<u64, DbError>;

    async fn list_questions(&self, filter: &QuestionFilter) -> Result<Vec<Question>, DbError>;

    /// Rows whose id equals `id`. Empty when nothing matches.
    async fn find_question(&self, id: &str) -> Result<Vec<Question>, DbError>;

    /// Overwrites all three text columns and `updated_at`.
    async fn update_question(
        &self,
        id: &str,
        payload: &QuestionPayload,
        now: DateTime<Utc>,
    ) -> Result<u64, DbError>;

    async fn delete_question(&self, id: &str) -> Result<u64, DbError>;

    /// Does not check that the question exists; that is left to the schema.
    async fn insert_answer(
        &self,
        question_id: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<u64, DbError>;

    async fn list_answers(&self, question_id: &str) -> Result<Vec<Answer>, DbError>;

    /// Releases pooled connections. Called once at shutdown.
    async fn close(&self);
}

/// The `DbRepository` is the PostgreSQL implementation of [`QaRepository`].
/// It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QaRepository for DbRepository {
    async fn insert_question(
        &self,
        payload: &QuestionPayload,
        now: DateTime<Utc>,
    ) -> Result<u64, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO questions (title, description, category, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(payload.title.as_deref())
        .bind(payload.description.as_deref())
        .bind(payload.category.as_deref())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn list_questions(&self, filter: &QuestionFilter) -> Result<Vec<Question>, DbError> {
        // A NULL parameter disables its predicate.
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, title, description, category, created_at, updated_at
            FROM questions
            WHERE ($1::text IS NULL OR title = $1)
              AND ($2::text IS NULL OR category = $2)
            "#,
        )
        .bind(filter.title.as_deref())
        .bind(filter.category.as_deref())
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(
            count = questions.len(),
            filtered = !filter.is_empty(),
            "Listed questions"
        );
        Ok(questions)
    }

    async fn find_question(&self, id: &str) -> Result<Vec<Question>, DbError> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, title, description, category, created_at, updated_at
            FROM questions
            WHERE id = $1::integer
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn update_question(
        &self,
        id: &str,
        payload: &QuestionPayload,
        now: DateTime<Utc>,
    ) -> Result<u64, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE questions
            SET title = $2,
                description = $3,
                category = $4,
                updated_at = $5
            WHERE id = $1::integer
            "#,
        )
        .bind(id)
        .bind(payload.title.as_deref())
        .bind(payload.description.as_deref())
        .bind(payload.category.as_deref())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_question(&self, id: &str) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1::integer")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn insert_answer(
        &self,
        question_id: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<u64, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO answers (question_id, content, created_at, updated_at)
            VALUES ($1::integer, $2, $3, $4)
            "#,
        )
        .bind(question_id)
        .bind(content)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn list_answers(&self, question_id: &str) -> Result<Vec<Answer>, DbError> {
        let answers = sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, question_id, content, created_at, updated_at
            FROM answers
            WHERE question_id = $1::integer
            "#,
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}
