use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to connect to the database: {0}")]
    ConnectionError(#[source] sqlx::Error),

    #[error("Database query failed: {0}")]
    QueryError(#[from] sqlx::Error),

    /// A statement refused by the store itself (constraint or type check).
    /// Produced by non-Postgres implementations of `QaRepository`.
    #[error("Statement rejected: {0}")]
    Rejected(String),
}

impl DbError {
    /// The lower-level failure text, as reported by the driver or server.
    ///
    /// For errors raised by Postgres this is the server's message without
    /// the SQLSTATE or any wrapping prefix.
    pub fn driver_message(&self) -> String {
        match self {
            DbError::ConnectionError(e) | DbError::QueryError(e) => match e {
                sqlx::Error::Database(db_err) => db_err.message().to_string(),
                other => other.to_string(),
            },
            DbError::Rejected(message) => message.clone(),
        }
    }
}
