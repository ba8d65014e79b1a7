use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{PgPool, postgres::PgPoolOptions};

/// Establishes a connection pool to the PostgreSQL database.
///
/// The connection string is assembled from the five `DB_*` settings. The
/// pool is built once at startup and shared by every request; callers queue
/// inside sqlx when all `max_connections` are busy.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    tracing::debug!(
        host = %settings.host,
        port = %settings.port,
        database = %settings.name,
        max_connections = settings.max_connections,
        "Connecting to PostgreSQL"
    );

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.connection_string())
        .await
        .map_err(DbError::ConnectionError)?;

    tracing::info!(database = %settings.name, "Database pool established");
    Ok(pool)
}
