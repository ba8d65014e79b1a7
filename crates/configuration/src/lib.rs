use crate::error::ConfigError;
use std::collections::HashMap;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DatabaseSettings, ServerSettings};

/// Prefix shared by every database variable (`DB_USERNAME`, `DB_HOST`, ...).
const DB_ENV_PREFIX: &str = "DB";

/// Loads the database settings from the process environment.
///
/// Reads `DB_USERNAME`, `DB_PASSWORD`, `DB_HOST`, `DB_PORT` and `DB_NAME`
/// (plus the optional `DB_MAX_CONNECTIONS`). Missing credentials are not an
/// error here: they become empty segments of the connection string and the
/// failure surfaces when the pool is built.
pub fn load_database_settings() -> Result<DatabaseSettings, ConfigError> {
    build_database_settings(config::Environment::with_prefix(DB_ENV_PREFIX))
}

/// Same as [`load_database_settings`], reading from an explicit map of
/// variables instead of the process environment.
pub fn database_settings_from_map(
    vars: HashMap<String, String>,
) -> Result<DatabaseSettings, ConfigError> {
    build_database_settings(config::Environment::with_prefix(DB_ENV_PREFIX).source(Some(vars)))
}

fn build_database_settings(
    source: config::Environment,
) -> Result<DatabaseSettings, ConfigError> {
    let builder = config::Config::builder().add_source(source).build()?;

    // Attempt to deserialize the variables into our `DatabaseSettings` struct
    let settings = builder.try_deserialize::<DatabaseSettings>()?;

    if settings.max_connections == 0 {
        return Err(ConfigError::ValidationError(
            "DB_MAX_CONNECTIONS must be at least 1".to_string(),
        ));
    }

    Ok(settings)
}
