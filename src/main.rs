use anyhow::Context;
use clap::Parser;
use configuration::{ServerSettings, load_database_settings};
use database::{DbRepository, QaRepository, connect};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// HTTP API for questions and their answers, backed by PostgreSQL.
///
/// Database credentials are read from DB_USERNAME, DB_PASSWORD, DB_HOST,
/// DB_PORT and DB_NAME (a `.env` file in the working directory is honoured).
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    server: ServerSettings,

    /// Also write logs to a daily-rotated file in this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

/// The main entry point for the Q&A server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing .env is fine; the variables may come from the environment.
    dotenvy::dotenv().ok();

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = init_tracing(cli.log_dir.as_deref());

    let db_settings = load_database_settings().context("Failed to read DB_* settings")?;
    tracing::info!(?db_settings, "Loaded database settings");

    let pool = connect(&db_settings)
        .await
        .context("Failed to connect to the database")?;
    let repo: Arc<dyn QaRepository> = Arc::new(DbRepository::new(pool));

    web_server::run_server(&cli.server, repo).await
}

/// Installs the global subscriber: stdout always, plus a rolling file when
/// `log_dir` is given. `RUST_LOG` overrides the default filter.
fn init_tracing(log_dir: Option<&std::path::Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,sqlx=warn"));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer());

    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "qna.log");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}
