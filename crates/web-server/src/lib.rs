use axum::{
    Router, ServiceExt,
    extract::{DefaultBodyLimit, Request},
    http::StatusCode,
    routing::get,
};
use configuration::ServerSettings;
use database::QaRepository;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    normalize_path::NormalizePath,
    trace::TraceLayer,
};

pub mod error;
pub mod extract;
pub mod handlers;

/// Request bodies above this size are rejected before deserialization.
const MAX_BODY_BYTES: usize = 100 * 1024;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn QaRepository>,
}

/// Routes for the question resource and its nested answers, relative to
/// the `/questions` mount point.
fn questions_router() -> Router<Arc<AppState>> {
    use crate::handlers::{answers, questions};

    Router::new()
        .route(
            "/",
            get(questions::list_questions)
                .post(questions::create_question)
                .fallback(not_found),
        )
        .route(
            "/:id",
            get(questions::get_question)
                .put(questions::update_question)
                .delete(questions::delete_question)
                .fallback(not_found),
        )
        .route(
            "/:id/answers",
            get(answers::list_answers)
                .post(answers::create_answer)
                .fallback(not_found),
        )
}

/// A known path with an unregistered method is answered like an unknown path.
async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Builds the full service around a repository.
///
/// Unmatched paths and methods get 404. A trailing slash is trimmed before
/// routing, so `/questions/` serves the same handler as `/questions`.
pub fn app(repo: Arc<dyn QaRepository>) -> NormalizePath<Router> {
    let app_state = Arc::new(AppState { repo });
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    let router = Router::new()
        .route("/test", get(handlers::test_endpoint).fallback(not_found))
        .nest("/questions", questions_router())
        .with_state(app_state)
        .layer(cors)
        // Logs every incoming request and its latency.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    // Must wrap the router: layers added with `Router::layer` run after routing.
    NormalizePath::trim_trailing_slash(router)
}

/// Binds the listener and serves until Ctrl+C or SIGTERM, then closes the
/// repository's pool.
pub async fn run_server(
    settings: &ServerSettings,
    repo: Arc<dyn QaRepository>,
) -> anyhow::Result<()> {
    let app = app(Arc::clone(&repo));

    let listener = TcpListener::bind(settings.socket_addr()).await?;
    tracing::info!("Server is running at {}", listener.local_addr()?);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    repo.close().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}
