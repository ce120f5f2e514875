//! Router setup and server startup.

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use repcoach_core::config::ServerConfig;
use repcoach_core::error::RepcoachError;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/list_all", get(handlers::list_all))
        .route(
            "/exercises/{name}/images/{file}",
            get(handlers::exercise_image),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until the process exits.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<(), RepcoachError> {
    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        addr = %addr,
        exercises_dir = %state.exercises_dir.display(),
        "Starting catalog service"
    );

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
