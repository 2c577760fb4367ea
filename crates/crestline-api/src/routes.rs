//! Router setup with all API routes and middleware.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Maximum accepted audio upload size.
const AUDIO_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route(
            "/chat/audio",
            post(handlers::chat_audio).layer(DefaultBodyLimit::max(AUDIO_BODY_LIMIT)),
        )
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured port.
///
/// Binds to 127.0.0.1 (localhost only); a reverse proxy fronts public
/// traffic.
pub async fn start_server(
    port: u16,
    state: AppState,
) -> Result<(), crestline_core::CrestlineError> {
    let addr = format!("127.0.0.1:{}", port);
    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| crestline_core::CrestlineError::Api(format!("Failed to bind: {}", e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| crestline_core::CrestlineError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
