//! Liveness HTTP surface
//!
//! A single endpoint, `GET /_health_check`, answering `"OK"` as a JSON
//! string whenever the process is alive. It deliberately knows nothing
//! about the scheduler or the pipeline: liveness only.

use axum::{routing::get, Json, Router};
use tower_http::trace::TraceLayer;

/// Build the router with all routes.
pub fn build_router() -> Router {
    Router::new()
        .route("/_health_check", get(health_check))
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> Json<&'static str> {
    Json("OK")
}

/// Bind `0.0.0.0:<port>` and serve until `shutdown` resolves.
pub async fn serve(
    port: u16,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, "health-check server listening");

    axum::serve(listener, build_router())
        .with_graceful_shutdown(shutdown)
        .await
}
