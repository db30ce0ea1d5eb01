//! HTTP surface: `GET /rssproxy` and `GET /health`.

pub mod error;
pub mod handlers;

pub use error::{ApiError, ErrorCode};
pub use handlers::AppState;

use std::net::SocketAddr;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use handlers::{health_check, proxy_feed};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/rssproxy", get(proxy_feed))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("rssproxy listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(state)).await
}
