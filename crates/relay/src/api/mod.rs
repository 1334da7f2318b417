//! HTTP API routes.

mod routes;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::relay::RelayState;

/// Shared app state.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayState>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/viewers", get(routes::viewers))
        .route("/ws", get(routes::ws_handler))
        .layer(cors)
        .with_state(state)
}

/// Control panels measure round-trip latency with HEAD requests against
/// the root, so it answers with a cheap one-liner.
async fn root() -> &'static str {
    "overlay relay"
}

async fn health() -> &'static str {
    "ok"
}
