use crate::relay::RelayHandle;
use crate::signaling::{health_handler, ws_handler};
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state handed to every HTTP handler.
pub struct AppState {
    pub relay: RelayHandle,
}

/// `GET /ws` upgrades to the signaling socket, `GET /health` reports counts.
pub fn app(relay: RelayHandle) -> Router {
    let state = Arc::new(AppState { relay });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
