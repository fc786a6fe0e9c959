use std::sync::Arc;

use axum::{routing::get, Router};

use hush_relay::StateGuard;

use crate::handler;

/// Build the axum router with all status endpoints.
pub fn build_router(state: Arc<StateGuard>) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route("/v1/status", get(handler::status_handler))
        .with_state(state)
}
