use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use serde_json::json;

use hush_relay::{StateGuard, StateSnapshot};

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Current relay state. Never includes identity keys.
pub async fn status_handler(State(state): State<Arc<StateGuard>>) -> Json<StateSnapshot> {
    Json(state.snapshot())
}

/// Info handler.
pub async fn info_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "hush-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
