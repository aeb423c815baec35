use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Service version plus the active engine kind, `"none"` while untrained.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let engine = state
        .engine
        .as_ref()
        .map_or("none", |engine| engine.kind().as_str());
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "engine": engine
    }))
}
