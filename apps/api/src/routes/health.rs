use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /api/health
/// Returns service status, version, and the number of journals being served.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "scopematch-api",
        "matcher": state.matcher.backend_name(),
        "journals": state.catalog.len()
    }))
}
