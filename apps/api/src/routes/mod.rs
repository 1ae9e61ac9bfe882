pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::catalog::handlers as catalog;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/api/health", get(health::health_handler))
        // Journal catalog
        .route("/api/journals", get(catalog::handle_list_journals))
        .route("/api/journals/:id", get(catalog::handle_get_journal))
        // Analysis
        .route("/api/analyze", post(analysis::handle_analyze))
        .route("/api/analyze/text", post(analysis::handle_analyze_text))
        .layer(body_limit)
        .with_state(state)
}
