use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::models::journal::Journal;
use crate::state::AppState;

/// GET /api/journals
pub async fn handle_list_journals(State(state): State<AppState>) -> Json<Vec<Journal>> {
    Json(state.catalog.list().to_vec())
}

/// GET /api/journals/:id
pub async fn handle_get_journal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Journal>, AppError> {
    let journal = state.catalog.get(&id)?;
    Ok(Json(journal.clone()))
}
