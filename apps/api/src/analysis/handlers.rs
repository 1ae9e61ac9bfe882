//! Axum route handlers for the Analysis API.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, State,
    },
    Json,
};

use crate::analysis::models::{AnalysisResponse, AnalyzeTextRequest};
use crate::analysis::pipeline::{analyze_document, analyze_text, AnalysisRun};
use crate::analysis::upload::parse_multipart;
use crate::errors::AppError;
use crate::manuscript::Manuscript;
use crate::state::AppState;

/// POST /api/analyze
///
/// Multipart upload of a PDF, DOC or DOCX manuscript. Runs extraction, metadata
/// location and scope matching, and returns ranked journal recommendations.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;
    let draft = parse_multipart(multipart).await?;

    let mut run = AnalysisRun::new();
    let response = analyze_document(&state, draft, &mut run).await?;

    Ok(Json(response))
}

/// POST /api/analyze/text
///
/// Skips extraction: the caller supplies the title and abstract directly.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeTextRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let title = request.title.trim();
    let abstract_text = request.abstract_text.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if abstract_text.is_empty() {
        return Err(AppError::Validation("abstract cannot be empty".to_string()));
    }

    let mut run = AnalysisRun::new();
    let response = analyze_text(&state, Manuscript::new(title, abstract_text), &mut run).await?;

    Ok(Json(response))
}
