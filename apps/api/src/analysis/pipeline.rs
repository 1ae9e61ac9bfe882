//! The per-request analysis pipeline.
//!
//! `Received → Extracting → Locating → Matching → Responded`. A failure in any
//! stage jumps straight to `Responded` carrying the error; there is no partial
//! result and no retry.

use anyhow::anyhow;
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analysis::models::{AnalysisResponse, Recommendation};
use crate::errors::AppError;
use crate::manuscript::locator::locate;
use crate::manuscript::{Manuscript, ManuscriptDraft};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Received,
    Extracting,
    Locating,
    Matching,
    Responded,
}

/// Tracks one request through the pipeline stages.
#[derive(Debug)]
pub struct AnalysisRun {
    pub id: Uuid,
    visited: Vec<AnalysisStage>,
}

impl AnalysisRun {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        debug!(analysis_id = %id, "Analysis received");
        Self {
            id,
            visited: vec![AnalysisStage::Received],
        }
    }

    pub fn stage(&self) -> AnalysisStage {
        self.visited
            .last()
            .copied()
            .unwrap_or(AnalysisStage::Received)
    }

    pub fn stages(&self) -> &[AnalysisStage] {
        &self.visited
    }

    fn advance(&mut self, next: AnalysisStage) {
        debug!(analysis_id = %self.id, from = ?self.stage(), to = ?next, "Analysis stage");
        self.visited.push(next);
    }

    fn respond<T>(&mut self, outcome: &Result<T, AppError>) {
        let failed_in = self.stage();
        self.visited.push(AnalysisStage::Responded);
        match outcome {
            Ok(_) => info!(analysis_id = %self.id, "Analysis completed"),
            Err(e) => warn!(
                analysis_id = %self.id,
                stage = ?failed_in,
                kind = e.kind(),
                "Analysis failed: {e}"
            ),
        }
    }
}

impl Default for AnalysisRun {
    fn default() -> Self {
        Self::new()
    }
}

/// Full pipeline for an uploaded document.
pub async fn analyze_document(
    state: &AppState,
    draft: ManuscriptDraft,
    run: &mut AnalysisRun,
) -> Result<AnalysisResponse, AppError> {
    let outcome = run_document(state, draft, run).await;
    run.respond(&outcome);
    outcome
}

/// Matching only, for a title/abstract typed in by the user.
pub async fn analyze_text(
    state: &AppState,
    manuscript: Manuscript,
    run: &mut AnalysisRun,
) -> Result<AnalysisResponse, AppError> {
    let outcome = run_matching(state, manuscript, run).await;
    run.respond(&outcome);
    outcome
}

async fn run_document(
    state: &AppState,
    mut draft: ManuscriptDraft,
    run: &mut AnalysisRun,
) -> Result<AnalysisResponse, AppError> {
    run.advance(AnalysisStage::Extracting);
    let text = state
        .extractor
        .extract(draft.raw_bytes.clone(), &draft.declared_type)
        .await?;

    draft.extracted_text = Some(text);

    run.advance(AnalysisStage::Locating);
    let manuscript = locate(draft.extracted_text.as_deref().unwrap_or_default())?;
    draft.title = Some(manuscript.title.clone());
    draft.abstract_text = Some(manuscript.abstract_text.clone());
    debug!(
        analysis_id = %run.id,
        filename = ?draft.filename,
        title = ?draft.title,
        text_len = draft.extracted_text.as_deref().map(str::len),
        abstract_len = draft.abstract_text.as_deref().map(str::len),
        "Located manuscript metadata"
    );

    run_matching(state, manuscript, run).await
}

async fn run_matching(
    state: &AppState,
    manuscript: Manuscript,
    run: &mut AnalysisRun,
) -> Result<AnalysisResponse, AppError> {
    run.advance(AnalysisStage::Matching);
    let results = state.matcher.rank(&manuscript, &state.catalog).await?;

    let matches = results
        .into_iter()
        .take(state.max_results)
        .map(|result| {
            let journal = state
                .catalog
                .get(&result.journal_id)
                .map_err(|e| AppError::Internal(anyhow!("matcher returned {e}")))?
                .clone();
            Ok(Recommendation { result, journal })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(AnalysisResponse {
        analysis_id: run.id,
        title: manuscript.title,
        abstract_text: manuscript.abstract_text,
        matches,
        matcher_backend: state.matcher.backend_name().to_string(),
        analyzed_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::docx::build_docx;
    use crate::matching::{KeywordScopeMatcher, LlmScopeMatcher};
    use crate::test_support::{test_state, CannedBackend};
    use bytes::Bytes;
    use std::sync::Arc;

    use super::AnalysisStage::*;

    fn docx_draft(paragraphs: &[&str]) -> ManuscriptDraft {
        ManuscriptDraft::new(
            Bytes::from(build_docx(paragraphs)),
            "docx".to_string(),
            Some("paper.docx".to_string()),
        )
    }

    #[tokio::test]
    async fn test_document_runs_every_stage() {
        let state = test_state(Arc::new(KeywordScopeMatcher));
        let draft = docx_draft(&[
            "On Widgets",
            "Abstract",
            "We study widget fatigue under cyclic loading.",
            "Introduction",
        ]);
        let mut run = AnalysisRun::new();

        let response = analyze_document(&state, draft, &mut run).await.unwrap();

        assert_eq!(
            run.stages(),
            &[Received, Extracting, Locating, Matching, Responded]
        );
        assert_eq!(response.analysis_id, run.id);
        assert_eq!(response.title, "On Widgets");
        assert_eq!(
            response.abstract_text,
            "We study widget fatigue under cyclic loading."
        );
        assert_eq!(response.matches[0].journal.id, "materials-fatigue");
        assert_eq!(response.matcher_backend, "keyword");
    }

    #[tokio::test]
    async fn test_unsupported_format_skips_to_responded() {
        let state = test_state(Arc::new(KeywordScopeMatcher));
        let draft = ManuscriptDraft::new(Bytes::from_static(b"{\\rtf1}"), "rtf".into(), None);
        let mut run = AnalysisRun::new();

        let err = analyze_document(&state, draft, &mut run).await.unwrap_err();

        assert!(matches!(err, AppError::UnsupportedFormat(_)));
        assert_eq!(run.stages(), &[Received, Extracting, Responded]);
    }

    #[tokio::test]
    async fn test_missing_abstract_stops_at_locating() {
        let backend = Arc::new(CannedBackend::reply("{\"matches\": []}"));
        let state = test_state(Arc::new(LlmScopeMatcher::new(backend.clone())));
        let draft = docx_draft(&["On Widgets", "Widgets are interesting."]);
        let mut run = AnalysisRun::new();

        let err = analyze_document(&state, draft, &mut run).await.unwrap_err();

        assert!(matches!(err, AppError::MetadataNotFound(_)));
        assert_eq!(run.stages(), &[Received, Extracting, Locating, Responded]);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_llm_reply_fails_whole_request() {
        let backend = Arc::new(CannedBackend::reply("Materials Fatigue, definitely."));
        let state = test_state(Arc::new(LlmScopeMatcher::new(backend)));
        let mut run = AnalysisRun::new();

        let err = analyze_text(&state, Manuscript::new("On Widgets", "Fatigue."), &mut run)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::LlmResponseMalformed(_)));
        assert_eq!(run.stage(), Responded);
    }

    #[tokio::test]
    async fn test_results_are_truncated_after_ranking() {
        let mut state = test_state(Arc::new(KeywordScopeMatcher));
        state.max_results = 1;
        let mut run = AnalysisRun::new();

        let response = analyze_text(
            &state,
            Manuscript::new("Welfare", "Housing policy and poverty."),
            &mut run,
        )
        .await
        .unwrap();

        assert_eq!(response.matches.len(), 1);
        assert_eq!(response.matches[0].journal.id, "social-policy");
    }
}
