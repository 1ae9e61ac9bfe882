use std::sync::Arc;

use crate::catalog::Catalog;
use crate::extraction::DocumentExtractor;
use crate::matching::ScopeMatcher;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Everything here is read-only while serving: the catalog is a snapshot taken
/// at startup and the matcher holds no per-request state.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    /// Pluggable scope matcher. Default: LlmScopeMatcher. Swap via MATCHER_BACKEND env.
    pub matcher: Arc<dyn ScopeMatcher>,
    pub extractor: DocumentExtractor,
    /// Recommendations returned per analysis, after ranking.
    pub max_results: usize,
    pub max_upload_bytes: usize,
}
