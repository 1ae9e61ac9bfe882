//! Scope Matching: pluggable, trait-based ranking of catalog journals for a manuscript.
//!
//! Default: `LlmScopeMatcher` (one model call per analysis).
//! Alternative: `KeywordScopeMatcher` (pure-Rust lexical overlap, no network).
//!
//! `AppState` holds an `Arc<dyn ScopeMatcher>`, chosen at startup via config.

pub mod keyword;
pub mod llm;
pub mod prompts;

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::llm_client::{LlmClient, LlmSettings};
use crate::manuscript::Manuscript;

pub use keyword::KeywordScopeMatcher;
pub use llm::LlmScopeMatcher;

/// Upper bound of the match score scale.
pub const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Malformed(String),
}

/// How well one manuscript fits one journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub journal_id: String,
    /// 0.0 – 100.0
    pub score: f64,
    pub explanation: String,
    pub considerations: String,
}

/// Implement this to swap ranking backends without touching handlers.
///
/// Implementations return at most one result per journal, only for journals
/// present in `catalog`, sorted with [`sort_by_score`].
#[async_trait]
pub trait ScopeMatcher: Send + Sync {
    async fn rank(
        &self,
        manuscript: &Manuscript,
        catalog: &Catalog,
    ) -> Result<Vec<MatchResult>, MatchError>;

    /// "llm" | "keyword", reported in responses for transparency.
    fn backend_name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatcherBackend {
    Llm,
    Keyword,
}

impl FromStr for MatcherBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "llm" => Ok(MatcherBackend::Llm),
            "keyword" => Ok(MatcherBackend::Keyword),
            other => Err(format!("unknown matcher backend '{other}' (expected llm or keyword)")),
        }
    }
}

/// Builds the configured matcher. The LLM backend needs client settings.
pub fn build_matcher(
    backend: MatcherBackend,
    llm: Option<&LlmSettings>,
) -> anyhow::Result<Arc<dyn ScopeMatcher>> {
    match backend {
        MatcherBackend::Keyword => Ok(Arc::new(KeywordScopeMatcher)),
        MatcherBackend::Llm => {
            let settings =
                llm.ok_or_else(|| anyhow::anyhow!("llm matcher selected without LLM settings"))?;
            let client = LlmClient::new(settings.clone())?;
            tracing::info!("LLM client initialized (model: {})", settings.model);
            Ok(Arc::new(LlmScopeMatcher::new(Arc::new(client))))
        }
    }
}

/// Descending score; ties keep catalog insertion order.
pub fn sort_by_score(results: &mut [MatchResult], catalog: &Catalog) {
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                let pa = catalog.position(&a.journal_id).unwrap_or(usize::MAX);
                let pb = catalog.position(&b.journal_id).unwrap_or(usize::MAX);
                pa.cmp(&pb)
            })
    });
}
