//! Fixtures shared by unit tests across modules.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::catalog::Catalog;
use crate::extraction::DocumentExtractor;
use crate::llm_client::{CompletionBackend, LlmError};
use crate::matching::{MatchResult, ScopeMatcher};
use crate::models::journal::Journal;
use crate::state::AppState;

pub fn journal(id: &str, scope: &str) -> Journal {
    Journal {
        id: id.to_string(),
        name: format!("Journal {id}"),
        abbreviation: id.to_uppercase(),
        publisher: "Test Press".to_string(),
        impact_factor: 3.0,
        scope: scope.to_string(),
        subjects: vec![],
        open_access: false,
        review_time: "4-6 weeks".to_string(),
        acceptance_rate: 25.0,
        website: format!("https://journals.example.org/{id}"),
    }
}

pub fn result(journal_id: &str, score: f64) -> MatchResult {
    MatchResult {
        journal_id: journal_id.to_string(),
        score,
        explanation: String::new(),
        considerations: String::new(),
    }
}

/// materials-fatigue, social-policy, general-science, in that order.
pub fn sample_catalog() -> Catalog {
    let mut fatigue = journal(
        "materials-fatigue",
        "Materials fatigue and fracture of engineering components under cyclic loading.",
    );
    fatigue.subjects = vec!["mechanical engineering".to_string()];

    let mut policy = journal(
        "social-policy",
        "Social policy, welfare states, poverty, housing and public services.",
    );
    policy.subjects = vec!["sociology".to_string()];

    let general = journal(
        "general-science",
        "Primary research from any discipline in the natural sciences.",
    );

    Catalog::new(vec![fatigue, policy, general]).unwrap()
}

/// A completion backend that returns a fixed reply and counts calls.
pub struct CannedBackend {
    reply: Result<String, (u16, String)>,
    calls: AtomicUsize,
}

impl CannedBackend {
    pub fn reply(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn api_error(status: u16, message: &str) -> Self {
        Self {
            reply: Err((status, message.to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionBackend for CannedBackend {
    async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err((status, message)) => Err(LlmError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }

    fn model(&self) -> &str {
        "canned"
    }
}

pub fn test_state(matcher: Arc<dyn ScopeMatcher>) -> AppState {
    AppState {
        catalog: Arc::new(sample_catalog()),
        matcher,
        extractor: DocumentExtractor::default(),
        max_results: 10,
        max_upload_bytes: 1024 * 1024,
    }
}
