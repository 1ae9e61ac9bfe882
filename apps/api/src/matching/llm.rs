use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::prompts::{SCOPE_MATCH_PROMPT, SCOPE_MATCH_SYSTEM};
use super::{sort_by_score, MatchError, MatchResult, ScopeMatcher, MAX_SCORE};
use crate::catalog::Catalog;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{parse_json_reply, CompletionBackend};
use crate::manuscript::Manuscript;

/// Semantic scope matcher. Sends the manuscript and the whole catalog in a
/// single prompt and parses the structured reply.
pub struct LlmScopeMatcher {
    backend: Arc<dyn CompletionBackend>,
}

impl LlmScopeMatcher {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }
}

/// Catalog fields the model sees for each journal.
#[derive(Debug, Serialize)]
struct PromptJournal<'a> {
    id: &'a str,
    name: &'a str,
    scope: &'a str,
    subjects: &'a [String],
}

#[derive(Debug, Deserialize)]
struct MatchReply {
    matches: Vec<MatchReplyEntry>,
}

#[derive(Debug, Deserialize)]
struct MatchReplyEntry {
    journal_id: String,
    score: f64,
    explanation: String,
    #[serde(default)]
    considerations: String,
}

#[async_trait]
impl ScopeMatcher for LlmScopeMatcher {
    async fn rank(
        &self,
        manuscript: &Manuscript,
        catalog: &Catalog,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let prompt = build_prompt(manuscript, catalog)?;

        debug!(
            "Requesting scope match from {} for {} journal(s)",
            self.backend.model(),
            catalog.len()
        );

        let system = format!("{SCOPE_MATCH_SYSTEM}\n\n{JSON_ONLY_SYSTEM}");
        let reply = self
            .backend
            .complete(&prompt, &system)
            .await
            .map_err(|e| MatchError::Unavailable(format!("scope match call failed: {e}")))?;

        parse_reply(&reply, catalog)
    }

    fn backend_name(&self) -> &'static str {
        "llm"
    }
}

pub(crate) fn build_prompt(manuscript: &Manuscript, catalog: &Catalog) -> Result<String, MatchError> {
    let journals: Vec<PromptJournal<'_>> = catalog
        .list()
        .iter()
        .map(|j| PromptJournal {
            id: &j.id,
            name: &j.name,
            scope: &j.scope,
            subjects: &j.subjects,
        })
        .collect();
    let journals_json = serde_json::to_string_pretty(&journals)
        .map_err(|e| MatchError::Malformed(format!("failed to encode catalog: {e}")))?;

    Ok(fill_template(
        SCOPE_MATCH_PROMPT,
        &[
            ("title", &manuscript.title),
            ("abstract", &manuscript.abstract_text),
            ("journals", &journals_json),
        ],
    ))
}

/// Replaces `{name}` placeholders in one pass over the template, so braces in
/// substituted text are never expanded again. Unknown `{...}` stays as-is.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Turns the model's reply into validated, ordered match results.
///
/// Entries for unknown journals are dropped and repeated journals keep their
/// first entry. A reply whose entries all miss the catalog is malformed.
pub(crate) fn parse_reply(reply: &str, catalog: &Catalog) -> Result<Vec<MatchResult>, MatchError> {
    let parsed: MatchReply = parse_json_reply(reply)
        .map_err(|e| MatchError::Malformed(format!("unexpected scope match reply: {e}")))?;

    let total = parsed.matches.len();
    let mut seen = HashSet::new();
    let mut results = Vec::with_capacity(total);

    for entry in parsed.matches {
        if !catalog.contains(&entry.journal_id) {
            warn!("Dropping match for unknown journal '{}'", entry.journal_id);
            continue;
        }
        if !seen.insert(entry.journal_id.clone()) {
            warn!("Dropping repeated match for journal '{}'", entry.journal_id);
            continue;
        }
        results.push(MatchResult {
            journal_id: entry.journal_id,
            score: entry.score.clamp(0.0, MAX_SCORE),
            explanation: entry.explanation.trim().to_string(),
            considerations: entry.considerations.trim().to_string(),
        });
    }

    if total > 0 && results.is_empty() {
        return Err(MatchError::Malformed(
            "scope match reply referenced no catalog journals".to_string(),
        ));
    }

    sort_by_score(&mut results, catalog);
    Ok(results)
}
