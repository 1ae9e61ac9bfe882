use std::collections::BTreeSet;

use async_trait::async_trait;

use super::{sort_by_score, MatchError, MatchResult, ScopeMatcher, MAX_SCORE};
use crate::catalog::Catalog;
use crate::manuscript::Manuscript;
use crate::models::journal::Journal;

/// Pure-Rust lexical scope matcher. Fast, deterministic, no LLM call.
///
/// Algorithm:
/// 1. Tokenize title + abstract into lowercase terms (stop words removed,
///    trailing plural `s` folded).
/// 2. Tokenize each journal's scope + subjects the same way.
/// 3. score = |manuscript ∩ journal| / |manuscript| × 100, one decimal.
pub struct KeywordScopeMatcher;

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "into", "onto", "that", "this", "these", "those",
    "are", "was", "were", "been", "being", "has", "have", "had", "our", "their", "its",
    "not", "but", "all", "any", "can", "may", "also", "such", "than", "then", "there",
    "which", "while", "where", "when", "who", "whom", "how", "what", "using", "use", "used",
    "study", "studie", "paper", "article", "present", "propose", "show", "result", "based",
    "new", "novel", "approach", "method", "work", "between", "across", "within", "over",
    "under", "about", "other", "more", "most", "both", "each", "well", "including", "related",
];

#[async_trait]
impl ScopeMatcher for KeywordScopeMatcher {
    async fn rank(
        &self,
        manuscript: &Manuscript,
        catalog: &Catalog,
    ) -> Result<Vec<MatchResult>, MatchError> {
        Ok(compute_keyword_matches(manuscript, catalog))
    }

    fn backend_name(&self) -> &'static str {
        "keyword"
    }
}

fn compute_keyword_matches(manuscript: &Manuscript, catalog: &Catalog) -> Vec<MatchResult> {
    let manuscript_terms = terms(&format!("{} {}", manuscript.title, manuscript.abstract_text));

    let mut results: Vec<MatchResult> = catalog
        .list()
        .iter()
        .map(|journal| {
            let journal_terms = terms(&format!("{} {}", journal.scope, journal.subjects.join(" ")));
            let shared: Vec<&str> = manuscript_terms
                .intersection(&journal_terms)
                .map(String::as_str)
                .collect();

            let score = if manuscript_terms.is_empty() {
                0.0
            } else {
                let raw = shared.len() as f64 / manuscript_terms.len() as f64 * MAX_SCORE;
                (raw * 10.0).round() / 10.0
            };

            MatchResult {
                journal_id: journal.id.clone(),
                score,
                explanation: build_explanation(&shared),
                considerations: build_considerations(journal),
            }
        })
        .collect();

    sort_by_score(&mut results, catalog);
    results
}

fn terms(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(|word| word.to_lowercase())
        .filter(|word| word.chars().count() >= 3)
        .map(fold_plural)
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

fn fold_plural(word: String) -> String {
    if word.len() > 4 && word.ends_with('s') && !word.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word
    }
}

fn build_explanation(shared: &[&str]) -> String {
    if shared.is_empty() {
        "No overlap between the manuscript and this journal's stated scope.".to_string()
    } else {
        format!("Shared scope terms: {}.", shared.join(", "))
    }
}

fn build_considerations(journal: &Journal) -> String {
    let access = if journal.open_access {
        "open access"
    } else {
        "subscription"
    };
    format!(
        "Impact factor {:.1}; {access}; typical review time {}; acceptance rate {:.0}%.",
        journal.impact_factor, journal.review_time, journal.acceptance_rate
    )
}
