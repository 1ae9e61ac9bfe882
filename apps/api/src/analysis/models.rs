use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::MatchResult;
use crate::models::journal::Journal;

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

/// One ranked match joined with the journal it refers to.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub result: MatchResult,
    pub journal: Journal,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Descending by score.
    pub matches: Vec<Recommendation>,
    pub matcher_backend: String,
    pub analyzed_at: DateTime<Utc>,
}
