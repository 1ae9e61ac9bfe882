use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Reference data for one journal in the catalog. Read-only after seeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Journal {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub publisher: String,
    pub impact_factor: f64,
    pub scope: String,
    pub subjects: Vec<String>,
    pub open_access: bool,
    pub review_time: String,
    /// Percentage of submissions accepted, 0 – 100.
    pub acceptance_rate: f64,
    pub website: String,
}
