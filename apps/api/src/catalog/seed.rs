use std::path::Path;

use tracing::info;

use super::CatalogError;
use crate::models::journal::Journal;

/// Journal records shipped with the service.
const BUNDLED_SEED: &str = include_str!("../../data/journals.json");

/// Loads seed journals from `path`, or the bundled set when no path is given.
pub fn load_seed(path: Option<&Path>) -> Result<Vec<Journal>, CatalogError> {
    match path {
        Some(path) => {
            info!("Loading journal seed from {}", path.display());
            let raw = std::fs::read_to_string(path).map_err(|e| {
                CatalogError::Seed(format!("cannot read {}: {e}", path.display()))
            })?;
            parse_seed(&raw)
        }
        None => parse_seed(BUNDLED_SEED),
    }
}

pub fn parse_seed(raw: &str) -> Result<Vec<Journal>, CatalogError> {
    let journals: Vec<Journal> =
        serde_json::from_str(raw).map_err(|e| CatalogError::Seed(e.to_string()))?;

    for journal in &journals {
        if journal.id.trim().is_empty() {
            return Err(CatalogError::Seed(format!(
                "journal '{}' has an empty id",
                journal.name
            )));
        }
        if journal.scope.trim().is_empty() {
            return Err(CatalogError::Seed(format!(
                "journal '{}' has an empty scope",
                journal.id
            )));
        }
    }

    Ok(journals)
}
