//! Journal Catalog: the read-only snapshot of journals used as match targets.
//!
//! Built once at startup and shared as `Arc<Catalog>`; nothing mutates it while
//! requests are being served.

pub mod handlers;
pub mod seed;
pub mod store;

use std::collections::HashMap;

use thiserror::Error;

use crate::models::journal::Journal;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("journal '{0}' not found")]
    NotFound(String),

    #[error("duplicate journal id '{0}' in catalog")]
    DuplicateId(String),

    #[error("journal catalog is empty")]
    Empty,

    #[error("invalid journal seed data: {0}")]
    Seed(String),

    #[error("catalog database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct Catalog {
    journals: Vec<Journal>,
    /// id → insertion position
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a snapshot, preserving the given order as insertion order.
    pub fn new(journals: Vec<Journal>) -> Result<Self, CatalogError> {
        if journals.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut index = HashMap::with_capacity(journals.len());
        for (position, journal) in journals.iter().enumerate() {
            if index.insert(journal.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(journal.id.clone()));
            }
        }

        Ok(Self { journals, index })
    }

    pub fn list(&self) -> &[Journal] {
        &self.journals
    }

    pub fn get(&self, id: &str) -> Result<&Journal, CatalogError> {
        self.position(id)
            .map(|position| &self.journals[position])
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Insertion position of a journal; used to break score ties.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.journals.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::journal;

    #[test]
    fn test_get_and_position_follow_insertion_order() {
        let catalog = Catalog::new(vec![
            journal("b", "Second scope"),
            journal("a", "First scope"),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.position("b"), Some(0));
        assert_eq!(catalog.position("a"), Some(1));
        assert_eq!(catalog.get("a").unwrap().scope, "First scope");
        assert_eq!(catalog.list()[0].id, "b");
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let catalog = Catalog::new(vec![journal("a", "scope")]).unwrap();
        assert!(!catalog.contains("missing"));
        assert!(matches!(
            catalog.get("missing"),
            Err(CatalogError::NotFound(id)) if id == "missing"
        ));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let err = Catalog::new(vec![journal("a", "x"), journal("a", "y")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        assert!(matches!(Catalog::new(vec![]), Err(CatalogError::Empty)));
    }
}
