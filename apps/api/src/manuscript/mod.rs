pub mod locator;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// The (title, abstract) pair handed to the scope matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manuscript {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

impl Manuscript {
    pub fn new(title: impl Into<String>, abstract_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            abstract_text: abstract_text.into(),
        }
    }
}

/// An uploaded manuscript as it moves through one analysis request.
/// Owned by the request handler and dropped with the response.
#[derive(Debug, Clone)]
pub struct ManuscriptDraft {
    pub raw_bytes: Bytes,
    pub declared_type: String,
    pub filename: Option<String>,
    pub extracted_text: Option<String>,
    pub title: Option<String>,
    pub abstract_text: Option<String>,
}

impl ManuscriptDraft {
    pub fn new(raw_bytes: Bytes, declared_type: String, filename: Option<String>) -> Self {
        Self {
            raw_bytes,
            declared_type,
            filename,
            extracted_text: None,
            title: None,
            abstract_text: None,
        }
    }
}
