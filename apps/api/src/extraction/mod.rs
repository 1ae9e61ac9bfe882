//! Document Extractor: turns an uploaded manuscript into plain text.
//!
//! The extractor only dispatches on the declared type and normalizes errors;
//! the actual decoding lives in the per-format submodules.

pub mod doc;
pub mod docx;
pub mod pdf;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported document format '{0}' (expected pdf, doc or docx)")]
    UnsupportedFormat(String),

    #[error("{0}")]
    ParseFailure(String),
}

/// The document formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Doc,
    Docx,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Pdf => "pdf",
            DocumentType::Doc => "doc",
            DocumentType::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ExtractError;

    /// Accepts bare extensions (`pdf`, `.DOCX`) and the matching MIME types.
    fn from_str(declared: &str) -> Result<Self, Self::Err> {
        let normalized = declared.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "pdf" | "application/pdf" => Ok(DocumentType::Pdf),
            "doc" | "application/msword" => Ok(DocumentType::Doc),
            "docx"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Ok(DocumentType::Docx)
            }
            _ => Err(ExtractError::UnsupportedFormat(declared.trim().to_string())),
        }
    }
}

/// Settings for the legacy `.doc` conversion step.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Office binary used for `.doc` → `.docx` conversion.
    pub doc_converter: String,
    pub convert_timeout: Duration,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            doc_converter: "soffice".to_string(),
            convert_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentExtractor {
    config: ExtractorConfig,
}

impl DocumentExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extracts plain text from `bytes` according to `declared_type`.
    ///
    /// The declared type is validated before the bytes are looked at, so an
    /// unsupported type always yields `UnsupportedFormat`.
    pub async fn extract(&self, bytes: Bytes, declared_type: &str) -> Result<String, ExtractError> {
        let doc_type: DocumentType = declared_type.parse()?;
        self.extract_typed(bytes, doc_type).await
    }

    pub async fn extract_typed(
        &self,
        bytes: Bytes,
        doc_type: DocumentType,
    ) -> Result<String, ExtractError> {
        if bytes.is_empty() {
            return Err(ExtractError::ParseFailure(format!(
                "uploaded {doc_type} document is empty"
            )));
        }

        debug!("Extracting text from {} bytes of {doc_type}", bytes.len());

        let text = match doc_type {
            DocumentType::Pdf => run_parser(move || pdf::extract_text(&bytes)).await?,
            DocumentType::Docx => run_parser(move || docx::extract_text(&bytes)).await?,
            DocumentType::Doc => doc::extract_text(&bytes, &self.config).await?,
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(ExtractError::ParseFailure(format!(
                "no extractable text found in {doc_type} document"
            )));
        }
        Ok(text.to_string())
    }
}

/// Runs a CPU-bound parser on the blocking pool. A panic inside the parser
/// becomes a `ParseFailure` instead of taking the worker down.
pub(crate) async fn run_parser<F>(parse: F) -> Result<String, ExtractError>
where
    F: FnOnce() -> Result<String, ExtractError> + Send + 'static,
{
    tokio::task::spawn_blocking(parse)
        .await
        .map_err(|e| ExtractError::ParseFailure(format!("document parser aborted: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_accepts_extensions_and_mime_types() {
        assert_eq!("pdf".parse::<DocumentType>().unwrap(), DocumentType::Pdf);
        assert_eq!(".DOCX".parse::<DocumentType>().unwrap(), DocumentType::Docx);
        assert_eq!(" Doc ".parse::<DocumentType>().unwrap(), DocumentType::Doc);
        assert_eq!(
            "application/msword".parse::<DocumentType>().unwrap(),
            DocumentType::Doc
        );
        assert_eq!(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                .parse::<DocumentType>()
                .unwrap(),
            DocumentType::Docx
        );
    }

    #[tokio::test]
    async fn test_unsupported_types_fail_before_reading_bytes() {
        let extractor = DocumentExtractor::default();
        // Empty bytes would be a ParseFailure if the bytes were inspected.
        for declared in ["txt", "rtf", "odt", "", "application/zip", "pdfx"] {
            let err = extractor.extract(Bytes::new(), declared).await.unwrap_err();
            assert!(
                matches!(err, ExtractError::UnsupportedFormat(_)),
                "{declared:?} gave {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_empty_bytes_are_parse_failures_for_every_supported_type() {
        let extractor = DocumentExtractor::default();
        for declared in ["pdf", "doc", "docx"] {
            let err = extractor.extract(Bytes::new(), declared).await.unwrap_err();
            assert!(
                matches!(err, ExtractError::ParseFailure(_)),
                "{declared} gave {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_well_formed_docx_yields_text() {
        let bytes = docx::build_docx(&[
            "Fatigue Crack Growth in Additively Manufactured Widgets",
            "Abstract",
            "We study widget fatigue under cyclic loading.",
        ]);
        let text = DocumentExtractor::default()
            .extract(Bytes::from(bytes), "docx")
            .await
            .unwrap();
        assert!(text.starts_with("Fatigue Crack Growth"));
        assert!(text.contains("widget fatigue"));
    }

    #[tokio::test]
    async fn test_well_formed_pdf_yields_text() {
        let bytes = pdf::build_pdf(&["On Widgets", "Abstract", "We study widget fatigue."]);
        let text = DocumentExtractor::default()
            .extract(Bytes::from(bytes), "application/pdf")
            .await
            .unwrap();
        assert!(text.contains("On Widgets"), "{text:?}");
        assert!(text.contains("widget fatigue"), "{text:?}");
    }

    #[tokio::test]
    async fn test_garbage_pdf_is_parse_failure() {
        let err = DocumentExtractor::default()
            .extract(Bytes::from_static(b"this is not a pdf"), "pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::ParseFailure(_)));
    }

    #[tokio::test]
    async fn test_docx_without_text_is_parse_failure() {
        let bytes = docx::build_docx(&["", "   "]);
        let err = DocumentExtractor::default()
            .extract(Bytes::from(bytes), "docx")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::ParseFailure(_)));
    }
}
