use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::extraction::ExtractError;
use crate::manuscript::locator::LocateError;
use crate::matching::MatchError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every pipeline failure is terminal for the request: nothing here is retried
/// and no partial recommendations are ever returned alongside an error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Journal not found: {0}")]
    JournalNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Parse failure: {0}")]
    ParseFailure(String),

    #[error("Metadata not found: {0}")]
    MetadataNotFound(String),

    #[error("LLM unavailable: {0}")]
    LlmUnavailable(String),

    #[error("LLM response malformed: {0}")]
    LlmResponseMalformed(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Machine-readable error kind carried in the JSON body.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::JournalNotFound(_) => "JOURNAL_NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            AppError::ParseFailure(_) => "PARSE_FAILURE",
            AppError::MetadataNotFound(_) => "METADATA_NOT_FOUND",
            AppError::LlmUnavailable(_) => "LLM_UNAVAILABLE",
            AppError::LlmResponseMalformed(_) => "LLM_RESPONSE_MALFORMED",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::JournalNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::ParseFailure(_) | AppError::MetadataNotFound(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::LlmUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::LlmResponseMalformed(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::JournalNotFound(msg)
            | AppError::Validation(msg)
            | AppError::UnsupportedFormat(msg)
            | AppError::ParseFailure(msg)
            | AppError::MetadataNotFound(msg) => msg.clone(),
            AppError::LlmUnavailable(msg) => {
                tracing::error!("LLM unavailable: {msg}");
                "The recommendation model is currently unavailable".to_string()
            }
            AppError::LlmResponseMalformed(msg) => {
                tracing::error!("LLM response malformed: {msg}");
                "The recommendation model returned an unreadable response".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                "A database error occurred".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        let body = Json(json!({
            "error": {
                "kind": self.kind(),
                "message": message
            }
        }));

        (self.status(), body).into_response()
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsupportedFormat(_) => AppError::UnsupportedFormat(err.to_string()),
            ExtractError::ParseFailure(_) => AppError::ParseFailure(err.to_string()),
        }
    }
}

impl From<LocateError> for AppError {
    fn from(err: LocateError) -> Self {
        AppError::MetadataNotFound(err.to_string())
    }
}

impl From<MatchError> for AppError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::Unavailable(msg) => AppError::LlmUnavailable(msg),
            MatchError::Malformed(msg) => AppError::LlmResponseMalformed(msg),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => AppError::JournalNotFound(format!("Journal {id} not found")),
            CatalogError::Database(e) => AppError::Database(e),
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_journal_not_found_maps_to_404_with_kind() {
        let (status, body) = body_json(CatalogError::NotFound("nope".into()).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["kind"], "JOURNAL_NOT_FOUND");
        assert!(body["error"]["message"].as_str().unwrap().contains("nope"));
    }

    #[tokio::test]
    async fn test_llm_details_are_not_leaked() {
        let (status, body) =
            body_json(MatchError::Unavailable("api key sk-secret rejected".into()).into()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["kind"], "LLM_UNAVAILABLE");
        assert!(!body["error"]["message"].as_str().unwrap().contains("sk-secret"));
    }

    #[test]
    fn test_extract_errors_map_to_client_statuses() {
        let unsupported: AppError = ExtractError::UnsupportedFormat("rtf".into()).into();
        assert_eq!(unsupported.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(unsupported.kind(), "UNSUPPORTED_FORMAT");

        let parse: AppError = ExtractError::ParseFailure("corrupt".into()).into();
        assert_eq!(parse.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(parse.kind(), "PARSE_FAILURE");
    }

    #[test]
    fn test_locate_and_malformed_kinds() {
        let missing: AppError = LocateError::AbstractNotFound.into();
        assert_eq!(missing.kind(), "METADATA_NOT_FOUND");
        assert!(missing.status().is_client_error());

        let malformed: AppError = MatchError::Malformed("not json".into()).into();
        assert_eq!(malformed.kind(), "LLM_RESPONSE_MALFORMED");
        assert_eq!(malformed.status(), StatusCode::BAD_GATEWAY);
    }
}
