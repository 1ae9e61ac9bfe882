use std::path::Path;

use axum::extract::Multipart;

use crate::errors::AppError;
use crate::manuscript::ManuscriptDraft;

/// Form field names accepted for the manuscript file.
const FILE_FIELDS: &[&str] = &["file", "manuscript"];
const TYPE_FIELD: &str = "file_type";

struct UploadedFile {
    filename: Option<String>,
    content_type: Option<String>,
    data: bytes::Bytes,
}

/// Reads the multipart upload into a draft. Unknown fields are ignored.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<ManuscriptDraft, AppError> {
    let mut file: Option<UploadedFile> = None;
    let mut explicit_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read form field: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();

        if FILE_FIELDS.contains(&name.as_str()) {
            if file.is_some() {
                return Err(AppError::Validation(
                    "Only one manuscript file may be uploaded".to_string(),
                ));
            }
            let filename = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file data: {e}")))?;
            file = Some(UploadedFile {
                filename,
                content_type,
                data,
            });
        } else if name == TYPE_FIELD {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read {TYPE_FIELD}: {e}")))?;
            if !value.trim().is_empty() {
                explicit_type = Some(value);
            }
        }
    }

    let file = file.ok_or_else(|| {
        AppError::Validation("Missing manuscript file (form field 'file')".to_string())
    })?;

    let declared_type = resolve_declared_type(
        explicit_type.as_deref(),
        file.filename.as_deref(),
        file.content_type.as_deref(),
    );

    Ok(ManuscriptDraft::new(file.data, declared_type, file.filename))
}

/// Picks the declared type: explicit form field, then filename extension,
/// then the part's content type. Returns an empty string when nothing is known,
/// which the extractor rejects as an unsupported format.
pub fn resolve_declared_type(
    explicit: Option<&str>,
    filename: Option<&str>,
    content_type: Option<&str>,
) -> String {
    if let Some(explicit) = explicit.filter(|t| !t.trim().is_empty()) {
        return explicit.trim().to_string();
    }

    if let Some(ext) = filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
    {
        return ext.to_string();
    }

    content_type
        .filter(|ct| !ct.eq_ignore_ascii_case("application/octet-stream"))
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_string())
        .unwrap_or_default()
}
