use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;

use crate::errors::AppError;
use crate::extract::DocumentKind;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
}

/// POST /api/v1/extract
///
/// Multipart upload with a `file` field (PDF or plain text). Returns the
/// extracted text, trimmed; an empty string when the document has none.
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let kind = DocumentKind::detect(field.content_type(), field.file_name())?;
        let data: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let text = state.extractor.extract(kind, &data).await?;
        return Ok(Json(ExtractResponse { text }));
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}
