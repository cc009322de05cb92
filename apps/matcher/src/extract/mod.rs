//! Text extraction for uploaded résumés and job descriptions.
//!
//! PDFs go through `pdf-extract`; plain text is decoded as UTF-8. A document
//! with no extractable text yields an empty string, not an error.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

pub mod handlers;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported document type '{0}'")]
    UnsupportedType(String),

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Kind of uploaded document, from content type or file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    pub fn detect(
        content_type: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<Self, ExtractError> {
        let content_type = content_type.map(|c| c.to_ascii_lowercase());
        let extension = file_name
            .and_then(|n| n.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match (content_type.as_deref(), extension.as_deref()) {
            (Some("application/pdf"), _) | (_, Some("pdf")) => Ok(DocumentKind::Pdf),
            (Some(ct), _) if ct.starts_with("text/plain") => Ok(DocumentKind::PlainText),
            (_, Some("txt")) => Ok(DocumentKind::PlainText),
            (ct, _) => Err(ExtractError::UnsupportedType(
                ct.unwrap_or("unknown").to_string(),
            )),
        }
    }
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, kind: DocumentKind, data: &[u8]) -> Result<String, ExtractError>;
}

/// Default extractor. PDF parsing is CPU-bound and runs on the blocking pool.
pub struct DocumentExtractor;

#[async_trait]
impl TextExtractor for DocumentExtractor {
    async fn extract(&self, kind: DocumentKind, data: &[u8]) -> Result<String, ExtractError> {
        let text = match kind {
            DocumentKind::PlainText => String::from_utf8_lossy(data).into_owned(),
            DocumentKind::Pdf => {
                let bytes = data.to_vec();
                tokio::task::spawn_blocking(move || {
                    pdf_extract::extract_text_from_mem(&bytes)
                        .map_err(|e| ExtractError::Pdf(e.to_string()))
                })
                .await??
            }
        };

        let text = text.trim().to_string();
        debug!("Extracted {} chars from {:?} document", text.len(), kind);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_pdf_by_content_type_or_extension() {
        assert_eq!(
            DocumentKind::detect(Some("application/pdf"), None).unwrap(),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::detect(Some("application/octet-stream"), Some("Resume.PDF")).unwrap(),
            DocumentKind::Pdf
        );
    }

    #[test]
    fn test_detects_plain_text() {
        assert_eq!(
            DocumentKind::detect(Some("text/plain; charset=utf-8"), None).unwrap(),
            DocumentKind::PlainText
        );
        assert_eq!(
            DocumentKind::detect(None, Some("jd.txt")).unwrap(),
            DocumentKind::PlainText
        );
    }

    #[test]
    fn test_rejects_other_types() {
        let err = DocumentKind::detect(Some("image/png"), Some("photo.png")).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported document type 'image/png'");
    }

    #[tokio::test]
    async fn test_plain_text_is_trimmed() {
        let text = DocumentExtractor
            .extract(DocumentKind::PlainText, b"  Jane Doe\nPython  \n")
            .await
            .unwrap();
        assert_eq!(text, "Jane Doe\nPython");
    }

    #[tokio::test]
    async fn test_whitespace_only_document_yields_empty_string() {
        let text = DocumentExtractor
            .extract(DocumentKind::PlainText, b"\n\n   ")
            .await
            .unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_garbage_pdf_is_an_error() {
        let result = DocumentExtractor
            .extract(DocumentKind::Pdf, b"not a pdf")
            .await;
        assert!(result.is_err());
    }
}
