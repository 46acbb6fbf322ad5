//! Page text sources
//!
//! Turns raw document bytes into ordered per-page text. Pages without any
//! extractable text are dropped, so page numbers downstream count
//! text-bearing pages only.

pub mod form_feed;
pub mod pdf;

pub use form_feed::{split_raw_pages, FormFeedPages, RawPages};
pub use pdf::PdfTextLayer;

use shared_types::PageText;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Input is not a PDF")]
    NotPdf,

    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("Text encoding error: {0}")]
    EncodingError(String),

    #[error("No page text source can handle this input")]
    Unsupported,
}

/// Pages recovered from one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTextReport {
    /// Physical pages in the document, including those without text
    pub total_pages: usize,
    /// Text-bearing pages, in document order
    pub pages: PageText,
}

impl PageTextReport {
    pub fn text_pages(&self) -> usize {
        self.pages.len()
    }
}

/// Trait for page text backends
pub trait PageTextSource {
    /// Backend identifier
    fn name(&self) -> &'static str;

    /// Check if this backend can likely handle the input
    fn can_handle(&self, data: &[u8]) -> bool;

    fn page_texts(&self, data: &[u8]) -> Result<PageTextReport, SourceError>;
}

/// Pick the first backend that accepts the input: PDF text layer, then
/// form-feed separated plain text.
pub fn extract_page_texts(data: &[u8]) -> Result<PageTextReport, SourceError> {
    let sources: [&dyn PageTextSource; 2] = [&PdfTextLayer, &FormFeedPages];

    let source = sources
        .into_iter()
        .find(|s| s.can_handle(data))
        .ok_or(SourceError::Unsupported)?;

    let report = source.page_texts(data)?;
    tracing::info!(
        source = source.name(),
        total_pages = report.total_pages,
        text_pages = report.text_pages(),
        "Page text extracted"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_plain_text_to_form_feed() {
        let report = extract_page_texts(b"page one\x0Cpage two").unwrap();
        assert_eq!(report.total_pages, 2);
        assert_eq!(report.text_pages(), 2);
    }

    #[test]
    fn test_rejects_binary_garbage() {
        let err = extract_page_texts(&[0xff, 0xfe, 0x00, 0x80]).unwrap_err();
        assert!(matches!(err, SourceError::Unsupported));
    }

    #[test]
    fn test_broken_pdf_is_parse_error() {
        let err = extract_page_texts(b"%PDF-1.4 truncated").unwrap_err();
        assert!(matches!(err, SourceError::ParseError(_)));
    }
}
