//! Text layer of already-digitized PDFs, read page by page with lopdf

use crate::{PageTextReport, PageTextSource, SourceError};
use lopdf::Document;
use shared_types::PageText;

pub struct PdfTextLayer;

impl PageTextSource for PdfTextLayer {
    fn name(&self) -> &'static str {
        "pdf-text-layer"
    }

    fn can_handle(&self, data: &[u8]) -> bool {
        data.len() > 4 && &data[0..4] == b"%PDF"
    }

    fn page_texts(&self, data: &[u8]) -> Result<PageTextReport, SourceError> {
        if !self.can_handle(data) {
            return Err(SourceError::NotPdf);
        }

        let doc = Document::load_mem(data).map_err(|e| SourceError::ParseError(e.to_string()))?;
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();

        let mut pages = Vec::new();
        for page_number in &page_numbers {
            // A page whose text cannot be decoded counts as having no text
            match doc.extract_text(&[*page_number]) {
                Ok(text) if !text.trim().is_empty() => pages.push(text),
                Ok(_) => tracing::debug!(page = page_number, "Page has no text layer"),
                Err(e) => tracing::warn!(page = page_number, error = %e, "Page text extraction failed"),
            }
        }

        Ok(PageTextReport {
            total_pages: page_numbers.len(),
            pages: PageText::new(pages),
        })
    }
}
