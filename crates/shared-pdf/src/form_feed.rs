//! Plain text with form feed (`\x0C`) page separators

use crate::{PageTextReport, PageTextSource, SourceError};
use shared_types::PageText;

pub struct FormFeedPages;

impl PageTextSource for FormFeedPages {
    fn name(&self) -> &'static str {
        "form-feed"
    }

    fn can_handle(&self, data: &[u8]) -> bool {
        std::str::from_utf8(data).is_ok()
    }

    fn page_texts(&self, data: &[u8]) -> Result<PageTextReport, SourceError> {
        let text = std::str::from_utf8(data)
            .map_err(|e| SourceError::EncodingError(e.to_string()))?;
        Ok(split_pages(text))
    }
}

/// Split on form feeds, dropping blank pages
pub fn split_pages(text: &str) -> PageTextReport {
    // A trailing separator does not start another page
    let body = text.strip_suffix('\x0C').unwrap_or(text);
    if body.is_empty() {
        return PageTextReport::default();
    }

    let segments: Vec<&str> = body.split('\x0C').collect();
    let pages: PageText = segments
        .iter()
        .filter(|page| !page.trim().is_empty())
        .map(|page| page.to_string())
        .collect();

    PageTextReport {
        total_pages: segments.len(),
        pages,
    }
}

/// Pages of a form-feed separated file, still as raw bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPages {
    /// Segments between separators, including blank ones
    pub total_pages: usize,
    /// Non-blank segments, in file order
    pub pages: Vec<Vec<u8>>,
}

/// Split raw bytes on form feeds without decoding them.
///
/// `0x0C` never occurs inside a multi-byte UTF-8 sequence, so a page that
/// fails to decode does not affect where its neighbours start and end.
pub fn split_raw_pages(data: &[u8]) -> RawPages {
    let body = data.strip_suffix(b"\x0C").unwrap_or(data);
    if body.is_empty() {
        return RawPages::default();
    }

    let segments: Vec<&[u8]> = body.split(|b| *b == 0x0C).collect();
    let pages = segments
        .iter()
        .filter(|page| !is_blank(page))
        .map(|page| page.to_vec())
        .collect();

    RawPages {
        total_pages: segments.len(),
        pages,
    }
}

fn is_blank(page: &[u8]) -> bool {
    match std::str::from_utf8(page) {
        Ok(text) => text.trim().is_empty(),
        Err(_) => false,
    }
}
