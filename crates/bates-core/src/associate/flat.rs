//! Association for unpaginated text exports
//!
//! The whole file stands in for one logical page. Repair order numbers come
//! from a whitespace-insensitive scan of the body, the Bates number from how
//! the file was named.

use crate::error::BatesError;
use crate::patterns::PatternSet;
use shared_types::{Association, PageEntry};
use std::path::Path;

/// Page number assigned to the single synthesized entry
pub const FLAT_PAGE_NUMBER: u32 = 1;

pub fn associate_flat(
    patterns: &PatternSet,
    text: &str,
    filename: &str,
) -> Result<Association, BatesError> {
    let numbers = patterns.references_in_flat_text(text);
    if numbers.is_empty() {
        return Err(BatesError::NoReferenceNumbers);
    }

    // Only the final path component names the document
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    let bate_number = patterns
        .bates_in_filename(name)
        .into_iter()
        .next()
        .ok_or_else(|| BatesError::NoIdentifierInFilename(name.to_string()))?;

    let repair_orders: Vec<String> = numbers
        .into_iter()
        .map(|n| patterns.format_reference(n))
        .collect();

    tracing::info!(
        bate_number = %bate_number,
        repair_orders = repair_orders.len(),
        "Flat text associated"
    );

    let mut association = Association::default();
    association
        .record
        .insert(FLAT_PAGE_NUMBER, PageEntry::new(bate_number, repair_orders));
    Ok(association)
}

/// Flat association over raw bytes; the text must be UTF-8
pub fn associate_flat_bytes(
    patterns: &PatternSet,
    data: &[u8],
    filename: &str,
) -> Result<Association, BatesError> {
    let text = std::str::from_utf8(data)
        .map_err(|e| BatesError::InvalidInput(format!("text is not valid UTF-8: {}", e)))?;
    associate_flat(patterns, text, filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flat_single_page_entry() {
        let patterns = PatternSet::default();
        let text = "Invoice\nFOW S12345\nParts FOW\n54321\nfows 0 0 1 2 3";
        let result = associate_flat(&patterns, text, "AARON0001302.txt").unwrap();

        assert!(result.issues.is_empty());
        assert_eq!(result.record.len(), 1);
        assert_eq!(
            result.record.get(FLAT_PAGE_NUMBER),
            Some(&PageEntry::new(
                "AARON0001302",
                vec![
                    "12345".to_string(),
                    "54321".to_string(),
                    "00123".to_string()
                ]
            ))
        );
    }

    #[test]
    fn test_flat_uses_final_path_component() {
        let patterns = PatternSet::default();
        let result =
            associate_flat(&patterns, "FOW12345", "/data/AARON9999999/AARON0001302.txt").unwrap();
        assert_eq!(
            result.record.get(1).map(|e| e.bate_number.as_str()),
            Some("AARON0001302")
        );
    }

    #[test]
    fn test_flat_first_filename_match_wins() {
        let patterns = PatternSet::default();
        let result = associate_flat(&patterns, "FOW12345", "AARON0000001_AARON0000002.txt").unwrap();
        assert_eq!(
            result.record.get(1).map(|e| e.bate_number.as_str()),
            Some("AARON0000001")
        );
    }

    #[test]
    fn test_flat_without_references_fails() {
        let patterns = PatternSet::default();
        let err = associate_flat(&patterns, "nothing to see", "AARON0001302.txt").unwrap_err();
        assert_eq!(err, BatesError::NoReferenceNumbers);
    }

    #[test]
    fn test_flat_without_filename_bates_fails() {
        let patterns = PatternSet::default();
        let err = associate_flat(&patterns, "FOW12345", "report.txt").unwrap_err();
        assert_eq!(
            err,
            BatesError::NoIdentifierInFilename("report.txt".to_string())
        );
    }

    #[test]
    fn test_flat_bytes_rejects_invalid_utf8() {
        let patterns = PatternSet::default();
        let err = associate_flat_bytes(&patterns, &[0xff, 0xfe], "AARON0001302.txt").unwrap_err();
        assert!(matches!(err, BatesError::InvalidInput(_)));
    }
}
