//! Bates number and repair order patterns
//!
//! Two regimes are supported for Bates numbers: body text (stamped on the
//! page, strict digit width, whole token) and filenames (looser width,
//! extension stripped, case-insensitive). Repair order numbers are matched
//! either as standalone digit tokens (paginated text) or behind a marker
//! after all whitespace has been collapsed (flat text exports).

use crate::error::BatesError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Whitespace plus the invisible spaces OCR exports like to leave behind
    static ref INVISIBLE_WHITESPACE: Regex =
        Regex::new(r"[\s\u{200B}\u{00A0}\u{200C}\u{200D}\u{2060}]+").unwrap();
}

/// Pattern parameters; defaults match the AARON / FOW production set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Literal prefix of every Bates number
    pub bates_prefix: String,
    /// Minimum digits after the prefix in page text
    pub body_min_digits: usize,
    /// Minimum digits after the prefix in a filename
    pub filename_min_digits: usize,
    /// Exact width of a repair order number
    pub reference_digits: usize,
    /// Marker preceding repair order numbers in flat text
    pub flat_marker: String,
    /// Optional single letter between marker and digits; empty for none
    pub flat_suffix: String,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            bates_prefix: "AARON".to_string(),
            body_min_digits: 8,
            filename_min_digits: 7,
            reference_digits: 5,
            flat_marker: "FOW".to_string(),
            flat_suffix: "S".to_string(),
        }
    }
}

impl PatternConfig {
    fn validate(&self) -> Result<(), BatesError> {
        if self.bates_prefix.is_empty()
            || !self.bates_prefix.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(BatesError::InvalidPattern(format!(
                "Bates prefix must be non-empty ASCII alphanumeric, got '{}'",
                self.bates_prefix
            )));
        }
        if self.flat_marker.is_empty()
            || !self.flat_marker.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(BatesError::InvalidPattern(format!(
                "flat marker must be non-empty ASCII alphanumeric, got '{}'",
                self.flat_marker
            )));
        }
        if !self.flat_suffix.is_empty() {
            let mut chars = self.flat_suffix.chars();
            let single_letter = matches!(
                (chars.next(), chars.next()),
                (Some(c), None) if c.is_ascii_alphabetic()
            );
            if !single_letter {
                return Err(BatesError::InvalidPattern(format!(
                    "flat suffix must be a single ASCII letter, got '{}'",
                    self.flat_suffix
                )));
            }
        }
        if self.body_min_digits == 0 || self.filename_min_digits == 0 {
            return Err(BatesError::InvalidPattern(
                "Bates digit widths must be at least 1".to_string(),
            ));
        }
        if self.reference_digits == 0 || self.reference_digits > 9 {
            return Err(BatesError::InvalidPattern(format!(
                "repair order width must be between 1 and 9, got {}",
                self.reference_digits
            )));
        }
        Ok(())
    }
}

/// Compiled patterns, built once per configuration and shared by reference
#[derive(Debug, Clone)]
pub struct PatternSet {
    body_bates: Regex,
    filename_bates: Regex,
    reference: Regex,
    flat_reference: Regex,
    reference_digits: usize,
}

impl PatternSet {
    pub fn new(config: &PatternConfig) -> Result<Self, BatesError> {
        config.validate()?;

        let prefix = regex::escape(&config.bates_prefix.to_uppercase());
        let marker = regex::escape(&config.flat_marker.to_uppercase());
        let suffix = if config.flat_suffix.is_empty() {
            String::new()
        } else {
            format!("(?:{})?", regex::escape(&config.flat_suffix.to_uppercase()))
        };
        let width = config.reference_digits;

        Ok(Self {
            body_bates: Regex::new(&format!(
                r"\b{}[0-9]{{{},}}\b",
                prefix, config.body_min_digits
            ))?,
            filename_bates: Regex::new(&format!(
                r"(?i){}[0-9]{{{},}}",
                prefix, config.filename_min_digits
            ))?,
            reference: Regex::new(&format!(r"\b[0-9]{{{}}}\b", width))?,
            flat_reference: Regex::new(&format!(r"{}{}([0-9]{{{}}})", marker, suffix, width))?,
            reference_digits: width,
        })
    }

    pub fn reference_digits(&self) -> usize {
        self.reference_digits
    }

    /// Bates numbers stamped in page text, in order of appearance
    pub fn bates_in_text(&self, text: &str) -> Vec<String> {
        self.body_bates
            .find_iter(text)
            .map(|m| m.as_str().to_uppercase())
            .collect()
    }

    /// Bates numbers in a filename; the extension is ignored
    pub fn bates_in_filename(&self, filename: &str) -> Vec<String> {
        let stem = match filename.rsplit_once('.') {
            Some((stem, _ext)) => stem,
            None => filename,
        };
        self.filename_bates
            .find_iter(stem)
            .map(|m| m.as_str().to_uppercase())
            .collect()
    }

    /// Standalone repair order numbers in page text
    pub fn references_in_text(&self, text: &str) -> Vec<String> {
        self.reference
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Marker-prefixed repair order numbers in unpaginated text.
    ///
    /// All whitespace is removed and the text uppercased before matching, so
    /// a marker and its digits split across lines still match.
    pub fn references_in_flat_text(&self, text: &str) -> Vec<u32> {
        let collapsed = collapse_whitespace(text).to_uppercase();
        self.flat_reference
            .captures_iter(&collapsed)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| m.as_str().parse::<u32>().ok())
            .collect()
    }

    /// Same as [`references_in_flat_text`](Self::references_in_flat_text) for raw bytes
    pub fn references_in_flat_bytes(&self, data: &[u8]) -> Result<Vec<u32>, BatesError> {
        let text = std::str::from_utf8(data)
            .map_err(|e| BatesError::InvalidInput(format!("text is not valid UTF-8: {}", e)))?;
        Ok(self.references_in_flat_text(text))
    }

    /// Render a flat-text reference back to its fixed-width string form
    pub fn format_reference(&self, number: u32) -> String {
        format!("{:0width$}", number, width = self.reference_digits)
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        // Default configuration always validates and compiles
        Self::new(&PatternConfig::default()).expect("default patterns compile")
    }
}

/// Remove every whitespace character, including zero-width and no-break spaces
pub fn collapse_whitespace(text: &str) -> String {
    INVISIBLE_WHITESPACE.replace_all(text, "").into_owned()
}
