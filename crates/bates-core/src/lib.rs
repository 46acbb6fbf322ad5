//! Bates number and repair order extraction
//!
//! Turns page text (or an unpaginated text export plus its filename) into a
//! page record, an issue list, and flat index rows.

pub mod associate;
pub mod config;
pub mod error;
pub mod normalize;
pub mod patterns;

pub use associate::{associate_flat, associate_flat_bytes, PageAssociator};
pub use config::{AssociationConfig, ExtractionConfig};
pub use error::BatesError;
pub use normalize::normalize_rows;
pub use patterns::{PatternConfig, PatternSet};

use shared_types::{Association, PageText, ReferencePolicy, Row};

/// BatesExtractor entry point
pub struct BatesExtractor {
    patterns: PatternSet,
    policy: ReferencePolicy,
}

impl BatesExtractor {
    pub fn new() -> Self {
        Self {
            patterns: PatternSet::default(),
            policy: ReferencePolicy::default(),
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Result<Self, BatesError> {
        Ok(Self {
            patterns: PatternSet::new(&config.patterns)?,
            policy: config.association.reference_policy,
        })
    }

    pub fn with_policy(mut self, policy: ReferencePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    pub fn policy(&self) -> ReferencePolicy {
        self.policy
    }

    /// Structured pipeline: one Bates number per page, issues collected
    pub fn process_pages(&self, pages: &PageText) -> Association {
        PageAssociator::new(&self.patterns, self.policy).associate(pages)
    }

    /// Structured pipeline over undecoded pages; a page that is not valid
    /// UTF-8 becomes an issue instead of failing the document
    pub fn process_raw_pages(&self, pages: &[Vec<u8>]) -> Association {
        PageAssociator::new(&self.patterns, self.policy).associate_raw(pages)
    }

    /// Flat-text pipeline: repair orders from the body, Bates number from the filename
    pub fn process_flat(&self, text: &str, filename: &str) -> Result<Association, BatesError> {
        associate_flat(&self.patterns, text, filename)
    }

    /// Flat-text pipeline over raw bytes
    pub fn process_flat_bytes(
        &self,
        data: &[u8],
        filename: &str,
    ) -> Result<Association, BatesError> {
        associate_flat_bytes(&self.patterns, data, filename)
    }

    /// Flatten an association into index rows
    pub fn rows(&self, association: &Association) -> Vec<Row> {
        normalize_rows(&association.record)
    }
}

impl Default for BatesExtractor {
    fn default() -> Self {
        Self::new()
    }
}
