//! Per-page association over paginated text
//!
//! Each page must carry exactly one stamped Bates number. Zero matches means
//! OCR missed the stamp; more than one means stray digits were read as a
//! Bates number. Either way the page is reported, never guessed.

use crate::patterns::PatternSet;
use shared_types::{
    Association, IssueReason, PageEntry, PageIssue, PageNumber, PageText, ReferencePolicy,
};

pub struct PageAssociator<'a> {
    patterns: &'a PatternSet,
    policy: ReferencePolicy,
}

impl<'a> PageAssociator<'a> {
    pub fn new(patterns: &'a PatternSet, policy: ReferencePolicy) -> Self {
        Self { patterns, policy }
    }

    /// Associate a single page's text
    pub fn associate_page(
        &self,
        page_number: PageNumber,
        text: &str,
    ) -> Result<PageEntry, PageIssue> {
        let issue = |reason| PageIssue { page_number, reason };

        let mut bates = self.patterns.bates_in_text(text);
        match bates.len() {
            0 => return Err(issue(IssueReason::NoIdentifier)),
            1 => {}
            _ => return Err(issue(IssueReason::MultipleIdentifiers(bates))),
        }

        let repair_orders = self.patterns.references_in_text(text);
        if repair_orders.is_empty() && self.policy == ReferencePolicy::Strict {
            return Err(issue(IssueReason::NoReferences));
        }

        Ok(PageEntry {
            bate_number: bates.remove(0),
            repair_orders,
        })
    }

    /// Associate a page delivered as raw bytes; invalid UTF-8 fails only this page
    pub fn associate_page_bytes(
        &self,
        page_number: PageNumber,
        data: &[u8],
    ) -> Result<PageEntry, PageIssue> {
        let text = std::str::from_utf8(data).map_err(|e| PageIssue {
            page_number,
            reason: IssueReason::Failed(format!("page text is not valid UTF-8: {}", e)),
        })?;
        self.associate_page(page_number, text)
    }

    /// Associate every page in order
    pub fn associate(&self, pages: &PageText) -> Association {
        collect_outcomes(
            pages
                .iter()
                .map(|(page_number, text)| {
                    self.associate_page(page_number, text)
                        .map(|entry| (page_number, entry))
                }),
        )
    }

    /// Associate pages delivered as raw bytes
    pub fn associate_raw(&self, pages: &[Vec<u8>]) -> Association {
        collect_outcomes(pages.iter().enumerate().map(|(i, data)| {
            let page_number = i as PageNumber + 1;
            self.associate_page_bytes(page_number, data)
                .map(|entry| (page_number, entry))
        }))
    }
}

/// Fold per-page outcomes into a record and an issue list
fn collect_outcomes<I>(outcomes: I) -> Association
where
    I: Iterator<Item = Result<(PageNumber, PageEntry), PageIssue>>,
{
    let mut association = Association::default();

    for outcome in outcomes {
        match outcome {
            Ok((page_number, entry)) => {
                tracing::debug!(
                    page = page_number,
                    bate_number = %entry.bate_number,
                    repair_orders = entry.repair_orders.len(),
                    "Page associated"
                );
                association.record.insert(page_number, entry);
            }
            Err(issue) => {
                tracing::warn!("{}", issue);
                association.issues.record(issue);
            }
        }
    }

    tracing::info!(
        pages = association.record.len(),
        issues = association.issues.len(),
        "Association complete"
    );

    association
}
