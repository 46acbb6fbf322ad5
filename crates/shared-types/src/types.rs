use std::collections::BTreeMap;
use std::fmt;

/// 1-based page number, counted over text-bearing pages only
pub type PageNumber = u32;

/// Ordered per-page text as returned by the OCR / text-layer collaborator.
///
/// Index `i` corresponds to page number `i + 1`. Pages without extractable
/// text are omitted upstream, not represented as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PageText(Vec<String>);

impl PageText {
    pub fn new(pages: Vec<String>) -> Self {
        Self(pages)
    }

    pub fn pages(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate pages paired with their 1-based page number
    pub fn iter(&self) -> impl Iterator<Item = (PageNumber, &str)> {
        self.0
            .iter()
            .enumerate()
            .map(|(i, text)| (i as PageNumber + 1, text.as_str()))
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for PageText {
    fn from(pages: Vec<String>) -> Self {
        Self::new(pages)
    }
}

impl FromIterator<String> for PageText {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The single Bates number found on a page and its repair order numbers
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PageEntry {
    pub bate_number: String,
    /// Repair order numbers in order of appearance
    pub repair_orders: Vec<String>,
}

impl PageEntry {
    pub fn new(bate_number: impl Into<String>, repair_orders: Vec<String>) -> Self {
        Self {
            bate_number: bate_number.into(),
            repair_orders,
        }
    }
}

/// Pages that passed association, keyed by page number.
///
/// A page is present only if it yielded exactly one Bates number (and, under
/// the strict policy, at least one repair order number).
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PageRecord {
    pages: BTreeMap<PageNumber, PageEntry>,
}

impl PageRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, page_number: PageNumber, entry: PageEntry) {
        self.pages.insert(page_number, entry);
    }

    pub fn get(&self, page_number: PageNumber) -> Option<&PageEntry> {
        self.pages.get(&page_number)
    }

    pub fn contains(&self, page_number: PageNumber) -> bool {
        self.pages.contains_key(&page_number)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Entries in ascending page order
    pub fn iter(&self) -> impl Iterator<Item = (PageNumber, &PageEntry)> {
        self.pages.iter().map(|(page, entry)| (*page, entry))
    }
}

/// Why a page could not be associated
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum IssueReason {
    NoIdentifier,
    MultipleIdentifiers(Vec<String>),
    NoReferences,
    Failed(String),
}

impl fmt::Display for IssueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueReason::NoIdentifier => write!(f, "no Bate numbers"),
            IssueReason::MultipleIdentifiers(found) => {
                write!(f, "multiple Bate numbers: {}", found.join(", "))
            }
            IssueReason::NoReferences => write!(f, "no Repair Order numbers"),
            IssueReason::Failed(msg) => write!(f, "processing failed: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PageIssue {
    pub page_number: PageNumber,
    pub reason: IssueReason,
}

impl fmt::Display for PageIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page {} has {}", self.page_number, self.reason)
    }
}

/// Pages that failed association, for manual review
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IssueList {
    issues: BTreeMap<PageNumber, IssueReason>,
}

impl IssueList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue; a page is listed once, the latest reason wins
    pub fn record(&mut self, issue: PageIssue) {
        self.issues.insert(issue.page_number, issue.reason);
    }

    pub fn contains(&self, page_number: PageNumber) -> bool {
        self.issues.contains_key(&page_number)
    }

    pub fn reason(&self, page_number: PageNumber) -> Option<&IssueReason> {
        self.issues.get(&page_number)
    }

    /// Sorted page numbers
    pub fn page_numbers(&self) -> Vec<PageNumber> {
        self.issues.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = PageIssue> + '_ {
        self.issues.iter().map(|(page, reason)| PageIssue {
            page_number: *page,
            reason: reason.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Outcome of one association run
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Association {
    pub record: PageRecord,
    pub issues: IssueList,
}

/// One line of the exported index
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Row {
    pub page_number: PageNumber,
    pub bate_number: String,
    /// Empty when the Bates number had no repair order numbers
    pub repair_order_number: String,
}

impl Row {
    pub const NO_REFERENCE: &'static str = "";

    pub fn has_reference(&self) -> bool {
        !self.repair_order_number.is_empty()
    }
}

/// Whether a page with a Bates number but no repair order numbers is an issue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// Zero repair orders puts the page on the issue list
    #[default]
    Strict,
    /// Zero repair orders keeps the page with an empty reference list
    Lenient,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    #[default]
    Xlsx,
}

impl ExportFormat {
    /// `"CSV"` (any case, surrounding whitespace ignored) selects CSV;
    /// everything else falls back to the spreadsheet format.
    pub fn from_selector(selector: &str) -> Self {
        if selector.trim().eq_ignore_ascii_case("csv") {
            ExportFormat::Csv
        } else {
            ExportFormat::Xlsx
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "CSV"),
            ExportFormat::Xlsx => write!(f, "XLSX"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_text_numbers_from_one() {
        let pages = PageText::new(vec!["a".to_string(), "b".to_string()]);
        let numbered: Vec<_> = pages.iter().collect();
        assert_eq!(numbered, vec![(1, "a"), (2, "b")]);
    }

    #[test]
    fn test_page_record_iterates_in_page_order() {
        let mut record = PageRecord::new();
        record.insert(3, PageEntry::new("AARON00000003", vec![]));
        record.insert(1, PageEntry::new("AARON00000001", vec![]));
        record.insert(2, PageEntry::new("AARON00000002", vec![]));

        let pages: Vec<_> = record.iter().map(|(page, _)| page).collect();
        assert_eq!(pages, vec![1, 2, 3]);
    }

    #[test]
    fn test_issue_list_sorted_and_unique() {
        let mut issues = IssueList::new();
        for page in [7, 2, 7, 4] {
            issues.record(PageIssue {
                page_number: page,
                reason: IssueReason::NoIdentifier,
            });
        }
        assert_eq!(issues.page_numbers(), vec![2, 4, 7]);
        assert_eq!(issues.len(), 3);
    }

    #[test]
    fn test_issue_display() {
        let issue = PageIssue {
            page_number: 4,
            reason: IssueReason::MultipleIdentifiers(vec![
                "AARON00000001".to_string(),
                "AARON00000002".to_string(),
            ]),
        };
        assert_eq!(
            issue.to_string(),
            "Page 4 has multiple Bate numbers: AARON00000001, AARON00000002"
        );
    }

    #[test]
    fn test_export_format_selector() {
        assert_eq!(ExportFormat::from_selector("CSV"), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_selector(" csv "), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_selector("Excel"), ExportFormat::Xlsx);
        assert_eq!(ExportFormat::from_selector(""), ExportFormat::Xlsx);
    }

    #[test]
    fn test_reference_policy_serde() {
        let policy: ReferencePolicy = serde_json::from_str("\"lenient\"").unwrap();
        assert_eq!(policy, ReferencePolicy::Lenient);
        assert_eq!(ReferencePolicy::default(), ReferencePolicy::Strict);
    }
}
