pub mod types;

pub use types::{
    Association, ExportFormat, IssueList, IssueReason, PageEntry, PageIssue, PageNumber,
    PageRecord, PageText, ReferencePolicy, Row,
};
