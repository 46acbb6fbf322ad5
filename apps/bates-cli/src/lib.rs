//! Bates index runs
//!
//! File handling around the extraction pipeline: read the input, run one of
//! the two association pipelines, export, and write the results to disk.

use anyhow::Context;
use bates_core::BatesExtractor;
use bates_export::{export_rows, Export};
use shared_pdf::{split_raw_pages, PageTextSource, PdfTextLayer};
use shared_types::{Association, ExportFormat, IssueList};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    pub format: ExportFormat,
    /// Export path; derived from the input path when absent
    pub output: Option<PathBuf>,
    /// Optional JSON dump of the index rows
    pub rows_json: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output: PathBuf,
    pub rows: usize,
    pub indexed_pages: usize,
    pub issues: IssueList,
}

/// Structured pipeline over a PDF text layer or form-feed separated text.
///
/// Plain text is split before decoding so one badly encoded page is reported
/// on its own instead of failing the whole file.
pub fn run_pages(
    extractor: &BatesExtractor,
    input: &Path,
    options: &OutputOptions,
) -> anyhow::Result<RunSummary> {
    let data = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let association = if PdfTextLayer.can_handle(&data) {
        let report = shared_pdf::extract_page_texts(&data)
            .with_context(|| format!("Failed to extract page text from {}", input.display()))?;
        tracing::info!(
            input = %input.display(),
            total_pages = report.total_pages,
            text_pages = report.text_pages(),
            "Processing paginated document"
        );
        extractor.process_pages(&report.pages)
    } else {
        let raw = split_raw_pages(&data);
        tracing::info!(
            input = %input.display(),
            total_pages = raw.total_pages,
            text_pages = raw.pages.len(),
            "Processing form-feed separated text"
        );
        extractor.process_raw_pages(&raw.pages)
    };

    finish(extractor, input, association, options)
}

/// Flat-text pipeline; the Bates number comes from `filename` or the input's name
pub fn run_text(
    extractor: &BatesExtractor,
    input: &Path,
    filename: Option<&str>,
    options: &OutputOptions,
) -> anyhow::Result<RunSummary> {
    let name = match filename {
        Some(name) => name.to_string(),
        None => input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("Input path has no file name: {}", input.display()))?,
    };

    let data = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let association = extractor
        .process_flat_bytes(&data, &name)
        .with_context(|| format!("Failed to index {}", input.display()))?;

    finish(extractor, input, association, options)
}

fn finish(
    extractor: &BatesExtractor,
    input: &Path,
    association: Association,
    options: &OutputOptions,
) -> anyhow::Result<RunSummary> {
    let rows = extractor.rows(&association);
    let export = export_rows(rows, options.format).context("Failed to export index")?;

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(input, &export));
    fs::write(&output, &export.bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if let Some(path) = &options.rows_json {
        let json = serde_json::to_vec_pretty(&export.rows).context("Failed to serialize rows")?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(RunSummary {
        output,
        rows: export.rows.len(),
        indexed_pages: association.record.len(),
        issues: association.issues,
    })
}

/// `<input stem>_index.<ext>` next to the input
pub fn default_output_path(input: &Path, export: &Export) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    input.with_file_name(export.file_name(&stem))
}

/// Human-readable list of pages needing manual review
pub fn issue_report(issues: &IssueList) -> String {
    let pages: Vec<String> = issues.page_numbers().iter().map(|p| p.to_string()).collect();
    let mut report = format!("Pages with issues: {}\n", pages.join(", "));
    for issue in issues.iter() {
        let _ = writeln!(report, "  {}", issue);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{IssueReason, Row};
    use tempfile::TempDir;

    fn csv_options() -> OutputOptions {
        OutputOptions {
            format: ExportFormat::Csv,
            ..OutputOptions::default()
        }
    }

    #[test]
    fn test_run_pages_writes_csv_next_to_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("production.txt");
        fs::write(
            &input,
            "AARON00012345 RO 54321 65432\x0Cno stamp here\x0CAARON00012347 RO 77777",
        )
        .unwrap();

        let summary = run_pages(&BatesExtractor::new(), &input, &csv_options()).unwrap();

        assert_eq!(summary.output, dir.path().join("production_index.csv"));
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.indexed_pages, 2);
        assert_eq!(summary.issues.page_numbers(), vec![2]);

        let csv = fs::read_to_string(&summary.output).unwrap();
        assert_eq!(
            csv,
            "Bate Number,Repair Order Number,Page Number\n\
             AARON00012345,54321,1\n\
             AARON00012345,65432,1\n\
             AARON00012347,77777,3\n"
        );
    }

    #[test]
    fn test_run_pages_isolates_badly_encoded_page() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("scanned.txt");
        let mut data = b"AARON00012345 RO 54321\x0C".to_vec();
        data.extend_from_slice(&[b'A', b'A', 0xff, 0xfe]);
        data.extend_from_slice(b"\x0CAARON00012347 RO 77777");
        fs::write(&input, data).unwrap();

        let summary = run_pages(&BatesExtractor::new(), &input, &csv_options()).unwrap();

        assert_eq!(summary.indexed_pages, 2);
        assert_eq!(summary.issues.page_numbers(), vec![2]);
        assert!(matches!(
            summary.issues.reason(2),
            Some(IssueReason::Failed(_))
        ));

        let csv = fs::read_to_string(&summary.output).unwrap();
        assert!(csv.contains("AARON00012347,77777,3"));
    }

    #[test]
    fn test_run_text_uses_input_filename() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("AARON0001302.txt");
        fs::write(&input, "Work order FOW\nS12345 and FOW 23456").unwrap();

        let options = OutputOptions {
            format: ExportFormat::Csv,
            output: Some(dir.path().join("out.csv")),
            rows_json: Some(dir.path().join("rows.json")),
        };
        let summary = run_text(&BatesExtractor::new(), &input, None, &options).unwrap();

        assert_eq!(summary.rows, 2);
        assert!(summary.issues.is_empty());

        let rows: Vec<Row> =
            serde_json::from_slice(&fs::read(dir.path().join("rows.json")).unwrap()).unwrap();
        assert_eq!(rows[0].bate_number, "AARON0001302");
        assert_eq!(rows[0].repair_order_number, "12345");
        assert_eq!(rows[1].repair_order_number, "23456");
    }

    #[test]
    fn test_run_text_filename_override() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("export.txt");
        fs::write(&input, "FOW12345").unwrap();

        let summary = run_text(
            &BatesExtractor::new(),
            &input,
            Some("AARON0000042.txt"),
            &csv_options(),
        )
        .unwrap();

        let csv = fs::read_to_string(summary.output).unwrap();
        assert!(csv.contains("AARON0000042,12345,1"));
    }

    #[test]
    fn test_run_text_without_bates_fails() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("export.txt");
        fs::write(&input, "FOW12345").unwrap();

        let err = run_text(&BatesExtractor::new(), &input, None, &csv_options()).unwrap_err();
        assert!(format!("{:#}", err).contains("No Bate number found in filename"));
    }

    #[test]
    fn test_missing_input_fails() {
        let dir = TempDir::new().unwrap();
        let err = run_pages(
            &BatesExtractor::new(),
            &dir.path().join("missing.pdf"),
            &csv_options(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_issue_report_lists_sorted_pages() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("doc.txt");
        fs::write(&input, "nothing\x0CAARON00000002 AARON00000003\x0CAARON00000004").unwrap();

        let summary = run_pages(&BatesExtractor::new(), &input, &csv_options()).unwrap();

        assert_eq!(
            issue_report(&summary.issues),
            "Pages with issues: 1, 2, 3\n\
             \x20 Page 1 has no Bate numbers\n\
             \x20 Page 2 has multiple Bate numbers: AARON00000002, AARON00000003\n\
             \x20 Page 3 has no Repair Order numbers\n"
        );
    }
}
