//! Tabular export of the Bates index
//!
//! Column order is fixed regardless of format:
//! `Bate Number, Repair Order Number, Page Number`.

pub mod delimited;
pub mod error;
pub mod spreadsheet;

pub use delimited::write_csv;
pub use error::ExportError;
pub use spreadsheet::{write_xlsx, SHEET_NAME};

use shared_types::{ExportFormat, Row};

pub const HEADERS: [&str; 3] = ["Bate Number", "Repair Order Number", "Page Number"];

/// Export payload together with the rows it was built from
#[derive(Debug, Clone)]
pub struct Export {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    pub rows: Vec<Row>,
}

impl Export {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Suggested download name, e.g. `AARON0001302_index.csv`
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}_index.{}", stem, self.format.extension())
    }
}

pub fn export_rows(rows: Vec<Row>, format: ExportFormat) -> Result<Export, ExportError> {
    let bytes = match format {
        ExportFormat::Csv => delimited::write_csv(&rows)?,
        ExportFormat::Xlsx => spreadsheet::write_xlsx(&rows)?,
    };

    tracing::info!(
        format = %format,
        rows = rows.len(),
        bytes = bytes.len(),
        "Index exported"
    );

    Ok(Export {
        format,
        bytes,
        rows,
    })
}

/// Export using a free-form selector; anything but `"CSV"` means spreadsheet
pub fn export_with_selector(rows: Vec<Row>, selector: &str) -> Result<Export, ExportError> {
    export_rows(rows, ExportFormat::from_selector(selector))
}
