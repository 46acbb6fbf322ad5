use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV export failed: {0}")]
    Csv(String),

    #[error("Spreadsheet export failed: {0}")]
    Spreadsheet(String),
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err.to_string())
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        ExportError::Spreadsheet(err.to_string())
    }
}

impl From<quick_xml::Error> for ExportError {
    fn from(err: quick_xml::Error) -> Self {
        ExportError::Spreadsheet(err.to_string())
    }
}
