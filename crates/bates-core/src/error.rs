use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatesError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid pattern configuration: {0}")]
    InvalidPattern(String),

    #[error("No repair order numbers found in text")]
    NoReferenceNumbers,

    #[error("No Bate number found in filename: {0}")]
    NoIdentifierInFilename(String),
}

impl From<regex::Error> for BatesError {
    fn from(err: regex::Error) -> Self {
        BatesError::InvalidPattern(err.to_string())
    }
}
