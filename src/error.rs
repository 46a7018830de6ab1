use thiserror::Error;

#[derive(Error, Debug)]
pub enum PassbookError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Unknown statement scope: {0}")]
    InvalidScope(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, PassbookError>;
