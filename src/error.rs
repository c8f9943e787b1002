use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Unknown country code: {0}")]
    LookupError(String),

    #[error("Browser error: {0}")]
    BrowserError(String),

    #[error("Download failed: {0}")]
    DownloadError(String),

    #[error("Cannot derive a file name from URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl ScraperError {
    /// Whether retrying the same download could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ScraperError::DownloadError(_) | ScraperError::RequestError(_) | ScraperError::IoError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
