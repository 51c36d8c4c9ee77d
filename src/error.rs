//! Error taxonomy for the extraction pipelines

/// Result type for pipeline stages
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Failures a pipeline stage can report.
///
/// None of these cross a public operation boundary: the adapters in
/// [`crate::sources`] log them and return the operation's empty result.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed payload: {0}")]
    Payload(String),

    #[error("Missing element: {0}")]
    MissingElement(String),

    #[error("No recognizable pattern: {0}")]
    MissingPattern(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),
}

impl ScrapeError {
    pub fn missing(what: impl Into<String>) -> Self {
        Self::MissingElement(what.into())
    }

    pub fn pattern(what: impl Into<String>) -> Self {
        Self::MissingPattern(what.into())
    }
}
