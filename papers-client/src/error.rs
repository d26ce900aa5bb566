use thiserror::Error;

/// Error types for PubMed paper-filtering operations
#[derive(Error, Debug)]
pub enum Error {
    /// Query was empty or otherwise unusable, detected before any network call
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned a non-success status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A single record could not be parsed (recovered: record is skipped)
    #[error("Failed to parse record: {message}")]
    Parse { message: String },

    /// Invalid PMID format
    #[error("Invalid PMID format: {pmid}")]
    InvalidPmid { pmid: String },

    /// Configuration could not be loaded (e.g. indicator list file)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Results could not be written to the requested destination
    #[error("Output error: {message}")]
    Output { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
