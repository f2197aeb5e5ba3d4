//! Error types for the FetchFox client.

use thiserror::Error;

/// Result type for FetchFox client operations.
pub type Result<T> = std::result::Result<T, FetchFoxError>;

/// FetchFox client errors.
#[derive(Debug, Error)]
pub enum FetchFoxError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, request timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A create or run response came back without its identifier
    #[error("Response did not include a {0}")]
    MissingId(&'static str),

    /// The job was not done before the poll budget ran out
    #[error("Job {job_id} not done after {attempts} status checks")]
    Timeout { job_id: String, attempts: u32 },

    /// Waiting was cancelled by the caller
    #[error("Waiting for job {job_id} was cancelled")]
    Cancelled { job_id: String },
}

impl FetchFoxError {
    /// True when the response body could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, FetchFoxError::Parse(_))
    }
}

impl From<reqwest::Error> for FetchFoxError {
    fn from(err: reqwest::Error) -> Self {
        FetchFoxError::Network(err.to_string())
    }
}
