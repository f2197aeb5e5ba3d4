//! Typed errors for the scraping tools.
//!
//! Each error maps onto one [`ErrorKind`], which is what callers reading
//! the JSON error object branch on.

use fetchfox_client::FetchFoxError;
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Errors that end a scrape invocation.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Missing or invalid settings
    #[error("{0:#}")]
    Config(anyhow::Error),

    /// HTTP failure, missing identifiers, poll timeout or cancellation
    #[error(transparent)]
    Transport(FetchFoxError),

    /// A response body that was not the expected JSON
    #[error(transparent)]
    Decode(FetchFoxError),

    /// The job finished without any usable items
    #[error("{0}")]
    EmptyResult(&'static str),

    /// Results could not be written out
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Failures while emitting results.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Usage,
    Config,
    Transport,
    Decode,
    EmptyResult,
    Output,
}

impl ScrapeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScrapeError::Config(_) => ErrorKind::Config,
            ScrapeError::Transport(_) => ErrorKind::Transport,
            ScrapeError::Decode(_) => ErrorKind::Decode,
            ScrapeError::EmptyResult(_) => ErrorKind::EmptyResult,
            ScrapeError::Output(_) => ErrorKind::Output,
        }
    }
}

impl From<FetchFoxError> for ScrapeError {
    fn from(err: FetchFoxError) -> Self {
        if err.is_decode() {
            ScrapeError::Decode(err)
        } else {
            ScrapeError::Transport(err)
        }
    }
}

impl From<csv::Error> for ScrapeError {
    fn from(err: csv::Error) -> Self {
        ScrapeError::Output(err.into())
    }
}

impl From<serde_json::Error> for ScrapeError {
    fn from(err: serde_json::Error) -> Self {
        ScrapeError::Output(err.into())
    }
}

impl From<anyhow::Error> for ScrapeError {
    fn from(err: anyhow::Error) -> Self {
        ScrapeError::Config(err)
    }
}
