//! Errors raised while talking to the issues endpoints.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
    /// DNS, connection, TLS or timeout failure. Never retried.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with something other than the expected status.
    /// The body is not read in this case.
    #[error("HTTP error: {0}")]
    Http(StatusCode),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GitHubError>;
