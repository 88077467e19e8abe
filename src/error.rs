//! Error types for status fetching and terminal setup.

use thiserror::Error;

/// Errors that can occur while fetching one status snapshot.
///
/// These are recoverable: the scheduler logs them and skips the tick.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (connection refused, DNS, timeout).
    #[error("request to status page failed: {0}")]
    Network(String),

    /// The status page answered with a non-success HTTP status.
    #[error("status page returned HTTP {0}")]
    Status(u16),

    /// The response body was not a valid status document.
    #[error("failed to decode status document: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// The terminal backend could not be brought up. Fatal.
#[derive(Debug, Error)]
pub enum RenderInitError {
    #[error("failed to switch terminal into raw mode: {0}")]
    RawMode(#[source] std::io::Error),

    #[error("failed to enter alternate screen: {0}")]
    AlternateScreen(#[source] std::io::Error),

    #[error("failed to create terminal: {0}")]
    Terminal(#[source] std::io::Error),
}
