//! Core error types for the Stock Hero API.
//!
//! Upstream failures are folded into a handful of variants. Callers decide
//! whether an error degrades to a fallback or surfaces to the client.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for upstream plumbing.
#[derive(Error, Debug)]
pub enum Error {
    /// The upstream answered with a non-success status code.
    #[error("{upstream} returned HTTP {status}")]
    UpstreamStatus { upstream: String, status: u16 },

    /// The request never produced a response (DNS, TLS, timeout, reset).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The upstream body could not be decoded into the expected shape.
    #[error("Failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    /// Only absolute http(s) URLs are fetched on a caller's behalf.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Expected an image, got {0}")]
    NotAnImage(String),

    #[error("{upstream} body exceeds {limit} bytes")]
    BodyTooLarge { upstream: String, limit: usize },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    pub fn parse(what: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            what: what.into(),
            message: message.to_string(),
        }
    }

    /// Whether the upstream explicitly refused the request with this status.
    pub fn is_status(&self, code: u16) -> bool {
        matches!(self, Self::UpstreamStatus { status, .. } if *status == code)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::parse("json", err)
    }
}
