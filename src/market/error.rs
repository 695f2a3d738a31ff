//! Fetch error types

use std::time::Duration;
use thiserror::Error;

/// Failure to obtain one page of market rows
///
/// All variants are transient: the screener keeps the previous snapshot and
/// the next scheduled cycle tries again.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Provider answered with a non-success status
    #[error("provider returned {status} for page {page}: {body}")]
    Status {
        page: u32,
        status: u16,
        body: String,
    },
    /// Request did not finish within the configured bound
    #[error("page {page} timed out after {after:?}")]
    Timeout { page: u32, after: Duration },
    /// Response body was not the expected shape
    #[error("malformed payload for page {page}: {reason}")]
    Malformed { page: u32, reason: String },
}

impl FetchError {
    /// Every fetch failure is recovered by the next cycle
    pub fn is_retryable(&self) -> bool {
        true
    }

    /// Page the failure belongs to, when known
    pub fn page(&self) -> Option<u32> {
        match self {
            FetchError::Status { page, .. }
            | FetchError::Timeout { page, .. }
            | FetchError::Malformed { page, .. } => Some(*page),
            FetchError::Http(_) => None,
        }
    }
}
