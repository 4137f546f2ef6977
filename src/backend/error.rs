//! Typed errors for backend calls
//!
//! Lets the store and the send pipeline tell "server unreachable" apart from
//! "session no longer exists" without string matching.

use thiserror::Error;

/// Backend call failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Connection refused, DNS failure, timeout
    #[error("Network error: {0}")]
    Network(String),

    /// The addressed resource does not exist (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("Backend error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// A local file could not be read for upload
    #[error("Cannot read {path}: {message}")]
    File { path: String, message: String },
}

impl BackendError {
    /// Whether the backend could not be reached at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, BackendError::Network(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound(_))
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            if status == reqwest::StatusCode::NOT_FOUND {
                BackendError::NotFound(err.to_string())
            } else {
                BackendError::Status {
                    status: status.as_u16(),
                    message: err.to_string(),
                }
            }
        } else {
            BackendError::Network(err.to_string())
        }
    }
}
