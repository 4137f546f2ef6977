//! Typed errors for BFF services
//!
//! Each service has its own error type. All of them render to an inline,
//! user-facing message; none of them is allowed to escape to the renderer.

use thiserror::Error;

use crate::backend::BackendError;
use crate::core::errors::ValidationError;

/// What the store was doing when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadSessions,
    CreateSession,
    RenameSession,
    DeleteSession,
    LinkIndex,
    LoadIndexes,
    LoadSession,
    IndexDocuments,
}

impl Operation {
    fn failure_message(self) -> &'static str {
        match self {
            Operation::LoadSessions => "Couldn't load conversations",
            Operation::CreateSession => "Couldn't start a new conversation",
            Operation::RenameSession => "Couldn't rename the conversation",
            Operation::DeleteSession => "Couldn't delete the conversation",
            Operation::LinkIndex => "Couldn't attach the index to the conversation",
            Operation::LoadIndexes => "Couldn't load document indexes",
            Operation::LoadSession => "Couldn't open the conversation",
            Operation::IndexDocuments => "Couldn't index the documents",
        }
    }
}

/// Errors from SessionStore
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Backend unreachable or failing
    #[error("{operation:?} failed: {source}")]
    Fetch {
        operation: Operation,
        #[source]
        source: BackendError,
    },

    /// Rejected locally, no request was made
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The session is not (or no longer) in the list
    #[error("Session no longer exists: {id}")]
    Conflict { id: String },
}

impl StoreError {
    /// Wrap a backend failure; "not found" on a known id becomes a conflict
    pub fn from_backend(operation: Operation, id: Option<&str>, source: BackendError) -> Self {
        match (id, &source) {
            (Some(id), BackendError::NotFound(_)) => StoreError::Conflict { id: id.to_string() },
            _ => StoreError::Fetch { operation, source },
        }
    }

    /// Helper for `map_err` on calls that do not address a session
    pub fn fetch(operation: Operation) -> impl FnOnce(BackendError) -> StoreError {
        move |source| StoreError::Fetch { operation, source }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }

    /// Inline message for the control that triggered the operation
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Fetch { operation, .. } => operation.failure_message().to_string(),
            StoreError::Validation(e) => e.user_message(),
            StoreError::Conflict { .. } => {
                "This conversation no longer exists. Refresh the list.".to_string()
            }
        }
    }
}

/// Errors from the message send pipeline
#[derive(Debug, Clone, Error)]
pub enum SendError {
    /// Quick chat could not create its session
    #[error("Failed to create session: {0}")]
    CreateSession(BackendError),

    #[error("Failed to send message: {0}")]
    Backend(#[from] BackendError),
}

impl SendError {
    pub fn user_message(&self) -> String {
        match self {
            SendError::CreateSession(_) => {
                "Couldn't start the conversation. Your message was kept.".to_string()
            }
            SendError::Backend(e) if e.is_unreachable() => {
                "The server is unavailable. Your message was kept.".to_string()
            }
            SendError::Backend(_) => "Couldn't send the message. Your message was kept.".to_string(),
        }
    }
}
