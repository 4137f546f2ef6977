//! Domain error types
//!
//! Local validation failures, raised before anything reaches the backend.

use thiserror::Error;

/// Input rejected locally, without a network call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Rename with an empty or whitespace-only title
    #[error("Title cannot be empty")]
    EmptyTitle,

    /// Rename to the title the session already has
    #[error("Title is unchanged")]
    UnchangedTitle,
}

impl ValidationError {
    /// Inline message for the control that triggered the validation
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::EmptyTitle => "Enter a title for the conversation".to_string(),
            ValidationError::UnchangedTitle => "The conversation already has that title".to_string(),
        }
    }
}
