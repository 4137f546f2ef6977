//! Core domain modules
//!
//! Framework-free state shared by the orchestration layer: the view state
//! machine, the composer with its attachment validator, domain types and
//! local validation errors.

pub mod attachments;
pub mod composer;
pub mod errors;
pub mod mode;
pub mod types;

pub use attachments::{AttachedFile, AttachmentValidator, RawFile};
pub use composer::{Composer, DraftMessage, KeyOutcome, Submission};
pub use errors::ValidationError;
pub use mode::{Effect, Mode, ModeController, Overlay, Transition, Trigger};
pub use types::{
    ChatMessage, IndexId, IndexSummary, IndexingResult, MessageRole, SessionDetail, SessionId,
    SessionSummary,
};
