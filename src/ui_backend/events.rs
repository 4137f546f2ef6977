//! Application Events
//!
//! Completions of spawned backend calls, sent back to the AppService over an
//! mpsc channel and applied on the service's own task.

use crate::backend::BackendError;
use crate::core::composer::Submission;
use crate::core::mode::Transition;
use crate::core::types::{
    IndexId, IndexSummary, IndexingResult, SessionDetail, SessionId, SessionSummary,
};

use super::errors::{SendError, StoreError};
use super::session_store::DeleteOutcome;

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Health probe finished
    HealthChecked(Result<(), BackendError>),

    /// A message send finished
    SendFinished {
        submission: Submission,
        /// Chat surface generation when the send started
        generation: u64,
        /// Session created on the fly for a quick chat, if any
        created_session: Option<SessionId>,
        result: Result<String, SendError>,
    },

    /// Detail fetch for a session that was activated
    DetailLoaded {
        session_id: SessionId,
        result: Result<SessionDetail, BackendError>,
    },

    /// Document upload into a new index finished
    IndexingFinished(Result<IndexingResult, BackendError>),

    /// Index catalog fetched
    IndexesLoaded(Result<Vec<IndexSummary>, BackendError>),

    /// Session list resync through the refresh slot finished
    SessionsRefreshed {
        /// Asked for by the user rather than run after another operation
        requested: bool,
        /// `Ok(false)` when no panel was mounted
        result: Result<bool, StoreError>,
    },

    SessionRenamed {
        id: SessionId,
        result: Result<SessionSummary, StoreError>,
    },

    SessionDeleted {
        id: SessionId,
        result: Result<DeleteOutcome, StoreError>,
    },

    /// Session created and linked for an index chosen in the picker
    IndexSessionReady {
        request: u64,
        /// Planned when the index was chosen, committed on success
        transition: Transition,
        result: Result<SessionId, StoreError>,
    },

    /// Index linked to an already active session
    IndexLinked {
        session_id: SessionId,
        index_id: IndexId,
        result: Result<(), StoreError>,
    },
}
