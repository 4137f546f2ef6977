//! Chat backend collaborator
//!
//! The orchestration layer only talks to the assistant server through
//! [`ChatBackend`]. [`HttpBackend`] is the production implementation; tests
//! substitute in-memory doubles.

mod error;
pub mod http;

use async_trait::async_trait;

use crate::core::attachments::AttachedFile;
use crate::core::types::{IndexSummary, IndexingResult, SessionDetail, SessionSummary};

pub use error::BackendError;
pub use http::HttpBackend;

pub type BackendResult<T> = Result<T, BackendError>;

/// Operations the assistant server offers
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Liveness probe
    async fn check_health(&self) -> BackendResult<()>;

    /// All sessions, in server order
    async fn get_sessions(&self) -> BackendResult<Vec<SessionSummary>>;

    async fn create_session(&self) -> BackendResult<SessionSummary>;

    /// Full record of one session, transcript included
    async fn get_session(&self, session_id: &str) -> BackendResult<SessionDetail>;

    /// Rename and return the canonical summary
    async fn rename_session(&self, session_id: &str, title: &str) -> BackendResult<SessionSummary>;

    async fn delete_session(&self, session_id: &str) -> BackendResult<()>;

    /// Scope a session to a document index
    async fn link_index_to_session(&self, session_id: &str, index_id: &str) -> BackendResult<()>;

    /// Send a user message with attachments, returning the assistant reply
    async fn send_message(
        &self,
        session_id: &str,
        text: &str,
        attachments: &[AttachedFile],
    ) -> BackendResult<String>;

    /// Document indexes available to the picker
    async fn list_indexes(&self) -> BackendResult<Vec<IndexSummary>>;

    /// Upload documents into a new index; the server creates a session for it
    async fn index_documents(
        &self,
        name: &str,
        files: &[AttachedFile],
    ) -> BackendResult<IndexingResult>;
}
