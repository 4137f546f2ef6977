//! Session Store - client-side cache of the server's session list
//!
//! The server is the source of truth. The local list only changes after the
//! server confirms an operation, or wholesale on refresh. The store never
//! touches the mode or the active session; it reports what happened and lets
//! the caller decide.

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use crate::backend::ChatBackend;
use crate::core::errors::ValidationError;
use crate::core::types::{IndexId, SessionId, SessionSummary};

use super::errors::{Operation, StoreError};

/// Notifications for store subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The list was replaced by a fresh fetch
    Refreshed { count: usize },
    /// A session became active
    Selected { id: SessionId },
    Renamed { summary: SessionSummary },
    Deleted { id: SessionId },
}

/// Result of a confirmed delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// The deleted id was the caller's active session
    pub was_active: bool,
}

/// Session list cache shared by the panel, the chat surface and the service
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn ChatBackend>,
    sessions: Arc<RwLock<Vec<SessionSummary>>>,
    events: broadcast::Sender<StoreEvent>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            backend,
            sessions: Arc::new(RwLock::new(Vec::new())),
            events,
        }
    }

    /// Receive store notifications from now on
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Current snapshot, no network call
    pub async fn sessions(&self) -> Vec<SessionSummary> {
        self.sessions.read().await.clone()
    }

    pub async fn find(&self, id: &str) -> Option<SessionSummary> {
        self.sessions.read().await.iter().find(|s| s.id == id).cloned()
    }

    /// Fetch the list from the server and replace the local copy
    ///
    /// On failure the previous list is kept.
    pub async fn list(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let fetched = self.backend.get_sessions().await.map_err(|e| {
            tracing::warn!("Failed to load sessions: {}", e);
            StoreError::fetch(Operation::LoadSessions)(e)
        })?;

        let count = fetched.len();
        *self.sessions.write().await = fetched.clone();
        tracing::debug!("Session list refreshed ({} sessions)", count);
        self.notify(StoreEvent::Refreshed { count });
        Ok(fetched)
    }

    /// Authoritative resync
    pub async fn refresh(&self) -> Result<(), StoreError> {
        self.list().await.map(|_| ())
    }

    /// Create a session on the server
    ///
    /// The new session shows up in the list on the next refresh.
    pub async fn create(&self) -> Result<SessionId, StoreError> {
        let summary = self.backend.create_session().await.map_err(|e| {
            tracing::warn!("Failed to create session: {}", e);
            StoreError::fetch(Operation::CreateSession)(e)
        })?;
        tracing::info!("Created session {}", summary.id);
        Ok(summary.id)
    }

    /// Scope a session to a document index
    pub async fn link_index(&self, id: &str, index_id: &IndexId) -> Result<(), StoreError> {
        self.backend
            .link_index_to_session(id, index_id)
            .await
            .map_err(|e| {
                tracing::warn!("Failed to link index {} to session {}: {}", index_id, id, e);
                StoreError::from_backend(Operation::LinkIndex, Some(id), e)
            })
    }

    /// Announce that `id` is now the active session
    pub fn select(&self, id: &str) {
        tracing::debug!("Session {} selected", id);
        self.notify(StoreEvent::Selected { id: id.to_string() });
    }

    /// Rename a session
    ///
    /// Empty and unchanged titles are rejected without a network call. On
    /// success the summary is replaced with the server's canonical one.
    pub async fn rename(&self, id: &str, new_title: &str) -> Result<SessionSummary, StoreError> {
        let title = new_title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }

        let current = self.find(id).await.ok_or_else(|| StoreError::Conflict {
            id: id.to_string(),
        })?;
        if current.title == title {
            return Err(ValidationError::UnchangedTitle.into());
        }

        let renamed = self.backend.rename_session(id, title).await.map_err(|e| {
            tracing::warn!("Failed to rename session {}: {}", id, e);
            StoreError::from_backend(Operation::RenameSession, Some(id), e)
        })?;

        {
            let mut sessions = self.sessions.write().await;
            match sessions.iter_mut().find(|s| s.id == id) {
                Some(slot) => *slot = renamed.clone(),
                None => tracing::debug!("Session {} left the list before rename confirmed", id),
            }
        }

        tracing::info!("Renamed session {} to {:?}", id, renamed.title);
        self.notify(StoreEvent::Renamed {
            summary: renamed.clone(),
        });
        Ok(renamed)
    }

    /// Delete a session, removing it locally once the server confirms
    ///
    /// `active` is the caller's active session id, used only to fill in the
    /// outcome.
    pub async fn delete(&self, id: &str, active: Option<&str>) -> Result<DeleteOutcome, StoreError> {
        if self.find(id).await.is_none() {
            return Err(StoreError::Conflict { id: id.to_string() });
        }

        self.backend.delete_session(id).await.map_err(|e| {
            tracing::warn!("Failed to delete session {}: {}", id, e);
            StoreError::from_backend(Operation::DeleteSession, Some(id), e)
        })?;

        self.sessions.write().await.retain(|s| s.id != id);

        tracing::info!("Deleted session {}", id);
        self.notify(StoreEvent::Deleted { id: id.to_string() });
        Ok(DeleteOutcome {
            was_active: active == Some(id),
        })
    }

    fn notify(&self, event: StoreEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }
}
