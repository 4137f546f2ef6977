//! Chat surface - the active session and its visible transcript
//!
//! Responses arrive asynchronously and may belong to a session the user has
//! already left. Every update is checked against the active id first. Work
//! started before a session exists (a quick chat's first send) is checked
//! against the surface generation instead, which moves on every rebind.

use crate::core::types::{ChatMessage, SessionDetail, SessionId};

/// The session currently bound to the chat surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSession {
    /// `None` in a quick chat that has not sent anything yet
    pub session_id: Option<SessionId>,
    /// Full record, once fetched
    pub detail: Option<SessionDetail>,
}

#[derive(Debug, Default)]
pub struct ChatSurface {
    active: ActiveSession,
    transcript: Vec<ChatMessage>,
    generation: u64,
}

impl ChatSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &ActiveSession {
        &self.active
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.active.session_id.as_ref()
    }

    pub fn has_session(&self) -> bool {
        self.active.session_id.is_some()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.session_id.as_deref() == Some(id)
    }

    pub fn detail(&self) -> Option<&SessionDetail> {
        self.active.detail.as_ref()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Bumped by every `activate` that rebinds and by every `clear`
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Bind to `id`; returns false if it was already bound
    pub fn activate(&mut self, id: SessionId) -> bool {
        if self.is_active(&id) {
            return false;
        }
        tracing::debug!("Chat surface bound to session {}", id);
        self.active = ActiveSession {
            session_id: Some(id),
            detail: None,
        };
        self.transcript.clear();
        self.generation += 1;
        true
    }

    /// Apply a fetched detail if it is for the active session
    pub fn apply_detail(&mut self, detail: SessionDetail) -> bool {
        if !self.is_active(&detail.id) {
            tracing::debug!("Ignoring late detail for session {}", detail.id);
            return false;
        }
        self.transcript = detail.messages.clone();
        self.active.detail = Some(detail);
        true
    }

    /// Record a completed exchange if `session_id` is still active
    pub fn append_exchange(&mut self, session_id: &str, user: &str, reply: &str) -> bool {
        if !self.is_active(session_id) {
            tracing::debug!("Ignoring late reply for session {}", session_id);
            return false;
        }
        self.transcript.push(ChatMessage::user(user));
        self.transcript.push(ChatMessage::assistant(reply));
        true
    }

    pub fn clear(&mut self) {
        self.active = ActiveSession::default();
        self.transcript.clear();
        self.generation += 1;
    }
}
