//! Canonical domain types
//!
//! Wire-compatible records exchanged with the chat backend. These are the
//! single definitions used by the store, the chat surface and the HTTP client.

use serde::{Deserialize, Serialize};

/// Server-assigned session identifier (opaque)
pub type SessionId = String;

/// Server-assigned document index identifier (opaque)
pub type IndexId = String;

/// One row of the session list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub title: String,
    #[serde(default)]
    pub message_count: u64,
}

impl SessionSummary {
    pub fn new(id: impl Into<String>, title: impl Into<String>, message_count: u64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            message_count,
        }
    }
}

/// Who authored a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Full session record, fetched after a session becomes active
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDetail {
    pub id: SessionId,
    pub title: String,
    #[serde(default)]
    pub message_count: u64,
    /// Document index this session is scoped to, if any
    #[serde(default)]
    pub index_id: Option<IndexId>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// A server-side document corpus offered by the index picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSummary {
    pub id: IndexId,
    pub name: String,
    #[serde(default)]
    pub document_count: u64,
}

/// Result of a completed indexing run: the session created for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexingResult {
    pub session: SessionSummary,
    pub index_id: IndexId,
}
