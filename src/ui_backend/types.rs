//! UI Data Types
//!
//! Plain snapshots handed to renderers. Built by `AppService::view()`; a
//! renderer never reaches into the owning components.

use crate::core::mode::Mode;
use crate::core::types::{ChatMessage, IndexId, IndexSummary, SessionId};

use super::session_panel::{PanelFooter, PanelRow};
use super::state::{ErrorNotification, HealthStatus};

/// Everything on screen for one frame
#[derive(Debug, Clone)]
pub struct AppView {
    pub mode: Mode,
    pub health: HealthStatus,
    pub notification: Option<ErrorNotification>,
    /// `None` when the sidebar is hidden
    pub sidebar: Option<SidebarView>,
    /// `None` outside chat modes
    pub chat: Option<ChatView>,
    pub composer: ComposerView,
    pub index_modal: Option<IndexModalView>,
    /// Index list when the picker is showing (as a mode or as an overlay)
    pub index_picker: Option<Vec<IndexSummary>>,
    pub index_info: Option<IndexInfoView>,
}

#[derive(Debug, Clone, Default)]
pub struct SidebarView {
    pub rows: Vec<PanelRow>,
    pub footer: Option<PanelFooter>,
    /// Inline load error with a retry affordance
    pub error: Option<String>,
    pub loading: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ChatView {
    pub session_id: Option<SessionId>,
    pub title: Option<String>,
    pub transcript: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Default)]
pub struct ComposerView {
    pub text: String,
    /// "name (size)" per attachment, in order
    pub attachments: Vec<String>,
    pub placeholder: &'static str,
    pub can_submit: bool,
    pub in_flight: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, Default)]
pub struct IndexModalView {
    pub in_progress: bool,
}

#[derive(Debug, Clone, Default)]
pub struct IndexInfoView {
    pub session_id: SessionId,
    pub index_id: Option<IndexId>,
    /// Resolved from the index catalog when known
    pub index_name: Option<String>,
}
