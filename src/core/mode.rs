//! Top-level view state machine
//!
//! Decides which primary view is showing (landing, indexing, index picker,
//! chat) and which side panels are visible on top of it. Transitions are a
//! pure function of the current mode and a trigger; a trigger that makes no
//! sense for the current mode yields no transition and leaves everything as is.

use super::types::{IndexId, SessionId};

/// Primary view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Landing menu
    #[default]
    Home,
    /// Indexing modal is open
    Indexing,
    /// Choosing an existing index to chat with
    PickingExistingIndex,
    /// Chatting in a session picked from the list or created for an index
    ChatExisting,
    /// Chat surface without an index; the session is created on first send
    QuickChat,
}

impl Mode {
    /// Whether the chat surface is the primary view
    pub fn is_chat(self) -> bool {
        matches!(self, Mode::ChatExisting | Mode::QuickChat)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Mode::Home => "Home",
            Mode::Indexing => "Indexing",
            Mode::PickingExistingIndex => "Pick index",
            Mode::ChatExisting => "Chat",
            Mode::QuickChat => "Quick chat",
        }
    }

    /// Compute the transition for a trigger, or `None` if it is not legal here
    pub fn on(self, trigger: &Trigger) -> Option<Transition> {
        use Effect::*;

        let (to, effects) = match (self, trigger) {
            (Mode::Home, Trigger::SelectIndexDocuments) => (Mode::Indexing, vec![OpenIndexModal]),
            (Mode::Home, Trigger::SelectChatWithIndex) => {
                (Mode::PickingExistingIndex, vec![OpenIndexPicker])
            }
            (Mode::Home, Trigger::SelectQuickChat) => (Mode::QuickChat, vec![ShowChatSurface]),

            (Mode::Indexing, Trigger::IndexingCompleted(session_id)) => (
                Mode::ChatExisting,
                vec![CloseIndexModal, ActivateSession(session_id.clone())],
            ),
            (Mode::Indexing, Trigger::Cancel) => (Mode::Home, vec![CloseIndexModal]),

            (Mode::PickingExistingIndex, Trigger::IndexChosen(index_id)) => (
                Mode::ChatExisting,
                vec![
                    CreateSessionForIndex(index_id.clone()),
                    CloseIndexPicker,
                    ActivateCreatedSession,
                ],
            ),
            (Mode::PickingExistingIndex, Trigger::Cancel) => (Mode::Home, vec![CloseIndexPicker]),

            (Mode::ChatExisting | Mode::QuickChat, Trigger::NewSession) => {
                (Mode::Home, vec![ClearActiveSession])
            }
            (Mode::ChatExisting | Mode::QuickChat, Trigger::PickSession(session_id)) => (
                Mode::ChatExisting,
                vec![ActivateSession(session_id.clone())],
            ),

            (mode, Trigger::ToggleSidebar) => (mode, vec![ToggleSidebar]),

            _ => return None,
        };

        Some(Transition {
            from: self,
            to,
            effects,
        })
    }
}

/// User or completion event that may move the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Landing: "index documents"
    SelectIndexDocuments,
    /// Landing: "chat with an existing index"
    SelectChatWithIndex,
    /// Landing: "quick chat"
    SelectQuickChat,
    /// Indexing finished and produced this session
    IndexingCompleted(SessionId),
    /// Index picker: an index was chosen
    IndexChosen(IndexId),
    /// Close the indexing modal or the index picker
    Cancel,
    /// Start over from the landing menu
    NewSession,
    /// A session was picked from the session list
    PickSession(SessionId),
    ToggleSidebar,
}

/// Side effect the orchestrator must carry out for a transition, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenIndexModal,
    CloseIndexModal,
    OpenIndexPicker,
    CloseIndexPicker,
    ShowChatSurface,
    ActivateSession(SessionId),
    /// Create a session and link it to the index; fallible
    CreateSessionForIndex(IndexId),
    /// Activate the session produced by `CreateSessionForIndex`
    ActivateCreatedSession,
    ClearActiveSession,
    ToggleSidebar,
}

/// A planned move of the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: Mode,
    pub to: Mode,
    pub effects: Vec<Effect>,
}

/// Panels layered over a chat mode, each closable on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// Details of the index the active session is scoped to
    IndexInfo,
    /// Index picker opened from chat to scope the active session
    IndexPicker,
}

/// Owner of the current [`Mode`] and of panel visibility
#[derive(Debug, Clone)]
pub struct ModeController {
    mode: Mode,
    sidebar_collapsed: bool,
    index_info_open: bool,
    index_picker_open: bool,
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ModeController {
    /// Start at Home; `sidebar_open` is the initial, not collapsed, preference
    pub fn new(sidebar_open: bool) -> Self {
        Self {
            mode: Mode::Home,
            sidebar_collapsed: !sidebar_open,
            index_info_open: false,
            index_picker_open: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Plan a transition without applying it
    pub fn plan(&self, trigger: &Trigger) -> Option<Transition> {
        self.mode.on(trigger)
    }

    /// Apply a planned transition
    ///
    /// A transition planned from a mode that is no longer current is stale and
    /// is dropped.
    pub fn commit(&mut self, transition: &Transition) -> bool {
        if transition.from != self.mode {
            tracing::debug!(
                "Dropping stale transition {:?} -> {:?} (now {:?})",
                transition.from,
                transition.to,
                self.mode
            );
            return false;
        }

        if transition.effects.contains(&Effect::ToggleSidebar) {
            self.sidebar_collapsed = !self.sidebar_collapsed;
        }
        if transition.to != self.mode {
            self.index_info_open = false;
            self.index_picker_open = false;
            tracing::debug!("Mode {:?} -> {:?}", self.mode, transition.to);
        }
        self.mode = transition.to;
        true
    }

    /// Plan and apply in one step; returns the applied transition
    pub fn dispatch(&mut self, trigger: &Trigger) -> Option<Transition> {
        let transition = self.plan(trigger)?;
        self.commit(&transition);
        Some(transition)
    }

    /// Sidebar shows in chat modes, with a session on screen, unless collapsed
    pub fn sidebar_visible(&self, has_active_session: bool) -> bool {
        self.mode.is_chat() && has_active_session && !self.sidebar_collapsed
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed
    }

    /// Open an overlay; no-op outside chat modes, and index info needs a session
    pub fn open_overlay(&mut self, overlay: Overlay, has_active_session: bool) -> bool {
        if !self.mode.is_chat() {
            return false;
        }
        match overlay {
            Overlay::IndexInfo if has_active_session => self.index_info_open = true,
            Overlay::IndexInfo => return false,
            Overlay::IndexPicker => self.index_picker_open = true,
        }
        true
    }

    /// Close an overlay without touching the mode
    pub fn close_overlay(&mut self, overlay: Overlay) {
        match overlay {
            Overlay::IndexInfo => self.index_info_open = false,
            Overlay::IndexPicker => self.index_picker_open = false,
        }
    }

    pub fn index_info_visible(&self, has_active_session: bool) -> bool {
        self.index_info_open && has_active_session
    }

    pub fn index_picker_overlay_visible(&self) -> bool {
        self.index_picker_open
    }

    /// Whether the index picker is on screen, as a mode or as an overlay
    pub fn index_picker_visible(&self) -> bool {
        self.mode == Mode::PickingExistingIndex || self.index_picker_open
    }

    pub fn index_modal_visible(&self) -> bool {
        self.mode == Mode::Indexing
    }
}
