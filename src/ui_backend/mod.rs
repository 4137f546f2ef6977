//! UI Backend - Backend-for-Frontend (BFF) Layer
//!
//! Separates orchestration from rendering so the terminal shell and the tests
//! drive the exact same logic.
//!
//! ## Architecture
//!
//! - **AppService**: mode transitions, session lifecycle, message sending
//! - **SessionStore**: client-side cache of the server's session list
//! - **SessionPanel** / **RefreshSlot**: the list view and its refresh handle
//! - **ChatSurface**: active session and transcript, with the stale-response guard
//! - **AppEvent**: completions of spawned backend calls
//! - **UiRenderer**: trait that frontends implement
//! - **SharedState**: health, notifications, index catalog
//! - **Command**: user actions mapped from key bindings and slash commands

mod chat_surface;
mod commands;
pub mod errors;
mod events;
mod service;
mod session_panel;
mod session_store;
mod state;
mod traits;
mod types;

pub use chat_surface::{ActiveSession, ChatSurface};
pub use commands::{is_slash_command, key_to_command, parse_slash_command, Command, ParseCommandError};
pub use errors::{Operation, SendError, StoreError};
pub use events::AppEvent;
pub use service::AppService;
pub use session_panel::{
    truncate_title, PanelFooter, PanelRow, RefreshHandle, RefreshSlot, SessionPanel,
};
pub use session_store::{DeleteOutcome, SessionStore, StoreEvent};
pub use state::{ErrorLevel, ErrorNotification, HealthStatus, SharedState};
pub use traits::UiRenderer;
pub use types::{AppView, ChatView, ComposerView, IndexInfoView, IndexModalView, SidebarView};
