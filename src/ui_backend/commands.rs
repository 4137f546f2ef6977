//! User Commands
//!
//! Defines all possible user actions that can be triggered from the UI, and
//! the two ways a terminal produces them: key bindings and slash commands.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

use crate::core::types::{IndexId, SessionId};

/// User commands that can be executed
///
/// The AppService handles these commands and updates state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // ========== Application Control ==========
    Quit,

    /// Re-run the backend health probe
    CheckHealth,

    // ========== Landing ==========
    SelectIndexDocuments,
    SelectChatWithIndex,
    SelectQuickChat,

    /// Leave the indexing modal or the index picker, or close an overlay
    Cancel,

    // ========== Indexes ==========
    /// Upload documents into a new index (indexing modal)
    StartIndexing { name: String, paths: Vec<PathBuf> },

    /// Choose an index in the picker
    ChooseIndex(IndexId),

    /// Open the index picker over the chat to scope the active session
    OpenIndexPicker,

    ToggleIndexInfo,

    // ========== Sessions ==========
    NewSession,
    OpenSession(SessionId),
    RenameSession { id: SessionId, title: String },
    DeleteSession(SessionId),
    RefreshSessions,
    RetryLoadSessions,
    ToggleSidebar,

    // ========== Composer ==========
    /// Raw key for the composer (typing, Enter, Shift+Enter)
    Key(KeyEvent),
    SetDraft(String),
    Attach(Vec<PathBuf>),
    /// Remove the n-th attachment (1-based, as listed)
    Detach(usize),
    Submit,
}

/// Map a key event to a command
///
/// Application shortcuts are handled here; everything else goes to the
/// composer untouched.
pub fn key_to_command(key: KeyEvent) -> Command {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL)
        | (KeyCode::Char('q'), KeyModifiers::CONTROL) => Command::Quit,
        (KeyCode::Char('b'), KeyModifiers::CONTROL) => Command::ToggleSidebar,
        (KeyCode::Char('n'), KeyModifiers::CONTROL) => Command::NewSession,
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => Command::RefreshSessions,
        (KeyCode::Esc, _) => Command::Cancel,
        _ => Command::Key(key),
    }
}

/// Slash command parse failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("Unknown command: /{0}")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// Parse a `/command args...` line typed into the composer
pub fn parse_slash_command(line: &str) -> Result<Command, ParseCommandError> {
    let line = line.trim();
    let body = line.strip_prefix('/').unwrap_or(line);
    let mut parts = body.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let command = match name {
        "quit" | "exit" => Command::Quit,
        "health" => Command::CheckHealth,
        "quick" => Command::SelectQuickChat,
        "index" => Command::SelectIndexDocuments,
        "pick" => Command::SelectChatWithIndex,
        "cancel" => Command::Cancel,
        "new" => Command::NewSession,
        "sidebar" => Command::ToggleSidebar,
        "info" => Command::ToggleIndexInfo,
        "link" => Command::OpenIndexPicker,
        "sessions" => Command::RefreshSessions,
        "retry" => Command::RetryLoadSessions,
        "use" => match args.as_slice() {
            [index] => Command::ChooseIndex(index.to_string()),
            _ => return Err(ParseCommandError::Usage("/use <index-id>")),
        },
        "open" => match args.as_slice() {
            [id] => Command::OpenSession(id.to_string()),
            _ => return Err(ParseCommandError::Usage("/open <session-id>")),
        },
        "delete" => match args.as_slice() {
            [id] => Command::DeleteSession(id.to_string()),
            _ => return Err(ParseCommandError::Usage("/delete <session-id>")),
        },
        "rename" => match args.split_first() {
            Some((id, title)) if !title.is_empty() => Command::RenameSession {
                id: id.to_string(),
                title: title.join(" "),
            },
            _ => return Err(ParseCommandError::Usage("/rename <session-id> <title>")),
        },
        "upload" => match args.split_first() {
            Some((name, paths)) if !paths.is_empty() => Command::StartIndexing {
                name: name.to_string(),
                paths: paths.iter().map(PathBuf::from).collect(),
            },
            _ => return Err(ParseCommandError::Usage("/upload <name> <paths...>")),
        },
        "attach" if !args.is_empty() => Command::Attach(args.iter().map(PathBuf::from).collect()),
        "attach" => return Err(ParseCommandError::Usage("/attach <paths...>")),
        "detach" => match args.as_slice() {
            [n] => match n.parse::<usize>() {
                Ok(n) if n > 0 => Command::Detach(n),
                _ => return Err(ParseCommandError::Usage("/detach <number>")),
            },
            _ => return Err(ParseCommandError::Usage("/detach <number>")),
        },
        other => return Err(ParseCommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

/// Whether a composer line is a slash command rather than a message
pub fn is_slash_command(text: &str) -> bool {
    text.trim_start().starts_with('/')
}
