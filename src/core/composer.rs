//! Message composer
//!
//! Owns the draft (text plus validated attachments) and the submit protocol:
//! the draft is cleared optimistically when a submission starts and put back
//! exactly as it was if the send fails. Only one submission can be in flight.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use uuid::Uuid;

use super::attachments::{AttachedFile, AttachmentValidator, RawFile};
use super::types::SessionId;

const DEFAULT_PLACEHOLDER: &str = "Type your message...";
const ATTACHMENTS_PLACEHOLDER: &str = "Ask questions about your attached files...";

/// Text and attachments being composed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftMessage {
    pub text: String,
    pub attachments: Vec<AttachedFile>,
}

impl DraftMessage {
    /// Nothing worth sending: blank text and no files
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty() && self.attachments.is_empty()
    }
}

/// A started send, carried to the backend and back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: u64,
    /// Target session; `None` when the session must be created first
    pub session_id: Option<SessionId>,
    /// Draft exactly as it was when the submission started
    pub snapshot: DraftMessage,
}

impl Submission {
    /// Text sent to the backend (surrounding whitespace removed)
    pub fn text(&self) -> &str {
        self.snapshot.text.trim()
    }

    pub fn attachments(&self) -> &[AttachedFile] {
        &self.snapshot.attachments
    }
}

/// What a key press did to the composer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Plain Enter: the caller should start a submission
    Submit,
    /// Draft changed
    Edited,
    /// Key not handled by the composer
    Ignored,
}

/// Owner of the [`DraftMessage`]
#[derive(Debug, Default)]
pub struct Composer {
    draft: DraftMessage,
    validator: AttachmentValidator,
    in_flight: Option<u64>,
    next_submission: u64,
    disabled: bool,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &DraftMessage {
        &self.draft
    }

    pub fn text(&self) -> &str {
        &self.draft.text
    }

    pub fn attachments(&self) -> &[AttachedFile] {
        &self.draft.attachments
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Externally disable or enable the composer (e.g. backend unreachable)
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Mirrors the send button: something to send and nothing blocking
    pub fn can_submit(&self) -> bool {
        !self.draft.is_blank() && !self.disabled && self.in_flight.is_none()
    }

    pub fn placeholder(&self) -> &'static str {
        if self.draft.attachments.is_empty() {
            DEFAULT_PLACEHOLDER
        } else {
            ATTACHMENTS_PLACEHOLDER
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
    }

    pub fn insert_char(&mut self, c: char) {
        self.draft.text.push(c);
    }

    pub fn insert_newline(&mut self) {
        self.draft.text.push('\n');
    }

    pub fn backspace(&mut self) {
        self.draft.text.pop();
    }

    /// Validate picked files and append the accepted ones
    ///
    /// Returns how many were accepted; the rest are dropped silently.
    pub fn attach(&mut self, raw_files: Vec<RawFile>) -> usize {
        let accepted = self.validator.validate(raw_files);
        let count = accepted.len();
        self.draft.attachments.extend(accepted);
        count
    }

    pub fn remove_attachment(&mut self, id: Uuid) -> Option<AttachedFile> {
        let pos = self.draft.attachments.iter().position(|a| a.id == id)?;
        Some(self.draft.attachments.remove(pos))
    }

    /// Start a submission: snapshot, clear the draft, mark in flight
    ///
    /// Returns `None` without touching anything when the draft is blank, a
    /// submission is already in flight, or the composer is disabled.
    pub fn begin_submit(&mut self, session_id: Option<SessionId>) -> Option<Submission> {
        if !self.can_submit() {
            return None;
        }

        self.next_submission += 1;
        let id = self.next_submission;
        self.in_flight = Some(id);

        Some(Submission {
            id,
            session_id,
            snapshot: std::mem::take(&mut self.draft),
        })
    }

    /// Finish the in-flight submission
    ///
    /// On failure the draft is overwritten with the snapshot; anything typed
    /// while the send was pending is discarded. Completions that do not match
    /// the in-flight submission are ignored.
    pub fn complete_submit<T, E>(&mut self, submission: Submission, result: &Result<T, E>) -> bool {
        if self.in_flight != Some(submission.id) {
            tracing::debug!("Ignoring completion for submission {}", submission.id);
            return false;
        }
        self.in_flight = None;

        if result.is_err() {
            self.draft = submission.snapshot;
        }
        true
    }

    /// Map a key press onto the draft
    ///
    /// Enter submits, Shift+Enter inserts a newline and never submits.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, KeyModifiers::NONE) => KeyOutcome::Submit,
            (KeyCode::Enter, m) if m.contains(KeyModifiers::SHIFT) => {
                self.insert_newline();
                KeyOutcome::Edited
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.insert_char(c);
                KeyOutcome::Edited
            }
            (KeyCode::Backspace, _) => {
                self.backspace();
                KeyOutcome::Edited
            }
            _ => KeyOutcome::Ignored,
        }
    }
}
