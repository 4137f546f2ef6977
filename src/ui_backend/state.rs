//! Shared Application State
//!
//! Everything a renderer needs that does not belong to one of the owning
//! components: backend health, the latest notification, the index catalog
//! shown by the picker, and the quit flag.

use std::sync::{Arc, RwLock};

use crate::core::types::IndexSummary;

/// Backend reachability, probed once at startup and on request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HealthStatus {
    #[default]
    Checking,
    Connected,
    Error,
}

impl HealthStatus {
    pub fn label(self) -> &'static str {
        match self {
            HealthStatus::Checking => "Checking...",
            HealthStatus::Connected => "Connected",
            HealthStatus::Error => "Server unavailable",
        }
    }
}

/// Error notification level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    Info,
    Warning,
    Error,
}

/// Notification displayed to the user
#[derive(Debug, Clone)]
pub struct ErrorNotification {
    pub message: String,
    pub level: ErrorLevel,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

/// Shared application state (thread-safe)
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    inner: Arc<RwLock<StateInner>>,
}

#[derive(Debug, Default)]
struct StateInner {
    should_quit: bool,
    health: HealthStatus,
    notification: Option<ErrorNotification>,
    indexes: Vec<IndexSummary>,
    indexing_in_progress: bool,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Private Helpers ==========

    fn read_inner(&self) -> std::sync::RwLockReadGuard<'_, StateInner> {
        self.inner.read().unwrap_or_else(|poisoned| {
            tracing::warn!("SharedState read lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_inner(&self) -> std::sync::RwLockWriteGuard<'_, StateInner> {
        self.inner.write().unwrap_or_else(|poisoned| {
            tracing::warn!("SharedState write lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    // ========== Getters ==========

    pub fn should_quit(&self) -> bool {
        self.read_inner().should_quit
    }

    pub fn health(&self) -> HealthStatus {
        self.read_inner().health
    }

    pub fn notification(&self) -> Option<ErrorNotification> {
        self.read_inner().notification.clone()
    }

    pub fn indexes(&self) -> Vec<IndexSummary> {
        self.read_inner().indexes.clone()
    }

    pub fn indexing_in_progress(&self) -> bool {
        self.read_inner().indexing_in_progress
    }

    // ========== Setters ==========

    pub fn set_should_quit(&self, quit: bool) {
        self.write_inner().should_quit = quit;
    }

    pub fn set_health(&self, health: HealthStatus) {
        self.write_inner().health = health;
    }

    pub fn set_indexes(&self, indexes: Vec<IndexSummary>) {
        self.write_inner().indexes = indexes;
    }

    pub fn set_indexing_in_progress(&self, in_progress: bool) {
        self.write_inner().indexing_in_progress = in_progress;
    }

    pub fn notify(&self, level: ErrorLevel, message: impl Into<String>) {
        self.write_inner().notification = Some(ErrorNotification {
            message: message.into(),
            level,
            timestamp: chrono::Local::now(),
        });
    }

    pub fn notify_error(&self, message: impl Into<String>) {
        self.notify(ErrorLevel::Error, message);
    }

    pub fn notify_info(&self, message: impl Into<String>) {
        self.notify(ErrorLevel::Info, message);
    }

    pub fn clear_notification(&self) {
        self.write_inner().notification = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_starts_checking() {
        let state = SharedState::new();
        assert_eq!(state.health(), HealthStatus::Checking);
        state.set_health(HealthStatus::Error);
        assert_eq!(state.health().label(), "Server unavailable");
    }

    #[test]
    fn test_notifications_replace_each_other() {
        let state = SharedState::new();
        state.notify_error("first");
        state.notify_info("second");
        let n = state.notification().unwrap();
        assert_eq!(n.message, "second");
        assert_eq!(n.level, ErrorLevel::Info);
        state.clear_notification();
        assert!(state.notification().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let state = SharedState::new();
        let other = state.clone();
        other.set_should_quit(true);
        assert!(state.should_quit());
    }
}
