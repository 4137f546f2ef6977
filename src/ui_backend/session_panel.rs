//! Session list panel
//!
//! Renders the store's list and owns its loading/error affordances. On every
//! mount the panel registers a refresh handle into the parent's
//! [`RefreshSlot`], which is how siblings ask for a resync without holding a
//! reference to the panel itself.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::types::SessionId;

use super::errors::StoreError;
use super::session_store::SessionStore;

/// Authoritative list resync, exposed by a mounted panel
#[async_trait]
pub trait RefreshHandle: Send + Sync {
    async fn refresh_sessions(&self) -> Result<(), StoreError>;
}

/// Parent-owned slot holding the currently mounted panel's handle
///
/// Registration overwrites. An empty slot means "not ready yet".
#[derive(Clone, Default)]
pub struct RefreshSlot {
    handle: Arc<Mutex<Option<Arc<dyn RefreshHandle>>>>,
}

impl RefreshSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handle: Arc<dyn RefreshHandle>) {
        *self.lock() = Some(handle);
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    pub fn is_ready(&self) -> bool {
        self.lock().is_some()
    }

    /// Refresh through the registered handle
    ///
    /// Returns `Ok(false)` when nothing is registered yet.
    pub async fn refresh(&self) -> Result<bool, StoreError> {
        let handle = self.lock().clone();
        match handle {
            Some(handle) => {
                handle.refresh_sessions().await?;
                Ok(true)
            }
            None => {
                tracing::debug!("Refresh requested before the session panel mounted");
                Ok(false)
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Arc<dyn RefreshHandle>>> {
        self.handle.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("RefreshSlot lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

/// Loading and error state, shared with the registered handle
#[derive(Debug, Clone, Default)]
struct PanelStatus {
    loading: bool,
    error: Option<String>,
}

/// Totals shown under the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelFooter {
    pub session_count: usize,
    pub message_count_total: u64,
}

/// One rendered list row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    pub id: SessionId,
    pub title: String,
    pub message_count: u64,
    pub active: bool,
}

/// Truncate a title to `max_chars` characters, marking the cut with "..."
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }
    let mut truncated: String = title.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

pub struct SessionPanel {
    store: SessionStore,
    status: Arc<Mutex<PanelStatus>>,
    title_max_chars: usize,
    mounted: bool,
}

impl SessionPanel {
    pub fn new(store: SessionStore, title_max_chars: usize) -> Self {
        Self {
            store,
            status: Arc::new(Mutex::new(PanelStatus::default())),
            title_max_chars,
            mounted: false,
        }
    }

    /// Register a fresh handle in `slot` and perform the initial load
    ///
    /// A failed initial load is kept as the inline error; it is also returned
    /// so the caller can log it.
    pub async fn mount(&mut self, slot: &RefreshSlot) -> Result<(), StoreError> {
        self.attach(slot);
        self.load().await
    }

    /// Register a fresh handle in `slot` and show the list as loading
    ///
    /// The caller runs the initial load through the slot.
    pub fn attach(&mut self, slot: &RefreshSlot) {
        slot.register(Arc::new(PanelRefresher {
            store: self.store.clone(),
            status: self.status.clone(),
        }));
        self.mounted = true;
        lock_status(&self.status).loading = true;
    }

    /// The panel went off screen; siblings see an empty slot until remount
    pub fn unmount(&mut self, slot: &RefreshSlot) {
        slot.clear();
        self.mounted = false;
        lock_status(&self.status).loading = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub async fn load(&self) -> Result<(), StoreError> {
        load_into(&self.store, &self.status).await
    }

    /// Retry affordance shown next to the inline error
    pub async fn retry(&self) -> Result<(), StoreError> {
        self.load().await
    }

    pub fn is_loading(&self) -> bool {
        lock_status(&self.status).loading
    }

    /// Inline error from the last failed load, if any
    pub fn error(&self) -> Option<String> {
        lock_status(&self.status).error.clone()
    }

    pub fn display_title(&self, title: &str) -> String {
        truncate_title(title, self.title_max_chars)
    }

    pub async fn rows(&self, active: Option<&str>) -> Vec<PanelRow> {
        self.store
            .sessions()
            .await
            .into_iter()
            .map(|s| PanelRow {
                title: self.display_title(&s.title),
                active: active == Some(s.id.as_str()),
                message_count: s.message_count,
                id: s.id,
            })
            .collect()
    }

    /// Totals, or `None` for an empty list
    pub async fn footer(&self) -> Option<PanelFooter> {
        let sessions = self.store.sessions().await;
        if sessions.is_empty() {
            return None;
        }
        Some(PanelFooter {
            session_count: sessions.len(),
            message_count_total: sessions.iter().map(|s| s.message_count).sum(),
        })
    }
}

struct PanelRefresher {
    store: SessionStore,
    status: Arc<Mutex<PanelStatus>>,
}

#[async_trait]
impl RefreshHandle for PanelRefresher {
    async fn refresh_sessions(&self) -> Result<(), StoreError> {
        load_into(&self.store, &self.status).await
    }
}

async fn load_into(store: &SessionStore, status: &Arc<Mutex<PanelStatus>>) -> Result<(), StoreError> {
    lock_status(status).loading = true;
    let result = store.refresh().await;

    let mut status = lock_status(status);
    status.loading = false;
    match &result {
        Ok(()) => status.error = None,
        Err(e) => status.error = Some(e.user_message()),
    }
    result
}

fn lock_status(status: &Mutex<PanelStatus>) -> std::sync::MutexGuard<'_, PanelStatus> {
    status.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
