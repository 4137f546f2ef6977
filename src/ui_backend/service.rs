//! Application Service - Business Logic
//!
//! Drives the view state machine and coordinates the session store, the
//! session panel, the chat surface and the composer. Every backend call is
//! spawned and comes back as an [`AppEvent`], so command handling never waits
//! on the network. The store still applies a change only once the server has
//! confirmed it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::backend::ChatBackend;
use crate::config::Config;
use crate::core::attachments::{AttachmentValidator, RawFile};
use crate::core::composer::{Composer, KeyOutcome};
use crate::core::mode::{Effect, Mode, ModeController, Overlay, Transition, Trigger};
use crate::core::types::{IndexId, SessionId};

use super::chat_surface::ChatSurface;
use super::commands::{is_slash_command, parse_slash_command, Command};
use super::errors::{Operation, SendError, StoreError};
use super::events::AppEvent;
use super::session_panel::{RefreshSlot, SessionPanel};
use super::session_store::SessionStore;
use super::state::{ErrorLevel, HealthStatus, SharedState};
use super::types::{
    AppView, ChatView, ComposerView, IndexInfoView, IndexModalView, SidebarView,
};

/// Application Service - Business Logic Layer
pub struct AppService {
    modes: ModeController,
    store: SessionStore,
    refresh_slot: RefreshSlot,
    panel: SessionPanel,
    chat: ChatSurface,
    composer: Composer,
    backend: Arc<dyn ChatBackend>,

    /// Picker choice whose session is still being created
    index_request: Option<u64>,
    next_index_request: u64,
    /// Session awaiting a second delete request to confirm
    pending_delete: Option<SessionId>,

    /// Shared application state
    state: SharedState,

    /// Completion channel for spawned backend calls
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl std::fmt::Debug for AppService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppService")
            .field("mode", &self.modes.mode())
            .field("session", &self.chat.session_id())
            .field("state", &self.state)
            .finish()
    }
}

impl AppService {
    /// Create a new application service
    pub fn new(
        config: &Config,
        backend: Arc<dyn ChatBackend>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let store = SessionStore::new(backend.clone());
        let panel = SessionPanel::new(store.clone(), config.ui.title_max_chars);

        Self {
            modes: ModeController::new(config.ui.sidebar_open),
            store,
            refresh_slot: RefreshSlot::new(),
            panel,
            chat: ChatSurface::new(),
            composer: Composer::new(),
            backend,
            index_request: None,
            next_index_request: 0,
            pending_delete: None,
            state: SharedState::new(),
            event_tx,
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn modes(&self) -> &ModeController {
        &self.modes
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn refresh_slot(&self) -> &RefreshSlot {
        &self.refresh_slot
    }

    pub fn panel(&self) -> &SessionPanel {
        &self.panel
    }

    pub fn chat(&self) -> &ChatSurface {
        &self.chat
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn sidebar_visible(&self) -> bool {
        self.modes.sidebar_visible(self.chat.has_session())
    }

    /// Session waiting for its delete to be confirmed
    pub fn pending_delete(&self) -> Option<&SessionId> {
        self.pending_delete.as_ref()
    }

    /// Kick off the startup health probe
    pub fn start(&self) {
        self.spawn_health_check();
    }

    /// Handle a user command
    pub async fn handle_command(&mut self, command: Command) -> Result<()> {
        let mut next = Some(command);
        while let Some(command) = next.take() {
            next = self.apply_command(command).await;
        }
        self.sync_sidebar();
        Ok(())
    }

    /// Apply a completion reported by a spawned task
    pub async fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::HealthChecked(result) => {
                let health = match &result {
                    Ok(()) => HealthStatus::Connected,
                    Err(e) => {
                        tracing::warn!("Backend health check failed: {}", e);
                        HealthStatus::Error
                    }
                };
                self.state.set_health(health);
                self.composer.set_disabled(health == HealthStatus::Error);
            }

            AppEvent::SendFinished {
                submission,
                generation,
                created_session,
                result,
            } => {
                // A session created for a quick chat belongs to the surface
                // that started the send, not to whatever is showing now
                let mut bound = false;
                if let Some(id) = &created_session {
                    if generation == self.chat.generation()
                        && self.modes.mode() == Mode::QuickChat
                        && !self.chat.has_session()
                    {
                        tracing::info!("Quick chat bound to new session {}", id);
                        self.chat.activate(id.clone());
                        self.store.select(id);
                        bound = true;
                    } else {
                        tracing::debug!("Quick chat for session {} was left before the reply", id);
                    }
                }

                let target = match (&submission.session_id, &created_session) {
                    (Some(id), _) => Some(id.clone()),
                    (None, Some(id)) if bound => Some(id.clone()),
                    _ => None,
                };
                match &result {
                    Ok(reply) => {
                        if let Some(id) = &target {
                            self.chat.append_exchange(id, submission.text(), reply);
                        }
                        self.refresh_sessions_quietly();
                    }
                    Err(e) => {
                        tracing::warn!("Message send failed: {}", e);
                        self.state.notify_error(e.user_message());
                        if created_session.is_some() {
                            self.refresh_sessions_quietly();
                        }
                    }
                }
                self.composer.complete_submit(submission, &result);
            }

            AppEvent::DetailLoaded { session_id, result } => match result {
                Ok(detail) => {
                    self.chat.apply_detail(detail);
                }
                Err(e) if self.chat.is_active(&session_id) => {
                    tracing::warn!("Failed to load session {}: {}", session_id, e);
                    let err = StoreError::from_backend(Operation::LoadSession, Some(&session_id), e);
                    self.state.notify_error(err.user_message());
                }
                Err(e) => {
                    tracing::debug!("Ignoring failed detail for inactive session {}: {}", session_id, e);
                }
            },

            AppEvent::IndexingFinished(result) => {
                self.state.set_indexing_in_progress(false);
                match result {
                    Ok(indexed) => {
                        tracing::info!(
                            "Index {} ready with session {}",
                            indexed.index_id,
                            indexed.session.id
                        );
                        if !self.trigger(Trigger::IndexingCompleted(indexed.session.id.clone())) {
                            tracing::debug!("Indexing finished after the modal was closed");
                        }
                        self.refresh_sessions_quietly();
                    }
                    Err(e) => {
                        tracing::warn!("Indexing failed: {}", e);
                        let err = StoreError::fetch(Operation::IndexDocuments)(e);
                        self.state.notify_error(err.user_message());
                    }
                }
            }

            AppEvent::IndexesLoaded(result) => match result {
                Ok(indexes) => self.state.set_indexes(indexes),
                Err(e) => {
                    tracing::warn!("Failed to load indexes: {}", e);
                    let err = StoreError::fetch(Operation::LoadIndexes)(e);
                    self.state.notify_error(err.user_message());
                }
            },

            AppEvent::SessionsRefreshed { requested, result } => match result {
                Ok(true) => {}
                Ok(false) if requested => {
                    self.state.notify_info("The session list is not showing");
                }
                Ok(false) => tracing::debug!("Refresh skipped, session list not mounted"),
                Err(e) if requested => self.state.notify_error(e.user_message()),
                // The panel shows the failure inline
                Err(e) => tracing::warn!("Session list refresh failed: {}", e),
            },

            AppEvent::SessionRenamed { id, result } => match result {
                Ok(summary) => {
                    self.state
                        .notify_info(format!("Renamed to \"{}\"", summary.title));
                    // Renaming from the list also opens the conversation
                    let pick = Trigger::PickSession(id);
                    if self.modes.plan(&pick).is_some() {
                        self.trigger(pick);
                    }
                }
                Err(e) => self.state.notify_error(e.user_message()),
            },

            AppEvent::SessionDeleted { id, result } => match result {
                Ok(outcome) => {
                    tracing::debug!(
                        "Session {} deleted (active when requested: {})",
                        id,
                        outcome.was_active
                    );
                    if self.chat.is_active(&id) {
                        self.chat.clear();
                        self.trigger(Trigger::NewSession);
                    }
                    self.state.notify_info("Conversation deleted");
                }
                Err(e) => self.state.notify_error(e.user_message()),
            },

            AppEvent::IndexSessionReady {
                request,
                transition,
                result,
            } => {
                if self.index_request != Some(request) {
                    tracing::debug!("Index choice {} was abandoned", request);
                    if result.is_ok() {
                        self.refresh_sessions_quietly();
                    }
                } else {
                    self.index_request = None;
                    match result {
                        Ok(id) => {
                            tracing::info!("Session {} ready for the chosen index", id);
                            self.commit_transition(transition, Some(&id));
                        }
                        Err(e) => self.state.notify_error(e.user_message()),
                    }
                }
            }

            AppEvent::IndexLinked {
                session_id,
                index_id,
                result,
            } => match result {
                Ok(()) => {
                    self.modes.close_overlay(Overlay::IndexPicker);
                    self.state
                        .notify_info(format!("Conversation now uses index {}", index_id));
                    if self.chat.is_active(&session_id) {
                        self.spawn_detail_fetch(session_id);
                    }
                }
                Err(e) => self.state.notify_error(e.user_message()),
            },
        }

        self.sync_sidebar();
        Ok(())
    }

    /// Snapshot for renderers
    pub async fn view(&self) -> AppView {
        let mode = self.modes.mode();
        let active = self.chat.session_id().cloned();

        let sidebar = if self.sidebar_visible() {
            Some(SidebarView {
                rows: self.panel.rows(active.as_deref()).await,
                footer: self.panel.footer().await,
                error: self.panel.error(),
                loading: self.panel.is_loading(),
            })
        } else {
            None
        };

        let chat = if mode.is_chat() {
            let title = match &active {
                Some(id) => match self.store.find(id).await {
                    Some(summary) => Some(summary.title),
                    None => self.chat.detail().map(|d| d.title.clone()),
                },
                None => None,
            };
            Some(ChatView {
                session_id: active.clone(),
                title,
                transcript: self.chat.transcript().to_vec(),
            })
        } else {
            None
        };

        let index_info = if self.modes.index_info_visible(self.chat.has_session()) {
            let index_id = self.chat.detail().and_then(|d| d.index_id.clone());
            let index_name = index_id.as_ref().and_then(|id| {
                self.state
                    .indexes()
                    .into_iter()
                    .find(|i| &i.id == id)
                    .map(|i| i.name)
            });
            active.clone().map(|session_id| IndexInfoView {
                session_id,
                index_id,
                index_name,
            })
        } else {
            None
        };

        AppView {
            mode,
            health: self.state.health(),
            notification: self.state.notification(),
            sidebar,
            chat,
            composer: ComposerView {
                text: self.composer.text().to_string(),
                attachments: self.composer.attachments().iter().map(|a| a.preview()).collect(),
                placeholder: self.composer.placeholder(),
                can_submit: self.composer.can_submit(),
                in_flight: self.composer.is_in_flight(),
                disabled: self.composer.is_disabled(),
            },
            index_modal: self.modes.index_modal_visible().then(|| IndexModalView {
                in_progress: self.state.indexing_in_progress(),
            }),
            index_picker: self
                .modes
                .index_picker_visible()
                .then(|| self.state.indexes()),
            index_info,
        }
    }

    // ========== Commands ==========

    /// Apply one command; may yield a follow-up (a slash command typed into
    /// the composer)
    async fn apply_command(&mut self, command: Command) -> Option<Command> {
        match command {
            Command::Quit => self.state.set_should_quit(true),
            Command::CheckHealth => {
                self.state.set_health(HealthStatus::Checking);
                self.spawn_health_check();
            }

            Command::SelectIndexDocuments => self.trigger_or_notify(Trigger::SelectIndexDocuments),
            Command::SelectChatWithIndex => {
                if self.trigger(Trigger::SelectChatWithIndex) {
                    self.spawn_index_load();
                }
            }
            Command::SelectQuickChat => self.trigger_or_notify(Trigger::SelectQuickChat),
            Command::Cancel => self.cancel(),

            Command::StartIndexing { name, paths } => self.start_indexing(name, paths),
            Command::ChooseIndex(index_id) => self.choose_index(index_id),
            Command::OpenIndexPicker => {
                if !self.chat.has_session() {
                    self.state.notify_info("Start the conversation before linking an index");
                } else if self.modes.open_overlay(Overlay::IndexPicker, true) {
                    self.spawn_index_load();
                }
            }
            Command::ToggleIndexInfo => {
                let has_session = self.chat.has_session();
                if self.modes.index_info_visible(has_session) {
                    self.modes.close_overlay(Overlay::IndexInfo);
                } else if self.modes.open_overlay(Overlay::IndexInfo, has_session) {
                    if self.state.indexes().is_empty() {
                        self.spawn_index_load();
                    }
                } else {
                    self.state.notify_info("Open a conversation to see its index");
                }
            }

            Command::NewSession => self.trigger_or_notify(Trigger::NewSession),
            Command::OpenSession(id) => self.trigger_or_notify(Trigger::PickSession(id)),
            Command::RenameSession { id, title } => self.spawn_rename(id, title),
            Command::DeleteSession(id) => self.request_delete(id).await,
            Command::RefreshSessions => {
                if self.refresh_slot.is_ready() {
                    self.spawn_refresh(true);
                } else {
                    self.state.notify_info("The session list is not showing");
                }
            }
            Command::RetryLoadSessions => {
                if self.panel.is_mounted() {
                    self.spawn_refresh(false);
                }
            }
            Command::ToggleSidebar => {
                self.trigger(Trigger::ToggleSidebar);
            }

            Command::Key(key) => {
                if self.composer.handle_key(key) == KeyOutcome::Submit {
                    return self.submit();
                }
            }
            Command::SetDraft(text) => self.composer.set_text(text),
            Command::Attach(paths) => self.attach(paths),
            Command::Detach(n) => {
                let id = n
                    .checked_sub(1)
                    .and_then(|i| self.composer.attachments().get(i))
                    .map(|a| a.id);
                match id {
                    Some(id) => {
                        self.composer.remove_attachment(id);
                    }
                    None => self.state.notify_info(format!("No attachment #{}", n)),
                }
            }
            Command::Submit => return self.submit(),
        }
        None
    }

    fn cancel(&mut self) {
        if self.pending_delete.take().is_some() {
            self.state.notify_info("Delete cancelled");
        } else if self.modes.index_picker_overlay_visible() {
            self.modes.close_overlay(Overlay::IndexPicker);
        } else if self.modes.index_info_visible(self.chat.has_session()) {
            self.modes.close_overlay(Overlay::IndexInfo);
        } else {
            self.trigger(Trigger::Cancel);
        }
    }

    /// Deleting takes two requests for the same id; the first only asks
    async fn request_delete(&mut self, id: SessionId) {
        if self.pending_delete.as_ref() == Some(&id) {
            self.pending_delete = None;
            self.spawn_delete(id);
            return;
        }

        match self.store.find(&id).await {
            Some(summary) => {
                self.state.notify(
                    ErrorLevel::Warning,
                    format!(
                        "Delete \"{}\"? This cannot be undone. Run /delete {} again to confirm",
                        summary.title, id
                    ),
                );
                self.pending_delete = Some(id);
            }
            None => self
                .state
                .notify_error(StoreError::Conflict { id }.user_message()),
        }
    }

    fn choose_index(&mut self, index_id: IndexId) {
        if self.modes.mode() == Mode::PickingExistingIndex {
            if self.index_request.is_some() {
                self.state.notify_info("Still opening the chosen index");
                return;
            }
            self.trigger(Trigger::IndexChosen(index_id));
            return;
        }

        if !self.modes.index_picker_overlay_visible() {
            self.state.notify_info("Open the index picker first");
            return;
        }
        let Some(session_id) = self.chat.session_id().cloned() else {
            return;
        };
        let store = self.store.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = store.link_index(&session_id, &index_id).await;
            tx.send(AppEvent::IndexLinked {
                session_id,
                index_id,
                result,
            })
            .ok();
        });
    }

    fn attach(&mut self, paths: Vec<PathBuf>) {
        let mut raw_files = Vec::with_capacity(paths.len());
        for path in &paths {
            match RawFile::from_path(path) {
                Ok(raw) => raw_files.push(raw),
                Err(e) => {
                    self.state
                        .notify_error(format!("Cannot attach {}: {}", path.display(), e));
                }
            }
        }
        let accepted = self.composer.attach(raw_files);
        tracing::debug!("Attached {} of {} files", accepted, paths.len());
    }

    /// Start a send, or turn a slash line into a command
    fn submit(&mut self) -> Option<Command> {
        if is_slash_command(self.composer.text()) {
            let line = self.composer.text().to_string();
            self.composer.set_text("");
            match parse_slash_command(&line) {
                Ok(command) => return Some(command),
                Err(e) => self.state.notify_error(e.to_string()),
            }
            return None;
        }

        if !self.modes.mode().is_chat() {
            self.state
                .notify_info("Choose quick chat or an index before sending messages");
            return None;
        }

        let submission = self.composer.begin_submit(self.chat.session_id().cloned())?;
        let generation = self.chat.generation();
        tracing::debug!("Submitting message {}", submission.id);

        let backend = self.backend.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let mut created_session = None;
            let session_id = match submission.session_id.clone() {
                Some(id) => id,
                None => match backend.create_session().await {
                    Ok(summary) => {
                        created_session = Some(summary.id.clone());
                        summary.id
                    }
                    Err(e) => {
                        tx.send(AppEvent::SendFinished {
                            submission,
                            generation,
                            created_session: None,
                            result: Err(SendError::CreateSession(e)),
                        })
                        .ok();
                        return;
                    }
                },
            };

            let result = backend
                .send_message(&session_id, submission.text(), submission.attachments())
                .await
                .map_err(SendError::from);
            tx.send(AppEvent::SendFinished {
                submission,
                generation,
                created_session,
                result,
            })
            .ok();
        });
        None
    }

    fn start_indexing(&mut self, name: String, paths: Vec<PathBuf>) {
        if self.modes.mode() != Mode::Indexing {
            self.state.notify_info("Choose \"index documents\" first");
            return;
        }
        if self.state.indexing_in_progress() {
            return;
        }
        let name = name.trim().to_string();
        if name.is_empty() {
            self.state.notify_error("Enter a name for the index");
            return;
        }

        let mut raw_files = Vec::with_capacity(paths.len());
        for path in &paths {
            match RawFile::from_path(path) {
                Ok(raw) => raw_files.push(raw),
                Err(e) => {
                    self.state
                        .notify_error(format!("Cannot read {}: {}", path.display(), e));
                    return;
                }
            }
        }
        let files = AttachmentValidator::new().validate(raw_files);
        if files.is_empty() {
            self.state.notify_error("None of the selected files can be indexed");
            return;
        }

        tracing::info!("Indexing {} files into {:?}", files.len(), name);
        self.state.set_indexing_in_progress(true);
        let backend = self.backend.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = backend.index_documents(&name, &files).await;
            tx.send(AppEvent::IndexingFinished(result)).ok();
        });
    }

    // ========== State machine ==========

    /// Plan and commit, then apply the effects
    ///
    /// A transition with a fallible effect (create + link for a chosen index)
    /// is held back: the effect runs in the background and the transition is
    /// committed when it succeeds. Returns whether the transition was applied
    /// now.
    fn trigger(&mut self, trigger: Trigger) -> bool {
        let Some(transition) = self.modes.plan(&trigger) else {
            tracing::debug!("{:?} ignored in {:?}", trigger, self.modes.mode());
            return false;
        };

        let index_id = transition.effects.iter().find_map(|effect| match effect {
            Effect::CreateSessionForIndex(index_id) => Some(index_id.clone()),
            _ => None,
        });
        if let Some(index_id) = index_id {
            self.spawn_create_for_index(transition, index_id);
            return false;
        }

        self.commit_transition(transition, None)
    }

    fn trigger_or_notify(&mut self, trigger: Trigger) {
        let mode = self.modes.mode();
        if self.modes.plan(&trigger).is_none() {
            self.state
                .notify_info(format!("Not available in {}", mode.display_name()));
            return;
        }
        self.trigger(trigger);
    }

    fn commit_transition(&mut self, transition: Transition, created: Option<&SessionId>) -> bool {
        if !self.modes.commit(&transition) {
            return false;
        }
        if transition.from != transition.to {
            // Leaving the picker abandons a pending index choice
            self.index_request = None;
        }
        for effect in transition.effects {
            self.apply_effect(effect, created);
        }
        true
    }

    fn apply_effect(&mut self, effect: Effect, created: Option<&SessionId>) {
        match effect {
            Effect::ActivateSession(id) => self.activate_session(id),
            Effect::ActivateCreatedSession => match created {
                Some(id) => self.activate_session(id.clone()),
                None => tracing::warn!("No created session to activate"),
            },
            Effect::ClearActiveSession => self.chat.clear(),
            Effect::CreateSessionForIndex(_) => {}
            // Visibility is derived from the mode
            other => tracing::trace!("Effect {:?}", other),
        }
    }

    /// Bind the chat surface to `id` and announce it; the detail is only
    /// fetched when the binding changed
    fn activate_session(&mut self, id: SessionId) {
        let rebound = self.chat.activate(id.clone());
        self.store.select(&id);
        if rebound {
            self.spawn_detail_fetch(id);
        }
    }

    // ========== Background work ==========

    fn spawn_health_check(&self) {
        let backend = self.backend.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = backend.check_health().await;
            tx.send(AppEvent::HealthChecked(result)).ok();
        });
    }

    fn spawn_detail_fetch(&self, session_id: SessionId) {
        let backend = self.backend.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = backend.get_session(&session_id).await;
            tx.send(AppEvent::DetailLoaded { session_id, result }).ok();
        });
    }

    fn spawn_index_load(&self) {
        let backend = self.backend.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = backend.list_indexes().await;
            tx.send(AppEvent::IndexesLoaded(result)).ok();
        });
    }

    /// Resync through the refresh slot
    fn spawn_refresh(&self, requested: bool) {
        let slot = self.refresh_slot.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = slot.refresh().await;
            tx.send(AppEvent::SessionsRefreshed { requested, result }).ok();
        });
    }

    /// Resync after another operation; failures stay inline in the panel
    fn refresh_sessions_quietly(&self) {
        if self.refresh_slot.is_ready() {
            self.spawn_refresh(false);
        } else {
            tracing::debug!("Session list not mounted, skipping refresh");
        }
    }

    fn spawn_rename(&self, id: SessionId, title: String) {
        let store = self.store.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = store.rename(&id, &title).await;
            tx.send(AppEvent::SessionRenamed { id, result }).ok();
        });
    }

    fn spawn_delete(&self, id: SessionId) {
        let store = self.store.clone();
        let active = self.chat.session_id().cloned();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = store.delete(&id, active.as_deref()).await;
            tx.send(AppEvent::SessionDeleted { id, result }).ok();
        });
    }

    /// Create a session and link it to `index_id`; `transition` is committed
    /// when the completion arrives
    fn spawn_create_for_index(&mut self, transition: Transition, index_id: IndexId) {
        tracing::debug!("Creating a session for index {}", index_id);
        self.next_index_request += 1;
        let request = self.next_index_request;
        self.index_request = Some(request);
        let store = self.store.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result: Result<SessionId, StoreError> = async {
                let id = store.create().await?;
                store.link_index(&id, &index_id).await?;
                Ok(id)
            }
            .await;
            tx.send(AppEvent::IndexSessionReady {
                request,
                transition,
                result,
            })
            .ok();
        });
    }

    /// Mount the panel when the sidebar appears, unmount when it goes away
    fn sync_sidebar(&mut self) {
        let visible = self.sidebar_visible();
        if visible && !self.panel.is_mounted() {
            self.panel.attach(&self.refresh_slot);
            self.spawn_refresh(false);
        } else if !visible && self.panel.is_mounted() {
            self.panel.unmount(&self.refresh_slot);
        }
    }
}
