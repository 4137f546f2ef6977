//! Shared test fixtures: an in-memory assistant server and service helpers

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use chatfront::backend::{BackendError, BackendResult, ChatBackend};
use chatfront::config::Config;
use chatfront::core::attachments::AttachedFile;
use chatfront::core::types::{
    ChatMessage, IndexSummary, IndexingResult, SessionDetail, SessionSummary,
};
use chatfront::ui_backend::{AppEvent, AppService};

/// A message the server received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub session_id: String,
    pub text: String,
    pub attachments: Vec<String>,
}

#[derive(Default)]
struct ServerState {
    sessions: Vec<SessionSummary>,
    transcripts: HashMap<String, Vec<ChatMessage>>,
    links: HashMap<String, String>,
    indexes: Vec<IndexSummary>,
    next_id: u32,
    calls: Vec<&'static str>,
    failing: HashSet<&'static str>,
    sent: Vec<SentMessage>,
}

/// Recording in-memory backend
///
/// Operations listed with [`MockBackend::fail`] return a network error until
/// [`MockBackend::recover`] is called.
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<ServerState>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_sessions(sessions: Vec<SessionSummary>) -> Arc<Self> {
        let backend = Self::default();
        backend.state.lock().unwrap().sessions = sessions;
        Arc::new(backend)
    }

    pub fn add_index(&self, id: &str, name: &str, document_count: u64) {
        self.state.lock().unwrap().indexes.push(IndexSummary {
            id: id.to_string(),
            name: name.to_string(),
            document_count,
        });
    }

    pub fn fail(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.remove(operation);
    }

    /// How many times an operation was called
    pub fn calls(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| **c == operation)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn linked_index(&self, session_id: &str) -> Option<String> {
        self.state.lock().unwrap().links.get(session_id).cloned()
    }

    pub fn server_sessions(&self) -> Vec<SessionSummary> {
        self.state.lock().unwrap().sessions.clone()
    }

    fn enter(&self, operation: &'static str) -> BackendResult<std::sync::MutexGuard<'_, ServerState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(operation);
        if state.failing.contains(operation) {
            return Err(BackendError::Network(format!("{} refused", operation)));
        }
        Ok(state)
    }

    fn new_session(state: &mut ServerState) -> SessionSummary {
        state.next_id += 1;
        let summary = SessionSummary::new(format!("session-{}", state.next_id), "New chat", 0);
        state.sessions.push(summary.clone());
        summary
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn check_health(&self) -> BackendResult<()> {
        self.enter("check_health").map(|_| ())
    }

    async fn get_sessions(&self) -> BackendResult<Vec<SessionSummary>> {
        Ok(self.enter("get_sessions")?.sessions.clone())
    }

    async fn create_session(&self) -> BackendResult<SessionSummary> {
        let mut state = self.enter("create_session")?;
        Ok(Self::new_session(&mut state))
    }

    async fn get_session(&self, session_id: &str) -> BackendResult<SessionDetail> {
        let state = self.enter("get_session")?;
        let summary = state
            .sessions
            .iter()
            .find(|s| s.id == session_id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(session_id.to_string()))?;
        Ok(SessionDetail {
            index_id: state.links.get(session_id).cloned(),
            messages: state
                .transcripts
                .get(session_id)
                .cloned()
                .unwrap_or_default(),
            id: summary.id,
            title: summary.title,
            message_count: summary.message_count,
        })
    }

    async fn rename_session(&self, session_id: &str, title: &str) -> BackendResult<SessionSummary> {
        let mut state = self.enter("rename_session")?;
        let session = state
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| BackendError::NotFound(session_id.to_string()))?;
        session.title = title.to_string();
        Ok(session.clone())
    }

    async fn delete_session(&self, session_id: &str) -> BackendResult<()> {
        let mut state = self.enter("delete_session")?;
        let before = state.sessions.len();
        state.sessions.retain(|s| s.id != session_id);
        if state.sessions.len() == before {
            return Err(BackendError::NotFound(session_id.to_string()));
        }
        Ok(())
    }

    async fn link_index_to_session(&self, session_id: &str, index_id: &str) -> BackendResult<()> {
        let mut state = self.enter("link_index_to_session")?;
        state
            .links
            .insert(session_id.to_string(), index_id.to_string());
        Ok(())
    }

    async fn send_message(
        &self,
        session_id: &str,
        text: &str,
        attachments: &[AttachedFile],
    ) -> BackendResult<String> {
        let mut state = self.enter("send_message")?;
        let reply = format!("Echo: {}", text);
        state.sent.push(SentMessage {
            session_id: session_id.to_string(),
            text: text.to_string(),
            attachments: attachments.iter().map(|a| a.name.clone()).collect(),
        });
        let transcript = state.transcripts.entry(session_id.to_string()).or_default();
        transcript.push(ChatMessage::user(text));
        transcript.push(ChatMessage::assistant(reply.clone()));
        if let Some(session) = state.sessions.iter_mut().find(|s| s.id == session_id) {
            session.message_count += 2;
        }
        Ok(reply)
    }

    async fn list_indexes(&self) -> BackendResult<Vec<IndexSummary>> {
        Ok(self.enter("list_indexes")?.indexes.clone())
    }

    async fn index_documents(
        &self,
        name: &str,
        files: &[AttachedFile],
    ) -> BackendResult<IndexingResult> {
        let mut state = self.enter("index_documents")?;
        let index_id = format!("idx-{}", name);
        state.indexes.push(IndexSummary {
            id: index_id.clone(),
            name: name.to_string(),
            document_count: files.len() as u64,
        });
        let session = Self::new_session(&mut state);
        state.links.insert(session.id.clone(), index_id.clone());
        Ok(IndexingResult { session, index_id })
    }
}

pub fn sessions(entries: &[(&str, &str, u64)]) -> Vec<SessionSummary> {
    entries
        .iter()
        .map(|(id, title, count)| SessionSummary::new(*id, *title, *count))
        .collect()
}

/// Service wired to `backend`, with default configuration
pub fn service(backend: Arc<MockBackend>) -> (AppService, mpsc::UnboundedReceiver<AppEvent>) {
    service_with(backend, &Config::default())
}

pub fn service_with(
    backend: Arc<MockBackend>,
    config: &Config,
) -> (AppService, mpsc::UnboundedReceiver<AppEvent>) {
    service_over(backend, config)
}

/// Service wired to any backend
pub fn service_over(
    backend: Arc<dyn ChatBackend>,
    config: &Config,
) -> (AppService, mpsc::UnboundedReceiver<AppEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (AppService::new(config, backend, tx), rx)
}

/// Backend whose calls never complete
pub struct StalledBackend;

#[async_trait]
impl ChatBackend for StalledBackend {
    async fn check_health(&self) -> BackendResult<()> {
        std::future::pending().await
    }

    async fn get_sessions(&self) -> BackendResult<Vec<SessionSummary>> {
        std::future::pending().await
    }

    async fn create_session(&self) -> BackendResult<SessionSummary> {
        std::future::pending().await
    }

    async fn get_session(&self, _session_id: &str) -> BackendResult<SessionDetail> {
        std::future::pending().await
    }

    async fn rename_session(&self, _session_id: &str, _title: &str) -> BackendResult<SessionSummary> {
        std::future::pending().await
    }

    async fn delete_session(&self, _session_id: &str) -> BackendResult<()> {
        std::future::pending().await
    }

    async fn link_index_to_session(&self, _session_id: &str, _index_id: &str) -> BackendResult<()> {
        std::future::pending().await
    }

    async fn send_message(
        &self,
        _session_id: &str,
        _text: &str,
        _attachments: &[AttachedFile],
    ) -> BackendResult<String> {
        std::future::pending().await
    }

    async fn list_indexes(&self) -> BackendResult<Vec<IndexSummary>> {
        std::future::pending().await
    }

    async fn index_documents(
        &self,
        _name: &str,
        _files: &[AttachedFile],
    ) -> BackendResult<IndexingResult> {
        std::future::pending().await
    }
}

/// Apply every pending completion until the channel stays quiet
pub async fn settle(service: &mut AppService, rx: &mut mpsc::UnboundedReceiver<AppEvent>) {
    while let Ok(Some(event)) = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await {
        service.handle_event(event).await.unwrap();
    }
}

/// Write a file under `dir` and return its path
pub fn write_file(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
