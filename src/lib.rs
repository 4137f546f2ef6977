//! chatfront: terminal front-end for a document-chat assistant server
//!
//! This library provides:
//! - The view state machine (home, indexing, index picker, chat modes)
//! - A client-side session store with confirmation-gated mutations
//! - A message composer with attachment validation and draft restore
//! - An HTTP client for the assistant server
//! - A terminal shell and one-shot CLI commands

pub mod backend;
pub mod config;
pub mod core;
pub mod transport;
pub mod ui_backend;

pub use backend::{BackendError, ChatBackend, HttpBackend};
pub use config::Config;
pub use ui_backend::AppService;
