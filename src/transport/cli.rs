//! One-shot CLI commands against the assistant server

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use crate::backend::{ChatBackend, HttpBackend};
use crate::config::Config;
use crate::ui_backend::{truncate_title, SessionStore, StoreError};

/// Build the HTTP backend from configuration
pub fn connect(config: &Config) -> Result<Arc<dyn ChatBackend>> {
    let backend = HttpBackend::new(&config.backend).context("Invalid backend configuration")?;
    tracing::debug!("Using backend {}", backend.base_url());
    Ok(Arc::new(backend))
}

fn store_failure(err: StoreError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

/// Probe the server once; returns whether it is reachable
pub async fn run_health(config: &Config) -> Result<bool> {
    let backend = connect(config)?;
    match backend.check_health().await {
        Ok(()) => {
            println!(
                "{} Connected to {}",
                "✓".green(),
                config.backend.base_url.bold()
            );
            Ok(true)
        }
        Err(e) => {
            println!(
                "{} Server unavailable at {}: {}",
                "✗".red(),
                config.backend.base_url.bold(),
                e
            );
            Ok(false)
        }
    }
}

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Messages")]
    messages: u64,
}

/// Print the session list as a table
pub async fn run_sessions_list(config: &Config) -> Result<()> {
    let store = SessionStore::new(connect(config)?);
    let sessions = store.list().await.map_err(store_failure)?;

    if sessions.is_empty() {
        println!("{}", "No conversations yet".dimmed());
        return Ok(());
    }

    let total: u64 = sessions.iter().map(|s| s.message_count).sum();
    let count = sessions.len();
    let rows: Vec<SessionRow> = sessions
        .into_iter()
        .map(|s| SessionRow {
            title: truncate_title(&s.title, config.ui.title_max_chars),
            messages: s.message_count,
            id: s.id,
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
    println!(
        "{}",
        format!("{} conversations, {} messages", count, total).dimmed()
    );
    Ok(())
}

pub async fn run_sessions_rename(config: &Config, id: &str, title: &str) -> Result<()> {
    let store = SessionStore::new(connect(config)?);
    store.list().await.map_err(store_failure)?;
    let renamed = store.rename(id, title).await.map_err(store_failure)?;
    println!("{} Renamed {} to \"{}\"", "✓".green(), renamed.id, renamed.title);
    Ok(())
}

/// Delete a conversation, asking first unless `yes` is set
pub async fn run_sessions_delete(config: &Config, id: &str, yes: bool) -> Result<()> {
    let store = SessionStore::new(connect(config)?);
    store.list().await.map_err(store_failure)?;

    if !yes {
        let Some(summary) = store.find(id).await else {
            return Err(store_failure(StoreError::Conflict { id: id.to_string() }));
        };
        let question = format!("Delete \"{}\"? This cannot be undone.", summary.title);
        if !confirm(&question)? {
            println!("{}", "Cancelled".dimmed());
            return Ok(());
        }
    }

    store.delete(id, None).await.map_err(store_failure)?;
    println!("{} Deleted {}", "✓".green(), id);
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N]: ", question.bold());
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
