use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chatfront::config::Config;
use chatfront::transport;

#[derive(Parser)]
#[command(name = "chatfront")]
#[command(
    author,
    version = concat!(env!("CARGO_PKG_VERSION"), env!("CHATFRONT_VERSION_SUFFIX")),
    about = "Terminal front-end for a document-chat assistant server",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Assistant server URL (overrides config and CHATFRONT_BACKEND_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat shell
    Chat,

    /// Check whether the server is reachable
    Health,

    /// Manage conversations
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// List conversations
    List,

    /// Rename a conversation
    Rename {
        id: String,
        /// New title (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },

    /// Delete a conversation
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "chatfront=debug"
    } else {
        "chatfront=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?.with_env(),
        None => Config::load()?,
    }
    .with_base_url(cli.base_url);

    match cli.command {
        Commands::Chat => {
            tracing::debug!("Starting chat shell against {}", config.backend.base_url);
            transport::shell::run_chat(&config).await?;
        }
        Commands::Health => {
            if !transport::cli::run_health(&config).await? {
                std::process::exit(1);
            }
        }
        Commands::Sessions { action } => match action {
            SessionAction::List => transport::cli::run_sessions_list(&config).await?,
            SessionAction::Rename { id, title } => {
                transport::cli::run_sessions_rename(&config, &id, &title.join(" ")).await?
            }
            SessionAction::Delete { id, yes } => {
                transport::cli::run_sessions_delete(&config, &id, yes).await?
            }
        },
    }

    Ok(())
}
