//! CLI module for ragchat.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version and usage display
//! - One-shot `ask` and `health` commands
//!
//! # Usage
//!
//! The CLI dispatcher is called early in main() to handle command-line
//! commands before initializing the TUI:
//!
//! ```ignore
//! use ragchat::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! if let Some(result) = run_cli_command(&command, &config).await {
//!     if let Err(e) = result {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//!     std::process::exit(0);
//! }
//! // No CLI command, continue to TUI
//! ```

pub mod args;
pub mod ask;
pub mod version;

pub use args::{parse_args, CliCommand};
pub use ask::{ask_once, ask_request, ask_streaming, check_health};
pub use version::{handle_help_command, handle_version_command, USAGE, VERSION};

use color_eyre::eyre::{eyre, Result};
use tokio_util::sync::CancellationToken;

use crate::adapters::ReqwestTransport;
use crate::config::ClientConfig;

/// Run a CLI command if applicable.
///
/// # Returns
///
/// * `None` - If the command is `RunTui` (no CLI action needed)
/// * `Some(Ok(()))` - If a CLI command executed successfully
/// * `Some(Err(e))` - If a CLI command failed
pub async fn run_cli_command(command: &CliCommand, config: &ClientConfig) -> Option<Result<()>> {
    let result = match command {
        CliCommand::RunTui { .. } => return None,
        CliCommand::Version => {
            handle_version_command();
            Ok(())
        }
        CliCommand::Help => {
            handle_help_command();
            Ok(())
        }
        CliCommand::Invalid(reason) => Err(eyre!("{}\n\n{}", reason, USAGE)),
        CliCommand::Ask {
            question, stream, ..
        } => run_ask(question, *stream, config).await,
        CliCommand::Health { .. } => run_health(config).await,
    };
    Some(result)
}

async fn run_ask(question: &str, stream: bool, config: &ClientConfig) -> Result<()> {
    let transport = ReqwestTransport::new(config.clone())?;
    let request = ask_request(question, config.session_id.clone());
    let mut stdout = std::io::stdout();

    if !stream {
        return ask_once(&transport, &request, &mut stdout).await;
    }

    // Ctrl+C stops the answer instead of killing the process mid-line.
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });

    let result = ask_streaming(&transport, &request, &cancel, &mut stdout).await;
    watcher.abort();
    result
}

async fn run_health(config: &ClientConfig) -> Result<()> {
    let transport = ReqwestTransport::new(config.clone())?;
    check_health(&transport, &config.base_url, &mut std::io::stdout()).await
}
