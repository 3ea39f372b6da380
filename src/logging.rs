//! Tracing subscriber initialization.
//!
//! The TUI owns the terminal, so in TUI mode logs always go to a file; one-shot
//! CLI commands log warnings to stderr. `RUST_LOG` overrides either default.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::ClientConfig;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "ragchat=info";
/// Filter for one-shot commands, whose stderr is shared with their output
pub const CLI_FILTER: &str = "ragchat=warn";
/// Log file name under the temp dir when no other location is known
pub const FALLBACK_LOG_FILE: &str = "ragchat.log";

/// Where log records are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// File logging for the TUI. Never stderr, which would draw over the
    /// alternate screen; falls back to the temp dir.
    pub fn for_tui(config: &ClientConfig) -> Self {
        Self::file_or_temp(config.resolved_log_file())
    }

    fn file_or_temp(path: Option<PathBuf>) -> Self {
        LogTarget::File(path.unwrap_or_else(|| std::env::temp_dir().join(FALLBACK_LOG_FILE)))
    }
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails when the log file cannot be opened or a subscriber is already set.
pub fn init_logging(target: &LogTarget) -> Result<()> {
    match target {
        LogTarget::Stderr => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(env_filter(CLI_FILTER))
                .with(fmt_layer)
                .try_init()
                .map_err(|e| eyre!("Failed to install log subscriber: {}", e))?;
        }
        LogTarget::File(path) => {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .wrap_err_with(|| format!("Failed to create log directory {}", dir.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .wrap_err_with(|| format!("Failed to open log file {}", path.display()))?;
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry()
                .with(env_filter(DEFAULT_FILTER))
                .with(fmt_layer)
                .try_init()
                .map_err(|e| eyre!("Failed to install log subscriber: {}", e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_target_uses_configured_file() {
        let config = ClientConfig::default().with_log_file(PathBuf::from("/tmp/ragchat-test.log"));
        assert_eq!(
            LogTarget::for_tui(&config),
            LogTarget::File(PathBuf::from("/tmp/ragchat-test.log"))
        );
    }

    #[test]
    fn test_tui_target_without_location_uses_temp_dir() {
        assert_eq!(
            LogTarget::file_or_temp(None),
            LogTarget::File(std::env::temp_dir().join(FALLBACK_LOG_FILE))
        );
    }

    #[test]
    fn test_unwritable_log_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a log file.
        let result = init_logging(&LogTarget::File(dir.path().to_path_buf()));
        assert!(result.is_err());
    }
}
