//! Client configuration.
//!
//! Defaults, overridden by environment variables, overridden by CLI flags.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `RAGCHAT_URL` | Base URL of the answer service |
//! | `RAGCHAT_SESSION` | Session key forwarded with every request |
//! | `RAGCHAT_LOG_FILE` | Log file used while the TUI owns the terminal |

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_STREAM_PATH: &str = "/chat/stream";
pub const DEFAULT_CHAT_PATH: &str = "/chat";
pub const DEFAULT_HEALTH_PATH: &str = "/health";

/// Connection settings for the answer service.
///
/// # Example
///
/// ```
/// use ragchat::config::ClientConfig;
///
/// let config = ClientConfig::default().with_base_url("http://localhost:9000/");
/// assert_eq!(config.stream_url(), "http://localhost:9000/chat/stream");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub stream_path: String,
    pub chat_path: String,
    pub health_path: String,
    /// Applied to connection setup only; streams themselves have no deadline.
    pub connect_timeout: Duration,
    pub session_id: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            stream_path: DEFAULT_STREAM_PATH.to_string(),
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            connect_timeout: Duration::from_secs(10),
            session_id: None,
            log_file: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `RAGCHAT_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = non_empty_var("RAGCHAT_URL") {
            config = config.with_base_url(url);
        }
        if let Some(session) = non_empty_var("RAGCHAT_SESSION") {
            config = config.with_session_id(session);
        }
        if let Some(path) = non_empty_var("RAGCHAT_LOG_FILE") {
            config = config.with_log_file(PathBuf::from(path));
        }
        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_stream_path(mut self, path: impl Into<String>) -> Self {
        self.stream_path = path.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_log_file(mut self, path: PathBuf) -> Self {
        self.log_file = Some(path);
        self
    }

    pub fn stream_url(&self) -> String {
        join_url(&self.base_url, &self.stream_path)
    }

    pub fn chat_url(&self) -> String {
        join_url(&self.base_url, &self.chat_path)
    }

    pub fn health_url(&self) -> String {
        join_url(&self.base_url, &self.health_path)
    }

    /// Where TUI-mode logs go: the configured file, else
    /// `<data dir>/ragchat/ragchat.log`.
    pub fn resolved_log_file(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| dirs::data_local_dir().map(|d| d.join("ragchat").join("ragchat.log")))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_urls() {
        let config = ClientConfig::default();
        assert_eq!(config.stream_url(), "http://127.0.0.1:8000/chat/stream");
        assert_eq!(config.chat_url(), "http://127.0.0.1:8000/chat");
        assert_eq!(config.health_url(), "http://127.0.0.1:8000/health");
    }

    #[test]
    fn test_join_url_tolerates_slashes() {
        assert_eq!(join_url("http://h/", "/chat"), "http://h/chat");
        assert_eq!(join_url("http://h", "chat"), "http://h/chat");
        assert_eq!(join_url("http://h/api/", "chat/stream"), "http://h/api/chat/stream");
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new()
            .with_base_url("http://example:1")
            .with_stream_path("/v2/stream")
            .with_session_id("abc")
            .with_connect_timeout(Duration::from_secs(3));
        assert_eq!(config.stream_url(), "http://example:1/v2/stream");
        assert_eq!(config.session_id.as_deref(), Some("abc"));
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_explicit_log_file_wins() {
        let config = ClientConfig::new().with_log_file(PathBuf::from("/tmp/x.log"));
        assert_eq!(config.resolved_log_file(), Some(PathBuf::from("/tmp/x.log")));
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        std::env::set_var("RAGCHAT_URL", "http://from-env:8080");
        std::env::set_var("RAGCHAT_SESSION", "sess-9");
        std::env::remove_var("RAGCHAT_LOG_FILE");

        let config = ClientConfig::from_env();
        assert_eq!(config.base_url, "http://from-env:8080");
        assert_eq!(config.session_id.as_deref(), Some("sess-9"));
        assert!(config.log_file.is_none());

        std::env::remove_var("RAGCHAT_URL");
        std::env::remove_var("RAGCHAT_SESSION");
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_blank_values() {
        std::env::set_var("RAGCHAT_URL", "   ");
        let config = ClientConfig::from_env();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        std::env::remove_var("RAGCHAT_URL");
    }
}
