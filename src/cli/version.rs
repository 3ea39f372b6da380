//! Version and usage output.

/// The current version of ragchat, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const USAGE: &str = "\
Usage:
  ragchat [--url URL]                               Start the interactive chat
  ragchat ask [--no-stream] [--url URL] <question>  Ask one question
  ragchat health [--url URL]                        Check the answer service
  ragchat --version                                 Print the version
  ragchat --help                                    Print this help

Environment:
  RAGCHAT_URL       Base URL of the answer service (default http://127.0.0.1:8000)
  RAGCHAT_SESSION   Session key forwarded with every request
  RAGCHAT_LOG_FILE  Log file used by the interactive chat
  RUST_LOG          Log filter (default ragchat=info)";

pub fn version_line() -> String {
    format!("ragchat {}", VERSION)
}

/// Handle the --version command.
pub fn handle_version_command() {
    println!("{}", version_line());
}

/// Handle the --help command.
pub fn handle_help_command() {
    println!("{}\n\n{}", version_line(), USAGE);
}
