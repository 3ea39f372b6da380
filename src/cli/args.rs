//! Command-line argument parsing for the ragchat CLI.
//!
//! ```text
//! ragchat [--url URL]                              interactive chat
//! ragchat ask [--no-stream] [--url URL] <question> one-shot question
//! ragchat health [--url URL]                       service health check
//! ragchat --version | -V
//! ragchat --help | -h
//! ```

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Ask one question and print the answer
    Ask {
        question: String,
        stream: bool,
        url: Option<String>,
    },
    /// Check whether the service is reachable
    Health { url: Option<String> },
    /// Run the TUI application (default)
    RunTui { url: Option<String> },
    /// Arguments could not be understood
    Invalid(String),
}

impl CliCommand {
    /// The `--url` override, if the command carries one.
    pub fn url(&self) -> Option<&str> {
        match self {
            CliCommand::Ask { url, .. }
            | CliCommand::Health { url }
            | CliCommand::RunTui { url } => url.as_deref(),
            _ => None,
        }
    }
}

/// Parse command-line arguments and return the appropriate command.
///
/// `--version` and `--help` win wherever they appear.
///
/// # Examples
///
/// ```
/// use ragchat::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["ragchat".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();

    for arg in &args {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            _ => {}
        }
    }

    let mut url = None;
    let mut stream = true;
    let mut positional = Vec::new();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        if arg == "--url" {
            match iter.next() {
                Some(value) => url = Some(value),
                None => return CliCommand::Invalid("--url requires a value".to_string()),
            }
        } else if let Some(value) = arg.strip_prefix("--url=") {
            url = Some(value.to_string());
        } else if arg == "--no-stream" {
            stream = false;
        } else if arg.starts_with("--") {
            return CliCommand::Invalid(format!("Unknown option: {}", arg));
        } else {
            positional.push(arg);
        }
    }

    let mut positional = positional.into_iter();
    match positional.next().as_deref() {
        None => {
            if !stream {
                return CliCommand::Invalid("--no-stream only applies to ask".to_string());
            }
            CliCommand::RunTui { url }
        }
        Some("ask") => {
            let question = positional.collect::<Vec<_>>().join(" ");
            if question.trim().is_empty() {
                return CliCommand::Invalid("ask requires a question".to_string());
            }
            CliCommand::Ask {
                question,
                stream,
                url,
            }
        }
        Some("health") => CliCommand::Health { url },
        Some(other) => CliCommand::Invalid(format!("Unknown command: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        let mut full = vec!["ragchat".to_string()];
        full.extend(args.iter().map(|s| s.to_string()));
        parse_args(full.into_iter())
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(parse(&[]), CliCommand::RunTui { url: None });
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), CliCommand::Version);
        assert_eq!(parse(&["-V"]), CliCommand::Version);
        assert_eq!(parse(&["ask", "what", "-V"]), CliCommand::Version);
    }

    #[test]
    fn test_parse_help_flag() {
        assert_eq!(parse(&["--help"]), CliCommand::Help);
        assert_eq!(parse(&["-h"]), CliCommand::Help);
    }

    #[test]
    fn test_parse_url_for_tui() {
        assert_eq!(
            parse(&["--url", "http://rag:9000"]),
            CliCommand::RunTui {
                url: Some("http://rag:9000".to_string())
            }
        );
        assert_eq!(
            parse(&["--url=http://rag:9000"]).url(),
            Some("http://rag:9000")
        );
    }

    #[test]
    fn test_parse_url_missing_value() {
        assert!(matches!(parse(&["--url"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_ask_joins_words() {
        assert_eq!(
            parse(&["ask", "What", "is", "the", "refund", "policy?"]),
            CliCommand::Ask {
                question: "What is the refund policy?".to_string(),
                stream: true,
                url: None,
            }
        );
    }

    #[test]
    fn test_parse_ask_with_flags() {
        assert_eq!(
            parse(&["ask", "--no-stream", "--url", "http://x", "hello"]),
            CliCommand::Ask {
                question: "hello".to_string(),
                stream: false,
                url: Some("http://x".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_ask_without_question() {
        assert_eq!(
            parse(&["ask"]),
            CliCommand::Invalid("ask requires a question".to_string())
        );
    }

    #[test]
    fn test_parse_health() {
        assert_eq!(parse(&["health"]), CliCommand::Health { url: None });
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            parse(&["serve"]),
            CliCommand::Invalid("Unknown command: serve".to_string())
        );
        assert!(matches!(parse(&["--verbose"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_no_stream_outside_ask() {
        assert!(matches!(parse(&["--no-stream"]), CliCommand::Invalid(_)));
    }
}
