//! Streaming-related error types.
//!
//! Everything that can end a chat request early lands here. Malformed
//! payloads inside an otherwise healthy stream are not errors at all; the
//! decoder recovers from them locally.

use thiserror::Error;

/// The notice shown for any failure that is not a user-initiated stop.
pub const GENERIC_FAILURE_NOTICE: &str = "Sorry, something went wrong contacting the server.";

/// Stream-specific error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The service answered with a non-2xx status.
    #[error("Server error ({status}): {detail}")]
    Transport { status: u16, detail: String },

    /// The response carried no readable body.
    #[error("No response body (streaming unsupported?)")]
    NoBody,

    /// Could not reach the service.
    #[error("Connection to {url} failed: {message}")]
    Connection { url: String, message: String },

    /// The request or a body read timed out.
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// Reading the response body failed mid-stream.
    #[error("Failed to read response body: {message}")]
    Read { message: String },

    /// A non-streaming response could not be decoded.
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    /// The request was aborted by the user.
    #[error("Request cancelled")]
    Cancelled,

    /// A stream is already in flight.
    #[error("A response is already streaming")]
    AlreadyStreaming,
}

impl StreamError {
    /// Whether this is the cancellation-specific error. Cancellation is not a
    /// failure and must never reach the user as one.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, StreamError::Cancelled)
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::Cancelled => "Request cancelled.".to_string(),
            StreamError::AlreadyStreaming => {
                "Please wait for the current response to complete before sending another message."
                    .to_string()
            }
            _ => GENERIC_FAILURE_NOTICE.to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::Transport { .. } => "E_STREAM_STATUS",
            StreamError::NoBody => "E_STREAM_NOBODY",
            StreamError::Connection { .. } => "E_STREAM_CONN",
            StreamError::Timeout { .. } => "E_STREAM_TIMEOUT",
            StreamError::Read { .. } => "E_STREAM_READ",
            StreamError::Decode { .. } => "E_STREAM_DECODE",
            StreamError::Cancelled => "E_STREAM_CANCELLED",
            StreamError::AlreadyStreaming => "E_STREAM_BUSY",
        }
    }
}

/// Classify a reqwest error into a [`StreamError`].
pub fn classify_reqwest_error(err: &reqwest::Error, url: &str) -> StreamError {
    if err.is_connect() {
        StreamError::Connection {
            url: url.to_string(),
            message: err.to_string(),
        }
    } else if err.is_timeout() {
        StreamError::Timeout {
            url: url.to_string(),
        }
    } else if err.is_decode() {
        StreamError::Decode {
            message: err.to_string(),
        }
    } else if let Some(status) = err.status() {
        StreamError::Transport {
            status: status.as_u16(),
            detail: err.to_string(),
        }
    } else {
        StreamError::Read {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_is_cancellation() {
        assert!(StreamError::Cancelled.is_cancellation());
        assert!(!StreamError::NoBody.is_cancellation());
    }

    #[test]
    fn test_transport_display_carries_status_and_detail() {
        let err = StreamError::Transport {
            status: 503,
            detail: "model unavailable".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("503"));
        assert!(display.contains("model unavailable"));
        assert_eq!(err.error_code(), "E_STREAM_STATUS");
    }

    #[test]
    fn test_failures_share_one_user_notice() {
        assert_eq!(StreamError::NoBody.user_message(), GENERIC_FAILURE_NOTICE);
        assert_eq!(
            StreamError::Read {
                message: "reset".to_string()
            }
            .user_message(),
            GENERIC_FAILURE_NOTICE
        );
        assert_ne!(StreamError::Cancelled.user_message(), GENERIC_FAILURE_NOTICE);
    }
}
