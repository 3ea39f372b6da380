//! AppMessage enum for async communication within the application.

use crate::stream::StreamMessage;

/// Messages received from async operations (streaming, health checks)
#[derive(Debug, Clone, PartialEq)]
pub enum AppMessage {
    /// Progress or end of a chat stream
    Stream(StreamMessage),
    /// Result of a health check against the answer service
    ConnectionStatus(bool),
}

impl From<StreamMessage> for AppMessage {
    fn from(message: StreamMessage) -> Self {
        AppMessage::Stream(message)
    }
}
