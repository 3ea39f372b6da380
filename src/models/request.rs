use serde::{Deserialize, Serialize};

use super::message::{Citation, HistoryMessage};

/// Request body for both the streaming and the one-shot chat endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// The question being asked
    pub message: String,
    /// Optional server-side session key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Conversational context, oldest first. Includes the turn for `message`.
    #[serde(default)]
    pub history: Vec<HistoryMessage>,
}

impl ChatRequest {
    /// Create a request with no prior context
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: None,
            history: Vec::new(),
        }
    }

    /// Attach the conversation history
    pub fn with_history(mut self, history: Vec<HistoryMessage>) -> Self {
        self.history = history;
        self
    }

    /// Attach a server-side session key
    pub fn with_session_id(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }
}

/// Response of the non-streaming `/chat` endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// Response of the `/health` endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_serializes_without_session() {
        let request = ChatRequest::new("What is the refund policy?")
            .with_history(vec![HistoryMessage::user("What is the refund policy?")]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "What is the refund policy?",
                "history": [{"role": "user", "text": "What is the refund policy?"}]
            })
        );
    }

    #[test]
    fn test_chat_request_serializes_session_id() {
        let request = ChatRequest::new("hi").with_session_id(Some("s-1".to_string()));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["session_id"], "s-1");
    }

    #[test]
    fn test_chat_response_defaults_citations() {
        let response: ChatResponse = serde_json::from_str(r#"{"answer":"42"}"#).unwrap();
        assert_eq!(response.answer, "42");
        assert!(response.citations.is_empty());
    }

    #[test]
    fn test_health_response_is_ok() {
        let health: HealthResponse = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(health.is_ok());
    }
}
