use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Whether messages with this role are mirrored into the upstream history.
    pub fn is_conversational(self) -> bool {
        matches!(self, Role::User | Role::Assistant)
    }
}

/// Page locator of a citation. The service sends either a page number or a
/// free-form label, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageRef {
    Number(i64),
    Label(String),
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageRef::Number(n) => write!(f, "{}", n),
            PageRef::Label(s) => write!(f, "{}", s),
        }
    }
}

/// A source reference attached to an assistant answer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Citation {
    /// Document the answer was drawn from. The service may send `null`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl Citation {
    /// Create a citation for a source with no page information
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Set the page locator
    pub fn with_page(mut self, page: PageRef) -> Self {
        self.page = Some(page);
        self
    }

    /// Human-readable label, e.g. `handbook.pdf, p. 3`
    pub fn label(&self) -> String {
        let source = if self.source.trim().is_empty() {
            "source"
        } else {
            self.source.as_str()
        };
        match &self.page {
            Some(page) => format!("{}, p. {}", source, page),
            None => source.to_string(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A message exactly as it is shown in the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayMessage {
    pub role: Role,
    pub text: String,
    /// Sources backing an assistant answer. Never set for other roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<Citation>>,
    /// Shown to the user but never part of the upstream history
    /// (the seeded welcome line of a fresh session).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub display_only: bool,
    pub created_at: DateTime<Utc>,
}

impl DisplayMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text.into(), None)
    }

    pub fn assistant(text: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self::new(Role::Assistant, text.into(), Some(citations))
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text.into(), None)
    }

    /// An assistant line that is rendered but not sent upstream
    pub fn greeting(text: impl Into<String>) -> Self {
        Self {
            display_only: true,
            ..Self::new(Role::Assistant, text.into(), None)
        }
    }

    fn new(role: Role, text: String, citations: Option<Vec<Citation>>) -> Self {
        Self {
            role,
            text,
            citations,
            display_only: false,
            created_at: Utc::now(),
        }
    }

    /// Citations as a slice, empty when none were attached
    pub fn citations(&self) -> &[Citation] {
        self.citations.as_deref().unwrap_or(&[])
    }

    /// The citation-free projection sent upstream, if this message belongs
    /// in the history at all.
    pub fn to_history(&self) -> Option<HistoryMessage> {
        if self.display_only || !self.role.is_conversational() {
            return None;
        }
        Some(HistoryMessage {
            role: self.role,
            text: self.text.clone(),
        })
    }
}

/// One turn of conversational context sent to the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: Role,
    pub text: String,
}

impl HistoryMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}
