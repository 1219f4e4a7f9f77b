//! # Memory service types
//!
//! ## Strategies
//!
//! A [`MemoryStrategy`] is fixed when the store is created. Its [`StrategyType`] decides what is
//! extracted from events: preference-style statements, semantic facts, or (for `Custom`) only
//! messages carrying the strategy's extraction marker. Each strategy lists namespace templates such
//! as `support/customer/{actorId}/preferences`.
//!
//! ## Events
//!
//! An [`Event`] is an append-only record of one turn: ordered `(text, role)` pairs written for an
//! `(actor_id, session_id)` pair. Roles serialize upper-case (`USER`, `ASSISTANT`, `OTHER`).
//!
//! ## Records
//!
//! Retrieval returns [`MemoryRecord`]s; the payload lives under `content.text`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Placeholder substituted with the actor id in namespace templates.
pub const ACTOR_PLACEHOLDER: &str = "{actorId}";

/// Instantiates a namespace template for one actor.
pub fn format_namespace(template: &str, actor_id: &str) -> String {
    template.replace(ACTOR_PLACEHOLDER, actor_id)
}

/// Extraction style of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyType {
    UserPreference,
    Semantic,
    Custom,
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StrategyType::UserPreference => "USER_PREFERENCE",
            StrategyType::Semantic => "SEMANTIC",
            StrategyType::Custom => "CUSTOM",
        };
        f.write_str(s)
    }
}

/// A named extraction strategy and the namespace templates it writes to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStrategy {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub strategy_type: StrategyType,
    pub namespaces: Vec<String>,
    /// For `Custom` strategies: only messages containing this marker are extracted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_marker: Option<String>,
}

impl MemoryStrategy {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        strategy_type: StrategyType,
        namespaces: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            strategy_type,
            namespaces,
            extraction_marker: None,
        }
    }

    pub fn with_extraction_marker(mut self, marker: impl Into<String>) -> Self {
        self.extraction_marker = Some(marker.into());
        self
    }
}

/// Parameters of `create_memory_and_wait`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMemoryRequest {
    pub name: String,
    pub description: String,
    pub strategies: Vec<MemoryStrategy>,
    /// Retention window for events, in days.
    pub event_expiry_days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemoryStatus {
    Creating,
    Active,
    Failed,
    Deleting,
}

impl fmt::Display for MemoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MemoryStatus::Creating => "CREATING",
            MemoryStatus::Active => "ACTIVE",
            MemoryStatus::Failed => "FAILED",
            MemoryStatus::Deleting => "DELETING",
        };
        f.write_str(s)
    }
}

/// A memory store as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryResource {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: MemoryStatus,
    pub event_expiry_days: u32,
    pub created_at: DateTime<Utc>,
}

/// Role of one message in an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventRole {
    User,
    Assistant,
    Tool,
    /// Non-conversational records such as routing decisions; `SYSTEM` is accepted on input.
    #[serde(alias = "SYSTEM")]
    Other,
}

impl fmt::Display for EventRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventRole::User => "USER",
            EventRole::Assistant => "ASSISTANT",
            EventRole::Tool => "TOOL",
            EventRole::Other => "OTHER",
        };
        f.write_str(s)
    }
}

/// One `(text, role)` pair of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMessage {
    pub text: String,
    pub role: EventRole,
}

impl EventMessage {
    pub fn new(text: impl Into<String>, role: EventRole) -> Self {
        Self {
            text: text.into(),
            role,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, EventRole::User)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(text, EventRole::Assistant)
    }

    pub fn other(text: impl Into<String>) -> Self {
        Self::new(text, EventRole::Other)
    }
}

/// A stored event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: Uuid,
    pub memory_id: String,
    pub actor_id: String,
    pub session_id: String,
    pub messages: Vec<EventMessage>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryContent {
    #[serde(default)]
    pub text: String,
}

/// A retrieved memory snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    #[serde(default)]
    pub content: MemoryContent,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl MemoryRecord {
    pub fn new(text: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            content: MemoryContent { text: text.into() },
            namespace: namespace.into(),
            score: None,
            created_at: None,
        }
    }

    /// Trimmed text, or `None` when the record has no usable text.
    pub fn text(&self) -> Option<&str> {
        let text = self.content.text.trim();
        (!text.is_empty()).then_some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_namespace() {
        assert_eq!(
            format_namespace("support/customer/{actorId}/preferences", "customer_001"),
            "support/customer/customer_001/preferences"
        );
    }

    #[test]
    fn test_event_role_accepts_system_alias() {
        let role: EventRole = serde_json::from_str("\"SYSTEM\"").unwrap();
        assert_eq!(role, EventRole::Other);
        assert_eq!(serde_json::to_string(&EventRole::Other).unwrap(), "\"OTHER\"");
    }

    #[test]
    fn test_record_without_content_has_no_text() {
        let record: MemoryRecord = serde_json::from_str(r#"{"namespace": "x"}"#).unwrap();
        assert_eq!(record.text(), None);

        let record = MemoryRecord::new("  Battery info \n", "x");
        assert_eq!(record.text(), Some("Battery info"));
    }

    #[test]
    fn test_strategy_type_wire_name() {
        let strategy = MemoryStrategy::new(
            "CustomerPreferences",
            "prefs",
            StrategyType::UserPreference,
            vec!["support/customer/{actorId}/preferences".to_string()],
        );
        let json = serde_json::to_value(&strategy).unwrap();
        assert_eq!(json["type"], "USER_PREFERENCE");
        assert!(json.get("extraction_marker").is_none());
    }
}
