use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Author of a timeline message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// Typed or transcribed input from the reader.
    User,
    /// Reply produced by the assistant.
    Assistant,
    /// Status notices such as the listening prompt.
    System,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Assistant => write!(f, "assistant"),
            Sender::System => write!(f, "system"),
        }
    }
}

// =============================================================================
// Newtype Wrappers - Temporal
// =============================================================================

/// Unix timestamp in milliseconds since epoch.
///
/// Compared by value. Two Timestamps with the same inner value are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.0).unwrap_or_default()
    }
}

// =============================================================================
// Timeline entities
// =============================================================================

/// A single entry of the conversation timeline.
///
/// Immutable once appended: the timeline only ever hands out clones.
/// `seq` is the insertion index and defines render and voice-output order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub seq: u64,
    pub sender: Sender,
    pub content: String,
    pub created_at: Timestamp,
}

impl Message {
    pub fn new(seq: u64, sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            seq,
            sender,
            content: content.into(),
            created_at: Timestamp::now(),
        }
    }
}

// =============================================================================
// Portal content
// =============================================================================

/// An upcoming school event listed by the assistant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolEvent {
    /// Day and month, e.g. `15/06`.
    pub date: String,
    pub title: String,
    pub location: String,
}

impl SchoolEvent {
    pub fn new(date: &str, title: &str, location: &str) -> Self {
        Self {
            date: date.to_string(),
            title: title.to_string(),
            location: location.to_string(),
        }
    }
}

/// A news article that may be recommended to the reader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u32,
    pub title: String,
    pub tags: Vec<String>,
}

impl CatalogEntry {
    pub fn new(id: u32, title: &str, tags: &[&str]) -> Self {
        Self {
            id,
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_display() {
        assert_eq!(Sender::User.to_string(), "user");
        assert_eq!(Sender::Assistant.to_string(), "assistant");
        assert_eq!(Sender::System.to_string(), "system");
    }

    #[test]
    fn test_sender_serde_snake_case() {
        let json = serde_json::to_string(&Sender::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let back: Sender = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(back, Sender::System);
    }

    #[test]
    fn test_timestamp_datetime_conversion() {
        let dt = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let ts = Timestamp::from_datetime(dt);
        assert_eq!(ts.0, 1_700_000_000_123);
        assert_eq!(ts.to_datetime(), dt);
    }

    #[test]
    fn test_timestamp_ordering() {
        assert!(Timestamp(1) < Timestamp(2));
    }

    #[test]
    fn test_message_new_assigns_fields() {
        let msg = Message::new(3, Sender::User, "olá");
        assert_eq!(msg.seq, 3);
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.content, "olá");
        assert_ne!(msg.id, Uuid::nil());
    }

    #[test]
    fn test_catalog_entry_new() {
        let entry = CatalogEntry::new(7, "Título", &["a", "b"]);
        assert_eq!(entry.id, 7);
        assert_eq!(entry.tags, vec!["a".to_string(), "b".to_string()]);
    }
}
