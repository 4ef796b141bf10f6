use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Message, Timestamp};

/// State-change notifications emitted by the assistant engine.
///
/// The UI layer subscribes to these instead of being called back directly:
/// it renders appended messages, shows or hides the typing indicator and
/// enables or disables controls as the session toggles.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AssistantEvent {
    // =========================================================================
    // Session Events
    // =========================================================================
    /// The assistant was activated or deactivated.
    SessionToggled { active: bool, timestamp: Timestamp },

    /// Voice capture started or stopped.
    ListeningToggled {
        listening: bool,
        timestamp: Timestamp,
    },

    // =========================================================================
    // Timeline Events
    // =========================================================================
    /// A message was appended to the timeline.
    MessageAppended {
        message: Message,
        timestamp: Timestamp,
    },

    /// The typing placeholder was inserted for an exchange.
    PlaceholderShown {
        exchange_id: Uuid,
        timestamp: Timestamp,
    },

    /// The typing placeholder was removed.
    PlaceholderRemoved {
        exchange_id: Uuid,
        timestamp: Timestamp,
    },

    /// An exchange resolved after the session was deactivated; its reply was dropped.
    ExchangeDiscarded {
        exchange_id: Uuid,
        timestamp: Timestamp,
    },

    // =========================================================================
    // Voice Events
    // =========================================================================
    /// A reply was forwarded to speech playback.
    SpeechRequested {
        text_length: usize,
        timestamp: Timestamp,
    },
}

impl AssistantEvent {
    /// Returns the timestamp of the event.
    pub fn timestamp(&self) -> Timestamp {
        match self {
            AssistantEvent::SessionToggled { timestamp, .. }
            | AssistantEvent::ListeningToggled { timestamp, .. }
            | AssistantEvent::MessageAppended { timestamp, .. }
            | AssistantEvent::PlaceholderShown { timestamp, .. }
            | AssistantEvent::PlaceholderRemoved { timestamp, .. }
            | AssistantEvent::ExchangeDiscarded { timestamp, .. }
            | AssistantEvent::SpeechRequested { timestamp, .. } => *timestamp,
        }
    }

    /// Returns a human-readable event name for logging.
    pub fn event_name(&self) -> &'static str {
        match self {
            AssistantEvent::SessionToggled { .. } => "session_toggled",
            AssistantEvent::ListeningToggled { .. } => "listening_toggled",
            AssistantEvent::MessageAppended { .. } => "message_appended",
            AssistantEvent::PlaceholderShown { .. } => "placeholder_shown",
            AssistantEvent::PlaceholderRemoved { .. } => "placeholder_removed",
            AssistantEvent::ExchangeDiscarded { .. } => "exchange_discarded",
            AssistantEvent::SpeechRequested { .. } => "speech_requested",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sender;

    #[test]
    fn test_event_timestamp() {
        let ts = Timestamp::now();
        let event = AssistantEvent::SessionToggled {
            active: true,
            timestamp: ts,
        };
        assert_eq!(event.timestamp(), ts);
    }

    #[test]
    fn test_event_names() {
        let ts = Timestamp::now();
        let id = Uuid::new_v4();
        let cases = vec![
            (
                AssistantEvent::ListeningToggled {
                    listening: false,
                    timestamp: ts,
                },
                "listening_toggled",
            ),
            (
                AssistantEvent::PlaceholderShown {
                    exchange_id: id,
                    timestamp: ts,
                },
                "placeholder_shown",
            ),
            (
                AssistantEvent::PlaceholderRemoved {
                    exchange_id: id,
                    timestamp: ts,
                },
                "placeholder_removed",
            ),
            (
                AssistantEvent::ExchangeDiscarded {
                    exchange_id: id,
                    timestamp: ts,
                },
                "exchange_discarded",
            ),
            (
                AssistantEvent::SpeechRequested {
                    text_length: 4,
                    timestamp: ts,
                },
                "speech_requested",
            ),
        ];
        for (event, name) in cases {
            assert_eq!(event.event_name(), name);
        }
    }

    #[test]
    fn test_message_appended_serialization() {
        let event = AssistantEvent::MessageAppended {
            message: Message::new(0, Sender::Assistant, "Olá!"),
            timestamp: Timestamp::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("MessageAppended"));
        assert!(json.contains("\"assistant\""));
        assert_eq!(event.event_name(), "message_appended");
    }
}
