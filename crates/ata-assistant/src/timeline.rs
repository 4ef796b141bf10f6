//! Session flags and the append-only conversation timeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ata_core::types::{Message, Sender, Timestamp};

use crate::error::AssistantError;

// =============================================================================
// Session
// =============================================================================

/// Activation and listening state of the assistant for one page load.
///
/// `listening` can only be true while `active` is true. `generation` is
/// bumped on every activation so an exchange started before a deactivation
/// can recognise that its reply is stale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    active: bool,
    listening: bool,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Flip `active` and return the new value. Deactivating also stops listening.
    pub fn toggle_active(&mut self) -> bool {
        self.active = !self.active;
        if self.active {
            self.generation += 1;
        } else {
            self.listening = false;
        }
        self.active
    }

    /// Set the listening flag. Rejected while the session is inactive.
    pub fn set_listening(&mut self, listening: bool) -> Result<(), AssistantError> {
        if !self.active {
            return Err(AssistantError::Inactive);
        }
        self.listening = listening;
        Ok(())
    }
}

// =============================================================================
// Timeline
// =============================================================================

/// Transient "typing..." marker shown while an exchange is in flight.
///
/// Not a message: it has no sequence number and is never counted in the log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingPlaceholder {
    pub exchange_id: Uuid,
    pub shown_at: Timestamp,
}

/// A renderable timeline row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TimelineEntry {
    Message(Message),
    Typing(TypingPlaceholder),
}

/// Ordered, append-only message log plus at most one typing placeholder.
#[derive(Debug, Default)]
pub struct Timeline {
    messages: Vec<Message>,
    placeholder: Option<TypingPlaceholder>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return a copy of it.
    pub fn append(&mut self, sender: Sender, content: impl Into<String>) -> Message {
        let message = Message::new(self.messages.len() as u64, sender, content);
        self.messages.push(message.clone());
        message
    }

    /// Show the typing placeholder for `exchange_id`.
    ///
    /// Returns `false` (and changes nothing) if a placeholder is already shown.
    pub fn show_placeholder(&mut self, exchange_id: Uuid) -> bool {
        if self.placeholder.is_some() {
            return false;
        }
        self.placeholder = Some(TypingPlaceholder {
            exchange_id,
            shown_at: Timestamp::now(),
        });
        true
    }

    /// Remove the placeholder if it belongs to `exchange_id`.
    pub fn remove_placeholder(&mut self, exchange_id: Uuid) -> bool {
        match self.placeholder {
            Some(p) if p.exchange_id == exchange_id => {
                self.placeholder = None;
                true
            }
            _ => false,
        }
    }

    /// Remove whichever placeholder is shown.
    pub fn clear_placeholder(&mut self) -> Option<TypingPlaceholder> {
        self.placeholder.take()
    }

    pub fn placeholder(&self) -> Option<&TypingPlaceholder> {
        self.placeholder.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages. The placeholder is not counted.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Render order: every message, then the placeholder if one is shown.
    pub fn entries(&self) -> Vec<TimelineEntry> {
        self.messages
            .iter()
            .cloned()
            .map(TimelineEntry::Message)
            .chain(self.placeholder.map(TimelineEntry::Typing))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Session ----

    #[test]
    fn test_new_session_is_idle() {
        let s = Session::new();
        assert!(!s.is_active());
        assert!(!s.is_listening());
        assert_eq!(s.generation(), 0);
    }

    #[test]
    fn test_toggle_active_bumps_generation_on_activation() {
        let mut s = Session::new();
        assert!(s.toggle_active());
        assert_eq!(s.generation(), 1);
        assert!(!s.toggle_active());
        assert_eq!(s.generation(), 1);
        assert!(s.toggle_active());
        assert_eq!(s.generation(), 2);
    }

    #[test]
    fn test_set_listening_requires_active() {
        let mut s = Session::new();
        assert!(matches!(s.set_listening(true), Err(AssistantError::Inactive)));
        assert!(!s.is_listening());

        s.toggle_active();
        s.set_listening(true).unwrap();
        assert!(s.is_listening());
    }

    #[test]
    fn test_deactivate_stops_listening() {
        let mut s = Session::new();
        s.toggle_active();
        s.set_listening(true).unwrap();
        s.toggle_active();
        assert!(!s.is_listening());
    }

    // ---- Timeline ----

    #[test]
    fn test_append_assigns_sequential_seq() {
        let mut t = Timeline::new();
        let a = t.append(Sender::User, "um");
        let b = t.append(Sender::Assistant, "dois");
        assert_eq!(a.seq, 0);
        assert_eq!(b.seq, 1);
        assert_eq!(t.len(), 2);
        assert_eq!(t.last().unwrap().content, "dois");
    }

    #[test]
    fn test_single_placeholder() {
        let mut t = Timeline::new();
        let first = Uuid::new_v4();
        assert!(t.show_placeholder(first));
        assert!(!t.show_placeholder(Uuid::new_v4()));
        assert_eq!(t.placeholder().unwrap().exchange_id, first);
    }

    #[test]
    fn test_placeholder_not_counted() {
        let mut t = Timeline::new();
        t.append(Sender::User, "oi");
        t.show_placeholder(Uuid::new_v4());
        assert_eq!(t.len(), 1);
        assert_eq!(t.entries().len(), 2);
    }

    #[test]
    fn test_remove_placeholder_checks_owner() {
        let mut t = Timeline::new();
        let id = Uuid::new_v4();
        t.show_placeholder(id);
        assert!(!t.remove_placeholder(Uuid::new_v4()));
        assert!(t.placeholder().is_some());
        assert!(t.remove_placeholder(id));
        assert!(t.placeholder().is_none());
        assert!(!t.remove_placeholder(id));
    }

    #[test]
    fn test_clear_placeholder() {
        let mut t = Timeline::new();
        assert!(t.clear_placeholder().is_none());
        let id = Uuid::new_v4();
        t.show_placeholder(id);
        assert_eq!(t.clear_placeholder().unwrap().exchange_id, id);
        assert!(t.placeholder().is_none());
    }

    #[test]
    fn test_entries_render_placeholder_last() {
        let mut t = Timeline::new();
        t.append(Sender::User, "pergunta");
        t.show_placeholder(Uuid::new_v4());
        t.append(Sender::System, "Ouvindo...");
        let entries = t.entries();
        assert!(matches!(entries.last(), Some(TimelineEntry::Typing(_))));
        assert!(matches!(&entries[0], TimelineEntry::Message(m) if m.content == "pergunta"));
    }

    #[test]
    fn test_empty_timeline() {
        let t = Timeline::new();
        assert!(t.is_empty());
        assert!(t.entries().is_empty());
        assert!(t.last().is_none());
    }
}
