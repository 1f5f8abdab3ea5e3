//! Self-expiring status messages.

use std::time::{Duration, Instant};

/// How long a notification or error stays on screen.
pub const MESSAGE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
struct TimedMessage {
    text: String,
    expires_at: Instant,
}

/// A display slot holding at most one message and its single expiry.
///
/// Setting a message replaces both the text and the deadline, so an older
/// message can never clear a newer one early.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSlot {
    current: Option<TimedMessage>,
}

impl MessageSlot {
    pub fn set(&mut self, text: impl Into<String>, now: Instant) {
        self.current = Some(TimedMessage {
            text: text.into(),
            expires_at: now + MESSAGE_TTL,
        });
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.current.as_ref().map(|m| m.text.as_str())
    }

    /// Clear the slot if its deadline has passed. Returns `true` if it did.
    pub fn expire(&mut self, now: Instant) -> bool {
        match &self.current {
            Some(message) if now >= message.expires_at => {
                self.current = None;
                true
            }
            _ => false,
        }
    }
}
