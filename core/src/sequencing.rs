//! Per-target request sequencing.
//!
//! Each dispatched request takes a [`Ticket`] for the thing it targets. When
//! two requests for the same target overlap, only the newest one's completion
//! is applied; the older one is dropped instead of patching state it no
//! longer describes.

use std::collections::HashMap;

use phonebook_types::ContactId;

/// What a request targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestKey {
    /// The whole collection (load/reload).
    All,
    /// A contact that does not exist yet, by draft name.
    Name(String),
    /// An existing contact.
    Id(ContactId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    key: RequestKey,
    seq: u64,
}

impl Ticket {
    #[must_use]
    pub fn key(&self) -> &RequestKey {
        &self.key
    }

    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Default)]
pub struct RequestTracker {
    next_seq: u64,
    latest: HashMap<RequestKey, u64>,
}

impl RequestTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket, superseding any in-flight ticket for the same key.
    pub fn issue(&mut self, key: RequestKey) -> Ticket {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.latest.insert(key.clone(), seq);
        Ticket { key, seq }
    }

    #[must_use]
    pub fn is_in_flight(&self, key: &RequestKey) -> bool {
        self.latest.contains_key(key)
    }

    /// Retire a ticket. Returns `true` if it was still the newest for its key,
    /// i.e. its completion should be applied.
    pub fn finish(&mut self, ticket: &Ticket) -> bool {
        if self.latest.get(&ticket.key) == Some(&ticket.seq) {
            self.latest.remove(&ticket.key);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.latest.len()
    }

    pub fn clear(&mut self) {
        self.latest.clear();
    }
}
