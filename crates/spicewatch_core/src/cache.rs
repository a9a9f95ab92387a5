use std::collections::{HashMap, HashSet};

use crate::{MetadataEntry, NotResolvable, ResolutionState};

/// Proof that the holder owns the single in-flight resolution of a subject.
///
/// Completions are only accepted with the ticket issued by the latest
/// [`MetadataCache::begin`]; anything older is stale and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionTicket {
    pub subject_url: String,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheSlot {
    entry: Option<MetadataEntry>,
    state: ResolutionState,
    generation: u64,
}

/// Per-subject metadata cache and dedup gate, keyed by subject URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetadataCache {
    slots: HashMap<String, CacheSlot>,
    in_flight: HashSet<String>,
    next_generation: u64,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous read of the best-known entry and its state.
    pub fn peek(&self, subject_url: &str) -> (Option<&MetadataEntry>, ResolutionState) {
        match self.slots.get(subject_url) {
            Some(slot) => (slot.entry.as_ref(), slot.state),
            None => (None, ResolutionState::Unresolved),
        }
    }

    pub fn state(&self, subject_url: &str) -> ResolutionState {
        self.peek(subject_url).1
    }

    /// Marks the subject Pending and issues a ticket, unless it is already
    /// Resolved or already in flight. Failed subjects are retried.
    pub fn begin(&mut self, subject_url: &str) -> Option<ResolutionTicket> {
        if self.in_flight.contains(subject_url) {
            return None;
        }
        if self.state(subject_url) == ResolutionState::Resolved {
            return None;
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        self.slots.insert(
            subject_url.to_string(),
            CacheSlot {
                entry: None,
                state: ResolutionState::Pending,
                generation,
            },
        );
        self.in_flight.insert(subject_url.to_string());
        Some(ResolutionTicket {
            subject_url: subject_url.to_string(),
            generation,
        })
    }

    /// Stores the outcome of a resolution. Returns `false` without writing
    /// when the ticket is stale (subject invalidated or cache cleared since).
    pub fn complete(
        &mut self,
        ticket: &ResolutionTicket,
        outcome: Result<MetadataEntry, NotResolvable>,
    ) -> bool {
        let Some(slot) = self.slots.get_mut(&ticket.subject_url) else {
            return false;
        };
        if slot.generation != ticket.generation || slot.state != ResolutionState::Pending {
            return false;
        }

        match outcome {
            Ok(entry) => {
                slot.entry = Some(entry);
                slot.state = ResolutionState::Resolved;
            }
            Err(_) => {
                slot.entry = None;
                slot.state = ResolutionState::Failed;
            }
        }
        self.in_flight.remove(&ticket.subject_url);
        true
    }

    /// Resets the subject to Unresolved. Any ticket issued before this call
    /// becomes stale.
    pub fn invalidate(&mut self, subject_url: &str) {
        self.slots.remove(subject_url);
        self.in_flight.remove(subject_url);
    }

    /// Drops every entry and abandons all in-flight resolutions.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.in_flight.clear();
    }

    pub fn pending_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
