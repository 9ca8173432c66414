//! Ordered, identity-deduplicated event sequence

use indexmap::IndexMap;
use indexmap::map::Entry;
use shared::{EventId, TimelineEvent};

/// Append-only event sequence keyed by event id.
///
/// Order is arrival order. An event whose id is already present is
/// discarded whole, even if its other fields differ.
#[derive(Clone, Debug, Default)]
pub struct TimelineEvents {
    events: IndexMap<EventId, TimelineEvent>,
}

impl TimelineEvents {
    /// Starting sequence; later duplicates inside the seed are dropped.
    pub fn seeded(initial_events: impl IntoIterator<Item = TimelineEvent>) -> Self {
        let mut events = Self::default();
        for event in initial_events {
            events.append(event);
        }
        events
    }

    /// Append `event` unless its id is known. Returns whether it was added.
    pub fn append(&mut self, event: TimelineEvent) -> bool {
        match self.events.entry(event.id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(event);
                true
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.events.contains_key(id)
    }

    pub fn get(&self, index: usize) -> Option<&TimelineEvent> {
        self.events.get_index(index).map(|(_, event)| event)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimelineEvent> {
        self.events.values()
    }
}

impl PartialEq for TimelineEvents {
    /// Same events in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}
