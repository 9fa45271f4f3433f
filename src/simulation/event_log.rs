//! Rolling history of births, deaths and generation changes.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Entries kept when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 20;

/// What a [`LoggedEvent`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// Two parents produced a child.
    Birth,
    /// A creature starved or its brain failed.
    Death,
    /// The population was rebuilt from survivors or reseeded.
    Generation,
}

impl EventKind {
    /// Short tag shown next to the entry.
    pub fn tag(self) -> &'static str {
        match self {
            EventKind::Birth => "birth",
            EventKind::Death => "death",
            EventKind::Generation => "gen",
        }
    }
}

/// One entry in the [`EventLog`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Ecosystem time of the event, in seconds.
    pub time: f32,
    /// Category, used for tinting.
    pub kind: EventKind,
    /// Human-readable summary.
    pub description: String,
}

/// Keeps the last `capacity` events, dropping the oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    entries: VecDeque<LoggedEvent>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl EventLog {
    /// Empty log holding at most `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an event, evicting the oldest once full.
    pub fn record(&mut self, time: f32, kind: EventKind, description: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LoggedEvent {
            time,
            kind,
            description: description.into(),
        });
    }

    /// Events from newest to oldest.
    pub fn recent(&self) -> impl Iterator<Item = &LoggedEvent> {
        self.entries.iter().rev()
    }

    /// Most recent event, if any.
    pub fn latest(&self) -> Option<&LoggedEvent> {
        self.entries.back()
    }

    /// Number of stored events.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
