//! Event logs attached to tiles and actors.
//!
//! Tile logs are append-only and unbounded. Actor logs keep only the most
//! recent entries; the oldest entries are dropped once the capacity is hit.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actor::ActorRef;
use crate::ids::{CreatureId, PlayerId, TileId};

/// Default number of entries an actor remembers.
pub const DEFAULT_ACTOR_EVENT_CAPACITY: usize = 20;

/// A single recorded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Turn number at which the event was recorded.
    pub turn: u32,
    /// What happened.
    pub text: String,
}

/// An ordered event log with an optional capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    entries: VecDeque<LoggedEvent>,
    capacity: Option<usize>,
}

impl EventLog {
    /// Create a log that never drops entries.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Create a log that keeps at most `capacity` entries (minimum 1).
    pub fn bounded(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: Some(capacity.max(1)),
        }
    }

    /// Append an event, dropping the oldest entries if over capacity.
    pub fn push(&mut self, turn: u32, text: impl Into<String>) {
        self.entries.push_back(LoggedEvent {
            turn,
            text: text.into(),
        });
        if let Some(cap) = self.capacity {
            while self.entries.len() > cap {
                self.entries.pop_front();
            }
        }
    }

    /// Iterate over entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &LoggedEvent> {
        self.entries.iter()
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&LoggedEvent> {
        self.entries.back()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The capacity, or `None` for an unbounded log.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

/// Whose event log an entry is written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EventTarget {
    /// A tile's append-only log.
    Tile(TileId),
    /// A player's recent-event log.
    Player(PlayerId),
    /// A creature's recent-event log.
    Creature(CreatureId),
}

impl From<ActorRef> for EventTarget {
    fn from(actor: ActorRef) -> Self {
        match actor {
            ActorRef::Player(id) => Self::Player(id),
            ActorRef::Creature(id) => Self::Creature(id),
        }
    }
}

impl fmt::Display for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tile(id) => write!(f, "tile:{id}"),
            Self::Player(id) => write!(f, "player:{id}"),
            Self::Creature(id) => write!(f, "creature:{id}"),
        }
    }
}
