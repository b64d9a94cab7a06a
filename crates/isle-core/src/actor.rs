//! Players and creatures.
//!
//! Both share an [`Actor`] body: a location, a stat sheet, actor-scoped flags,
//! and a bounded memory of recent events. Carried items are not stored on the
//! actor; they are derived from item ownership in the [`World`](crate::World).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IsleError, IsleResult};
use crate::event::{DEFAULT_ACTOR_EVENT_CAPACITY, EventLog};
use crate::ids::{CreatureId, PlayerId, TileId};
use crate::session::{FlagName, FlagScope, FlagTarget};

/// The shared body of a player or creature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Display name.
    pub name: String,
    /// Current tile.
    pub location: TileId,
    /// Stat sheet, e.g. `AWR`, `CHA`, `AGI`.
    pub stats: BTreeMap<String, i32>,
    /// Recent events, oldest dropped first.
    pub events: EventLog,
    flags: BTreeMap<FlagName, bool>,
}

impl Actor {
    /// Create an actor at a tile with no stats.
    pub fn new(name: impl Into<String>, location: TileId) -> Self {
        Self {
            name: name.into(),
            location,
            stats: BTreeMap::new(),
            events: EventLog::bounded(DEFAULT_ACTOR_EVENT_CAPACITY),
            flags: BTreeMap::new(),
        }
    }

    /// Builder: set a stat.
    pub fn with_stat(mut self, stat: impl Into<String>, value: i32) -> Self {
        self.stats.insert(stat.into(), value);
        self
    }

    /// Look up a stat by name (case-insensitive).
    pub fn stat(&self, name: &str) -> Option<i32> {
        self.stats.get(name).copied().or_else(|| {
            self.stats
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| *v)
        })
    }

    /// Read an actor flag; unset flags read as false.
    pub fn flag(&self, name: FlagName) -> bool {
        self.flags.get(&name).copied().unwrap_or(false)
    }

    pub(crate) fn set_flag(
        &mut self,
        name: FlagName,
        value: bool,
        target: &FlagTarget,
    ) -> IsleResult<()> {
        if name.scope() != FlagScope::Actor {
            return Err(IsleError::FlagScopeMismatch {
                flag: name,
                target: target.clone(),
            });
        }
        self.flags.insert(name, value);
        Ok(())
    }
}

/// A human player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player identifier.
    pub id: PlayerId,
    /// Body.
    pub actor: Actor,
}

impl Player {
    /// Create a player at a tile.
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, location: TileId) -> Self {
        Self {
            id: id.into(),
            actor: Actor::new(name, location),
        }
    }

    /// Builder: set a stat.
    pub fn with_stat(mut self, stat: impl Into<String>, value: i32) -> Self {
        self.actor = self.actor.with_stat(stat, value);
        self
    }
}

/// What kind of non-player actor a creature is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatureRole {
    /// The island ghost.
    Ghost,
    /// A member of the monkey troop.
    Monkey,
}

impl CreatureRole {
    /// Parse a role name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ghost" => Some(Self::Ghost),
            "monkey" | "monkeys" => Some(Self::Monkey),
            _ => None,
        }
    }
}

impl fmt::Display for CreatureRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ghost => write!(f, "ghost"),
            Self::Monkey => write!(f, "monkey"),
        }
    }
}

/// A non-player actor with a home and an optional movement target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    /// Creature identifier.
    pub id: CreatureId,
    /// Ghost or monkey.
    pub role: CreatureRole,
    /// Body.
    pub actor: Actor,
    /// Where the creature returns to.
    pub home_tile: TileId,
    target_tile: Option<TileId>,
}

impl Creature {
    /// Create a creature at its home tile.
    pub fn new(
        id: impl Into<CreatureId>,
        role: CreatureRole,
        name: impl Into<String>,
        home_tile: TileId,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            actor: Actor::new(name, home_tile.clone()),
            home_tile,
            target_tile: None,
        }
    }

    /// Builder: set a stat.
    pub fn with_stat(mut self, stat: impl Into<String>, value: i32) -> Self {
        self.actor = self.actor.with_stat(stat, value);
        self
    }

    /// The tile the creature is heading to, if any.
    pub fn target_tile(&self) -> Option<&TileId> {
        self.target_tile.as_ref()
    }

    pub(crate) fn set_target_tile(&mut self, tile: Option<TileId>) {
        self.target_tile = tile;
    }
}

/// A reference to a player or creature.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ActorRef {
    /// A player.
    Player(PlayerId),
    /// A creature.
    Creature(CreatureId),
}

impl ActorRef {
    /// The flag target addressing this actor.
    pub fn flag_target(&self) -> FlagTarget {
        match self {
            Self::Player(id) => FlagTarget::Player(id.clone()),
            Self::Creature(id) => FlagTarget::Creature(id.clone()),
        }
    }
}

impl From<PlayerId> for ActorRef {
    fn from(id: PlayerId) -> Self {
        Self::Player(id)
    }
}

impl From<CreatureId> for ActorRef {
    fn from(id: CreatureId) -> Self {
        Self::Creature(id)
    }
}

impl fmt::Display for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(id) => write!(f, "player:{id}"),
            Self::Creature(id) => write!(f, "creature:{id}"),
        }
    }
}
