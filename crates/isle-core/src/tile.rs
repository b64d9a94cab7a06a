//! Map tiles.

use serde::{Deserialize, Serialize};

use crate::event::EventLog;
use crate::ids::TileId;

/// Grid position of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Position {
    /// Create a position.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev (king-move) distance.
    pub fn distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Whether `other` is one king-move away.
    pub fn is_adjacent(self, other: Position) -> bool {
        self.distance(other) == 1
    }
}

/// Mutable narrative context of a tile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileContext {
    /// Current description.
    pub description: String,
    /// A remembered note, e.g. "the sand here was disturbed".
    pub note: Option<String>,
}

/// A single map tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Tile identifier.
    pub id: TileId,
    /// Grid position.
    pub position: Position,
    /// Biome, e.g. `beach`, `jungle`.
    pub biome: String,
    /// Larger region the tile belongs to.
    pub region: String,
    /// Narrative context.
    pub context: TileContext,
    /// Append-only event log.
    pub events: EventLog,
}

impl Tile {
    /// Create a tile with an empty context.
    pub fn new(id: impl Into<TileId>, position: Position, biome: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position,
            biome: biome.into(),
            region: String::new(),
            context: TileContext::default(),
            events: EventLog::unbounded(),
        }
    }

    /// Builder: set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Builder: set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.context.description = description.into();
        self
    }
}
