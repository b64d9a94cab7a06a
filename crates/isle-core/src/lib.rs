//! Core world state for the island survival engine.
//!
//! A [`World`] owns the session bookkeeping, every player and creature, the
//! item instances and their static item types, and the tile map. It is the
//! single mutable root of a game session; higher layers change it only
//! through the validated mutators defined here.

/// Actors: players, creatures, and references to either.
pub mod actor;
/// Error types used throughout the crate.
pub mod error;
/// Bounded and append-only event logs.
pub mod event;
/// Identifier newtypes.
pub mod ids;
/// Item types, item instances, and ownership.
pub mod item;
/// Session bookkeeping: turn counter, time phase, and flags.
pub mod session;
/// Map tiles and positions.
pub mod tile;
/// The world state root.
pub mod world;

/// Re-export actor types.
pub use actor::{Actor, ActorRef, Creature, CreatureRole, Player};
/// Re-export error types.
pub use error::{IsleError, IsleResult};
/// Re-export event log types.
pub use event::{EventLog, EventTarget, LoggedEvent};
/// Re-export identifier types.
pub use ids::{CreatureId, HookId, ItemId, ItemTypeId, PlayerId, SessionId, TileId};
/// Re-export item types.
pub use item::{ItemInstance, ItemType, Owner, OwnerKind};
/// Re-export session types.
pub use session::{FlagName, FlagScope, FlagTarget, Session, TimePhase};
/// Re-export tile types.
pub use tile::{Position, Tile, TileContext};
/// Re-export the world root.
pub use world::World;
