use crate::ids::{CreatureId, ItemId, ItemTypeId, PlayerId, TileId};
use crate::item::Owner;
use crate::session::{FlagName, FlagTarget};

/// Alias for `Result<T, IsleError>`.
pub type IsleResult<T> = Result<T, IsleError>;

/// Errors that can occur when manipulating a world.
#[derive(Debug, thiserror::Error)]
pub enum IsleError {
    /// The requested tile does not exist.
    #[error("tile not found: {0}")]
    TileNotFound(TileId),

    /// The requested player does not exist.
    #[error("player not found: {0}")]
    PlayerNotFound(PlayerId),

    /// The requested creature does not exist.
    #[error("creature not found: {0}")]
    CreatureNotFound(CreatureId),

    /// The requested item instance does not exist.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// The requested item type does not exist.
    #[error("item type not found: {0}")]
    ItemTypeNotFound(ItemTypeId),

    /// An owner refers to something that does not exist.
    #[error("owner not found: {0}")]
    OwnerNotFound(Owner),

    /// Something with the same identifier already exists.
    #[error("duplicate id: \"{0}\"")]
    DuplicateId(String),

    /// Nesting the item would make it contain itself.
    #[error("item {item} cannot be placed inside {container}: containment cycle")]
    ContainmentCycle {
        /// The item being moved.
        item: ItemId,
        /// The requested container.
        container: ItemId,
    },

    /// The flag does not belong on that target.
    #[error("flag {flag} cannot be set on {target}")]
    FlagScopeMismatch {
        /// The flag.
        flag: FlagName,
        /// The rejected target.
        target: FlagTarget,
    },

    /// World snapshot could not be (de)serialized.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}
