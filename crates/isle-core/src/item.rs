//! Item types, item instances, and ownership.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actor::ActorRef;
use crate::ids::{CreatureId, HookId, ItemId, ItemTypeId, PlayerId, TileId};

/// Static template data shared by item instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemType {
    /// Type identifier.
    pub id: ItemTypeId,
    /// Display name.
    pub name: String,
    /// Static tags such as `bait`.
    pub tags: BTreeSet<String>,
    /// Hook reacting to verbs applied to instances of this type.
    pub hook: Option<HookId>,
}

impl ItemType {
    /// Create an untagged item type without a hook.
    pub fn new(id: impl Into<ItemTypeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tags: BTreeSet::new(),
            hook: None,
        }
    }

    /// Builder: add a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Builder: attach a hook.
    pub fn with_hook(mut self, hook: impl Into<HookId>) -> Self {
        self.hook = Some(hook.into());
        self
    }

    /// Whether the type carries a tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// The kind of an owner, without its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    /// Lying on a tile.
    Tile,
    /// Carried by a player.
    Player,
    /// Carried by a creature.
    Creature,
    /// Nested inside another item.
    Item,
}

impl OwnerKind {
    /// Parse an owner kind (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tile" => Some(Self::Tile),
            "player" => Some(Self::Player),
            "creature" => Some(Self::Creature),
            "item" => Some(Self::Item),
            _ => None,
        }
    }
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tile => write!(f, "tile"),
            Self::Player => write!(f, "player"),
            Self::Creature => write!(f, "creature"),
            Self::Item => write!(f, "item"),
        }
    }
}

/// The single owner of an item instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Owner {
    /// Lying on a tile.
    Tile(TileId),
    /// Carried by a player.
    Player(PlayerId),
    /// Carried by a creature.
    Creature(CreatureId),
    /// Nested inside another item.
    Item(ItemId),
}

impl Owner {
    /// Build an owner from a kind and a raw identifier.
    pub fn from_parts(kind: OwnerKind, id: impl Into<String>) -> Self {
        let id = id.into();
        match kind {
            OwnerKind::Tile => Self::Tile(TileId::new(id)),
            OwnerKind::Player => Self::Player(PlayerId::new(id)),
            OwnerKind::Creature => Self::Creature(CreatureId::new(id)),
            OwnerKind::Item => Self::Item(ItemId::new(id)),
        }
    }

    /// The owner's kind.
    pub fn kind(&self) -> OwnerKind {
        match self {
            Self::Tile(_) => OwnerKind::Tile,
            Self::Player(_) => OwnerKind::Player,
            Self::Creature(_) => OwnerKind::Creature,
            Self::Item(_) => OwnerKind::Item,
        }
    }
}

impl From<ActorRef> for Owner {
    fn from(actor: ActorRef) -> Self {
        match actor {
            ActorRef::Player(id) => Self::Player(id),
            ActorRef::Creature(id) => Self::Creature(id),
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tile(id) => write!(f, "tile:{id}"),
            Self::Player(id) => write!(f, "player:{id}"),
            Self::Creature(id) => write!(f, "creature:{id}"),
            Self::Item(id) => write!(f, "item:{id}"),
        }
    }
}

/// A concrete item in the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInstance {
    /// Instance identifier.
    pub id: ItemId,
    /// Template this instance was made from.
    pub item_type: ItemTypeId,
    owner: Owner,
}

impl ItemInstance {
    /// Create an item instance with an initial owner.
    pub fn new(id: impl Into<ItemId>, item_type: impl Into<ItemTypeId>, owner: Owner) -> Self {
        Self {
            id: id.into(),
            item_type: item_type.into(),
            owner,
        }
    }

    /// The current owner.
    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    /// The containing item, when nested.
    pub fn contained_by(&self) -> Option<&ItemId> {
        match &self.owner {
            Owner::Item(id) => Some(id),
            _ => None,
        }
    }

    pub(crate) fn set_owner(&mut self, owner: Owner) {
        self.owner = owner;
    }
}
