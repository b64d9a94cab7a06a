use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorRef, Creature, CreatureRole, Player};
use crate::error::{IsleError, IsleResult};
use crate::event::EventTarget;
use crate::ids::{CreatureId, ItemId, ItemTypeId, PlayerId, TileId};
use crate::item::{ItemInstance, ItemType, Owner};
use crate::session::{FlagName, FlagTarget, Session};
use crate::tile::{Position, Tile};

/// The single mutable root of a game session.
///
/// Collections are ordered maps so that iteration, and everything narrated
/// from it, is reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    session: Session,
    players: BTreeMap<PlayerId, Player>,
    creatures: BTreeMap<CreatureId, Creature>,
    items: BTreeMap<ItemId, ItemInstance>,
    tiles: BTreeMap<TileId, Tile>,
    item_types: BTreeMap<ItemTypeId, ItemType>,
}

impl World {
    /// Create an empty world around a session.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            players: BTreeMap::new(),
            creatures: BTreeMap::new(),
            items: BTreeMap::new(),
            tiles: BTreeMap::new(),
            item_types: BTreeMap::new(),
        }
    }

    /// Session bookkeeping.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable session bookkeeping.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Add a tile.
    pub fn add_tile(&mut self, tile: Tile) -> IsleResult<()> {
        if self.tiles.contains_key(&tile.id) {
            return Err(IsleError::DuplicateId(tile.id.to_string()));
        }
        self.tiles.insert(tile.id.clone(), tile);
        Ok(())
    }

    /// Add an item type template.
    pub fn add_item_type(&mut self, item_type: ItemType) -> IsleResult<()> {
        if self.item_types.contains_key(&item_type.id) {
            return Err(IsleError::DuplicateId(item_type.id.to_string()));
        }
        self.item_types.insert(item_type.id.clone(), item_type);
        Ok(())
    }

    /// Add a player. Its tile must exist.
    pub fn add_player(&mut self, player: Player) -> IsleResult<()> {
        if self.players.contains_key(&player.id) {
            return Err(IsleError::DuplicateId(player.id.to_string()));
        }
        self.require_tile(&player.actor.location)?;
        self.players.insert(player.id.clone(), player);
        Ok(())
    }

    /// Add a creature. Its current and home tiles must exist.
    pub fn add_creature(&mut self, creature: Creature) -> IsleResult<()> {
        if self.creatures.contains_key(&creature.id) {
            return Err(IsleError::DuplicateId(creature.id.to_string()));
        }
        self.require_tile(&creature.actor.location)?;
        self.require_tile(&creature.home_tile)?;
        self.creatures.insert(creature.id.clone(), creature);
        Ok(())
    }

    /// Add an item instance. Its type and owner must exist.
    pub fn add_item(&mut self, item: ItemInstance) -> IsleResult<()> {
        if self.items.contains_key(&item.id) {
            return Err(IsleError::DuplicateId(item.id.to_string()));
        }
        if !self.item_types.contains_key(&item.item_type) {
            return Err(IsleError::ItemTypeNotFound(item.item_type.clone()));
        }
        if let Owner::Item(container) = item.owner() {
            if *container == item.id {
                return Err(IsleError::ContainmentCycle {
                    item: item.id.clone(),
                    container: container.clone(),
                });
            }
        }
        if !self.owner_exists(item.owner()) {
            return Err(IsleError::OwnerNotFound(item.owner().clone()));
        }
        self.items.insert(item.id.clone(), item);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Get a player.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// Get a creature.
    pub fn creature(&self, id: &CreatureId) -> Option<&Creature> {
        self.creatures.get(id)
    }

    /// Get an item instance.
    pub fn item(&self, id: &ItemId) -> Option<&ItemInstance> {
        self.items.get(id)
    }

    /// Get a tile.
    pub fn tile(&self, id: &TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    /// Get an item type.
    pub fn item_type(&self, id: &ItemTypeId) -> Option<&ItemType> {
        self.item_types.get(id)
    }

    /// The type template of an item instance.
    pub fn item_type_of(&self, item: &ItemId) -> Option<&ItemType> {
        self.items
            .get(item)
            .and_then(|i| self.item_types.get(&i.item_type))
    }

    /// All players in id order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// All creatures in id order.
    pub fn creatures(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.values()
    }

    /// Creatures of one role, in id order.
    pub fn creatures_with_role(&self, role: CreatureRole) -> impl Iterator<Item = &Creature> {
        self.creatures.values().filter(move |c| c.role == role)
    }

    /// All item instances in id order.
    pub fn items(&self) -> impl Iterator<Item = &ItemInstance> {
        self.items.values()
    }

    /// All tiles in id order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// The body of a player or creature.
    pub fn actor(&self, actor: &ActorRef) -> Option<&Actor> {
        match actor {
            ActorRef::Player(id) => self.players.get(id).map(|p| &p.actor),
            ActorRef::Creature(id) => self.creatures.get(id).map(|c| &c.actor),
        }
    }

    fn actor_mut(&mut self, actor: &ActorRef) -> Option<&mut Actor> {
        match actor {
            ActorRef::Player(id) => self.players.get_mut(id).map(|p| &mut p.actor),
            ActorRef::Creature(id) => self.creatures.get_mut(id).map(|c| &mut c.actor),
        }
    }

    /// A stat of an actor, if both exist.
    pub fn stat(&self, actor: &ActorRef, stat: &str) -> Option<i32> {
        self.actor(actor).and_then(|a| a.stat(stat))
    }

    /// Whether an owner refers to an existing entity.
    pub fn owner_exists(&self, owner: &Owner) -> bool {
        match owner {
            Owner::Tile(id) => self.tiles.contains_key(id),
            Owner::Player(id) => self.players.contains_key(id),
            Owner::Creature(id) => self.creatures.contains_key(id),
            Owner::Item(id) => self.items.contains_key(id),
        }
    }

    /// Items directly owned by `owner` (not nested deeper).
    pub fn items_owned_by<'a>(&'a self, owner: &'a Owner) -> impl Iterator<Item = &'a ItemInstance> {
        self.items.values().filter(move |i| i.owner() == owner)
    }

    /// Items carried directly by an actor.
    pub fn carried_by(&self, actor: &ActorRef) -> Vec<&ItemInstance> {
        let owner = Owner::from(actor.clone());
        self.items.values().filter(|i| *i.owner() == owner).collect()
    }

    /// Items nested directly inside an item.
    pub fn contents_of(&self, container: &ItemId) -> Vec<&ItemInstance> {
        self.items
            .values()
            .filter(|i| i.contained_by() == Some(container))
            .collect()
    }

    /// Tile at a grid position.
    pub fn tile_at(&self, position: Position) -> Option<&Tile> {
        self.tiles.values().find(|t| t.position == position)
    }

    /// Tiles one king-move away, in id order.
    pub fn neighbours(&self, tile: &TileId) -> Vec<&Tile> {
        let Some(origin) = self.tiles.get(tile) else {
            return Vec::new();
        };
        self.tiles
            .values()
            .filter(|t| t.position.is_adjacent(origin.position))
            .collect()
    }

    /// The neighbouring tile that brings `from` closest to `to`.
    ///
    /// Returns `None` when already there, when either tile is unknown, or
    /// when no neighbour is closer than the current tile.
    pub fn next_step_toward(&self, from: &TileId, to: &TileId) -> Option<TileId> {
        if from == to {
            return None;
        }
        let origin = self.tiles.get(from)?;
        let goal = self.tiles.get(to)?;
        let current = origin.position.distance(goal.position);
        self.neighbours(from)
            .into_iter()
            .map(|t| (t.position.distance(goal.position), t))
            .filter(|(d, _)| *d < current)
            .min_by_key(|(d, _)| *d)
            .map(|(_, t)| t.id.clone())
    }

    /// Read a flag on any target. `None` when the target does not exist.
    pub fn flag(&self, target: &FlagTarget, name: FlagName) -> Option<bool> {
        match target {
            FlagTarget::Session => Some(self.session.flag(name)),
            FlagTarget::Player(id) => self.players.get(id).map(|p| p.actor.flag(name)),
            FlagTarget::Creature(id) => self.creatures.get(id).map(|c| c.actor.flag(name)),
        }
    }

    // -----------------------------------------------------------------------
    // Validated mutation
    // -----------------------------------------------------------------------

    /// Move a player to a tile.
    pub fn move_player(&mut self, player: &PlayerId, to: &TileId) -> IsleResult<()> {
        self.require_tile(to)?;
        let p = self
            .players
            .get_mut(player)
            .ok_or_else(|| IsleError::PlayerNotFound(player.clone()))?;
        p.actor.location = to.clone();
        Ok(())
    }

    /// Move a creature to a tile. Reaching the target clears it.
    pub fn move_creature(&mut self, creature: &CreatureId, to: &TileId) -> IsleResult<()> {
        self.require_tile(to)?;
        let c = self
            .creatures
            .get_mut(creature)
            .ok_or_else(|| IsleError::CreatureNotFound(creature.clone()))?;
        c.actor.location = to.clone();
        if c.target_tile() == Some(to) {
            c.set_target_tile(None);
        }
        Ok(())
    }

    /// Set or clear a creature's movement target.
    pub fn set_creature_target(
        &mut self,
        creature: &CreatureId,
        tile: Option<TileId>,
    ) -> IsleResult<()> {
        if let Some(t) = &tile {
            self.require_tile(t)?;
        }
        let c = self
            .creatures
            .get_mut(creature)
            .ok_or_else(|| IsleError::CreatureNotFound(creature.clone()))?;
        c.set_target_tile(tile);
        Ok(())
    }

    /// Rewrite an item's owner.
    ///
    /// The new owner must exist, and nesting may not create a cycle.
    pub fn transfer_item(&mut self, item: &ItemId, owner: Owner) -> IsleResult<()> {
        if !self.items.contains_key(item) {
            return Err(IsleError::ItemNotFound(item.clone()));
        }
        if !self.owner_exists(&owner) {
            return Err(IsleError::OwnerNotFound(owner));
        }
        if let Owner::Item(container) = &owner {
            if self.is_within(container, item) {
                return Err(IsleError::ContainmentCycle {
                    item: item.clone(),
                    container: container.clone(),
                });
            }
        }
        if let Some(instance) = self.items.get_mut(item) {
            instance.set_owner(owner);
        }
        Ok(())
    }

    /// Set a flag on a target. Setting an already-set value is a no-op.
    pub fn set_flag(&mut self, target: &FlagTarget, name: FlagName, value: bool) -> IsleResult<()> {
        match target {
            FlagTarget::Session => self.session.set_flag(name, value),
            FlagTarget::Player(id) => self
                .players
                .get_mut(id)
                .ok_or_else(|| IsleError::PlayerNotFound(id.clone()))?
                .actor
                .set_flag(name, value, target),
            FlagTarget::Creature(id) => self
                .creatures
                .get_mut(id)
                .ok_or_else(|| IsleError::CreatureNotFound(id.clone()))?
                .actor
                .set_flag(name, value, target),
        }
    }

    /// Append an entry to a tile or actor event log, stamped with the current turn.
    pub fn record_event(&mut self, target: &EventTarget, text: impl Into<String>) -> IsleResult<()> {
        let turn = self.session.turn();
        match target {
            EventTarget::Tile(id) => {
                self.tiles
                    .get_mut(id)
                    .ok_or_else(|| IsleError::TileNotFound(id.clone()))?
                    .events
                    .push(turn, text);
            }
            EventTarget::Player(id) => {
                self.actor_mut(&ActorRef::Player(id.clone()))
                    .ok_or_else(|| IsleError::PlayerNotFound(id.clone()))?
                    .events
                    .push(turn, text);
            }
            EventTarget::Creature(id) => {
                self.actor_mut(&ActorRef::Creature(id.clone()))
                    .ok_or_else(|| IsleError::CreatureNotFound(id.clone()))?
                    .events
                    .push(turn, text);
            }
        }
        Ok(())
    }

    /// Replace a tile's remembered note.
    pub fn set_tile_note(&mut self, tile: &TileId, note: Option<String>) -> IsleResult<()> {
        self.tiles
            .get_mut(tile)
            .ok_or_else(|| IsleError::TileNotFound(tile.clone()))?
            .context
            .note = note;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Serialize the whole world as JSON.
    pub fn to_json(&self) -> IsleResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a world from JSON.
    pub fn from_json(json: &str) -> IsleResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn require_tile(&self, tile: &TileId) -> IsleResult<()> {
        if self.tiles.contains_key(tile) {
            Ok(())
        } else {
            Err(IsleError::TileNotFound(tile.clone()))
        }
    }

    /// Whether `candidate` is `ancestor` or nested (transitively) inside it.
    fn is_within(&self, candidate: &ItemId, ancestor: &ItemId) -> bool {
        let mut current = Some(candidate.clone());
        // Bounded walk: a chain can be at most as long as the item count.
        for _ in 0..=self.items.len() {
            match current {
                Some(ref id) if id == ancestor => return true,
                Some(ref id) => {
                    current = self.items.get(id).and_then(|i| i.contained_by().cloned());
                }
                None => return false,
            }
        }
        false
    }
}
