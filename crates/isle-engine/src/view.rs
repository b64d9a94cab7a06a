//! What a creature can see when it decides.

use isle_core::{
    ActorRef, CreatureId, CreatureRole, ItemId, LoggedEvent, Owner, PlayerId, TileId, TimePhase,
    World,
};
use isle_mechanics::CheckResult;
use serde::{Deserialize, Serialize};

/// An item as a creature perceives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSighting {
    /// Item instance.
    pub id: ItemId,
    /// Display name of its type.
    pub name: String,
    /// Type tags such as `bait`.
    pub tags: Vec<String>,
}

/// A player as a creature perceives them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSighting {
    /// The player.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Where they stand.
    pub location: TileId,
    /// Tiles between the creature and the player.
    pub distance: u32,
    /// What they carry.
    pub carrying: Vec<ItemSighting>,
}

/// The creature-specific world snapshot handed to a [`CreatureMind`](crate::CreatureMind).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorView {
    /// The deciding creature.
    pub creature: CreatureId,
    /// Its role.
    pub role: CreatureRole,
    /// Display name.
    pub name: String,
    /// Current tile.
    pub location: TileId,
    /// Home tile.
    pub home_tile: TileId,
    /// Current movement target.
    pub target_tile: Option<TileId>,
    /// Turn number.
    pub turn: u32,
    /// Time of day.
    pub phase: TimePhase,
    /// Items the creature carries.
    pub carrying: Vec<ItemSighting>,
    /// Items lying on the creature's tile.
    pub nearby_items: Vec<ItemSighting>,
    /// Every player, nearest first.
    pub players: Vec<PlayerSighting>,
    /// The creature's own recent memory.
    pub recent_events: Vec<LoggedEvent>,
    /// Recent checks anywhere in the session.
    pub recent_checks: Vec<CheckResult>,
}

impl ActorView {
    /// Build the view for one creature. `None` if it does not exist.
    pub fn build<'a>(
        world: &World,
        creature: &CreatureId,
        recent_checks: impl IntoIterator<Item = &'a CheckResult>,
    ) -> Option<Self> {
        let c = world.creature(creature)?;
        let here = world.tile(&c.actor.location).map(|t| t.position);

        let mut players: Vec<PlayerSighting> = world
            .players()
            .map(|p| {
                let distance = match (here, world.tile(&p.actor.location)) {
                    (Some(a), Some(b)) => a.distance(b.position),
                    _ => u32::MAX,
                };
                PlayerSighting {
                    id: p.id.clone(),
                    name: p.actor.name.clone(),
                    location: p.actor.location.clone(),
                    distance,
                    carrying: sightings(world, &Owner::from(ActorRef::Player(p.id.clone()))),
                }
            })
            .collect();
        players.sort_by(|a, b| a.distance.cmp(&b.distance).then_with(|| a.id.cmp(&b.id)));

        Some(Self {
            creature: c.id.clone(),
            role: c.role,
            name: c.actor.name.clone(),
            location: c.actor.location.clone(),
            home_tile: c.home_tile.clone(),
            target_tile: c.target_tile().cloned(),
            turn: world.session().turn(),
            phase: world.session().phase(),
            carrying: sightings(world, &Owner::Creature(c.id.clone())),
            nearby_items: sightings(world, &Owner::Tile(c.actor.location.clone())),
            players,
            recent_events: c.actor.events.entries().cloned().collect(),
            recent_checks: recent_checks.into_iter().cloned().collect(),
        })
    }

    /// The view as JSON, for prompting external minds.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn sightings(world: &World, owner: &Owner) -> Vec<ItemSighting> {
    world
        .items_owned_by(owner)
        .map(|item| {
            let item_type = world.item_type(&item.item_type);
            ItemSighting {
                id: item.id.clone(),
                name: item_type.map_or_else(|| item.id.to_string(), |t| t.name.clone()),
                tags: item_type
                    .map(|t| t.tags.iter().cloned().collect())
                    .unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use isle_core::{Creature, ItemInstance, ItemType, Player, Position, Session, SessionId, Tile};

    fn world() -> World {
        let mut world = World::new(Session::new(SessionId::from_uuid(uuid::Uuid::nil()), 20));
        for (id, x) in [("grove", 0), ("beach", 1), ("cliff", 3)] {
            world
                .add_tile(Tile::new(id, Position::new(x, 0), "jungle"))
                .unwrap();
        }
        world
            .add_item_type(ItemType::new("banana", "Banana").with_tag("bait"))
            .unwrap();
        world
            .add_player(Player::new("far", "Sam", TileId::new("cliff")))
            .unwrap();
        world
            .add_player(Player::new("near", "Robin", TileId::new("beach")))
            .unwrap();
        world
            .add_creature(Creature::new(
                "m1",
                CreatureRole::Monkey,
                "Monkey",
                TileId::new("grove"),
            ))
            .unwrap();
        world
            .add_item(ItemInstance::new(
                "b1",
                "banana",
                Owner::Player(PlayerId::new("near")),
            ))
            .unwrap();
        world
    }

    #[test]
    fn players_sorted_nearest_first() {
        let world = world();
        let view = ActorView::build(&world, &CreatureId::new("m1"), []).unwrap();
        let ids: Vec<&str> = view.players.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far"]);
        assert_eq!(view.players[0].distance, 1);
        assert_eq!(view.players[0].carrying[0].tags, vec!["bait".to_string()]);
    }

    #[test]
    fn unknown_creature_has_no_view() {
        assert!(ActorView::build(&world(), &CreatureId::new("ghost"), []).is_none());
    }

    #[test]
    fn view_serializes() {
        let world = world();
        let view = ActorView::build(&world, &CreatureId::new("m1"), []).unwrap();
        let json = view.to_json().unwrap();
        assert!(json.contains("\"role\":\"monkey\""));
    }
}
