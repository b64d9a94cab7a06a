//! Shared island fixture for engine integration tests.

#![allow(dead_code)]

use isle_core::{
    Creature, CreatureId, CreatureRole, ItemId, ItemInstance, ItemType, Owner, Player, PlayerId,
    Position, Session, SessionId, Tile, TileId, World,
};

/// A strip of four tiles: crypt, beach, grove, palms (west to east).
///
/// Robin (p1) stands in the crypt next to a skeleton holding a ring and a
/// locket, and carries a banana and a knife. The ghost haunts the palms and
/// the monkey lives in the grove.
pub fn island() -> World {
    let mut world = World::new(Session::new(SessionId::from_uuid(uuid::Uuid::nil()), 30));
    for (id, x, biome) in [
        ("crypt", 0, "cave"),
        ("beach", 1, "beach"),
        ("grove", 2, "jungle"),
        ("palms", 3, "jungle"),
    ] {
        world
            .add_tile(Tile::new(id, Position::new(x, 0), biome))
            .unwrap();
    }
    world
        .add_item_type(ItemType::new("skeleton", "Skeleton").with_hook("move_skeleton"))
        .unwrap();
    world
        .add_item_type(ItemType::new("trinket", "Trinket"))
        .unwrap();
    world
        .add_item_type(ItemType::new("banana", "Banana").with_tag("bait"))
        .unwrap();
    world.add_item_type(ItemType::new("knife", "Knife")).unwrap();

    world
        .add_player(
            Player::new("p1", "Robin", tile("crypt"))
                .with_stat("AWR", 2)
                .with_stat("AGI", 1),
        )
        .unwrap();
    world
        .add_creature(Creature::new("g1", CreatureRole::Ghost, "Ghost", tile("palms")))
        .unwrap();
    world
        .add_creature(Creature::new("m1", CreatureRole::Monkey, "Monkey", tile("grove")))
        .unwrap();

    world
        .add_item(ItemInstance::new("bones", "skeleton", Owner::Tile(tile("crypt"))))
        .unwrap();
    for id in ["ring", "locket"] {
        world
            .add_item(ItemInstance::new(id, "trinket", Owner::Item(item("bones"))))
            .unwrap();
    }
    world
        .add_item(ItemInstance::new("banana1", "banana", Owner::Player(p1())))
        .unwrap();
    world
        .add_item(ItemInstance::new("knife1", "knife", Owner::Player(p1())))
        .unwrap();
    world
}

pub fn p1() -> PlayerId {
    PlayerId::new("p1")
}

pub fn tile(id: &str) -> TileId {
    TileId::new(id)
}

pub fn item(id: &str) -> ItemId {
    ItemId::new(id)
}

pub fn creature(id: &str) -> CreatureId {
    CreatureId::new(id)
}
