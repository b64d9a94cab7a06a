mod common;

use std::sync::Arc;

use common::{creature, island, item, p1, tile};
use isle_core::{CreatureRole, Owner};
use isle_engine::{
    CollaboratorError, CreatureMind, DirectorReply, EngineConfig, ScriptedDirector, ScriptedMind,
    ToolCall, TurnEngine,
};
use isle_mechanics::{CheckType, ScriptedDice};
use serde_json::json;

fn call(name: &str, arguments: serde_json::Value) -> Option<ToolCall> {
    Some(ToolCall::new(name, arguments))
}

fn engine_with(
    role: CreatureRole,
    mind: impl CreatureMind + 'static,
    roll: u32,
) -> TurnEngine<ScriptedDice> {
    TurnEngine::with_dice(
        EngineConfig::default(),
        ScriptedDice::new([roll]),
        ScriptedDirector::default(),
    )
    .unwrap()
    .with_mind(role, mind)
}

#[test]
fn monkey_takes_bait_without_a_contest() {
    let mut world = island();
    world.move_player(&p1(), &tile("grove")).unwrap();
    let mind = ScriptedMind::new([call("steal", json!({"player": "p1"}))]);
    let mut engine = engine_with(CreatureRole::Monkey, mind, 20);

    let report = engine.run_creature_turn(&mut world, CreatureRole::Monkey);

    assert!(report.checks.is_empty());
    assert_eq!(
        world.item(&item("banana1")).unwrap().owner(),
        &Owner::Creature(creature("m1"))
    );
    let memory = world.player(&p1()).unwrap().actor.events.latest().unwrap();
    assert!(memory.text.contains("stole the banana"));
}

#[test]
fn victim_notices_non_bait_theft() {
    let mut world = island();
    world.move_player(&p1(), &tile("grove")).unwrap();
    world
        .transfer_item(&item("banana1"), Owner::Tile(tile("crypt")))
        .unwrap();
    let mind = ScriptedMind::new([call("steal", json!({"player": "p1"}))]);
    let mut engine = engine_with(CreatureRole::Monkey, mind, 20);

    let report = engine.run_creature_turn(&mut world, CreatureRole::Monkey);

    assert_eq!(report.checks.len(), 1);
    assert_eq!(report.checks[0].check_type, CheckType::Perception);
    assert!(report.checks[0].success);
    assert_eq!(
        world.item(&item("knife1")).unwrap().owner(),
        &Owner::Player(p1())
    );
    assert_eq!(engine.recent_check_results().len(), 1);
}

#[test]
fn following_monkey_closes_one_tile_per_turn() {
    let mind = Arc::new(ScriptedMind::new([
        call("follow", json!({"player": "p1"})),
        call("follow", json!({"player": "p1"})),
    ]));
    let mut engine = engine_with(CreatureRole::Monkey, Arc::clone(&mind), 10);
    let mut world = island();

    engine.run_creature_turn(&mut world, CreatureRole::Monkey);
    assert_eq!(
        world.creature(&creature("m1")).unwrap().actor.location,
        tile("beach")
    );

    engine.run_creature_turn(&mut world, CreatureRole::Monkey);
    let monkey = world.creature(&creature("m1")).unwrap();
    assert_eq!(monkey.actor.location, tile("crypt"));
    assert_eq!(monkey.target_tile(), None);

    mind.push(call("return_home", json!({})));
    engine.run_creature_turn(&mut world, CreatureRole::Monkey);
    assert_eq!(
        world.creature(&creature("m1")).unwrap().target_tile(),
        Some(&tile("grove"))
    );
}

#[test]
fn monkey_throws_what_it_carries() {
    let mut world = island();
    world
        .transfer_item(&item("knife1"), Owner::Creature(creature("m1")))
        .unwrap();
    let mind = ScriptedMind::new([call("throw", json!({"tile": "beach"}))]);
    let mut engine = engine_with(CreatureRole::Monkey, mind, 10);

    let report = engine.run_creature_turn(&mut world, CreatureRole::Monkey);

    assert_eq!(
        world.item(&item("knife1")).unwrap().owner(),
        &Owner::Tile(tile("beach"))
    );
    assert_eq!(report.narration[0], "Monkey throws the knife toward beach.");
}

#[test]
fn awakened_ghost_acts_after_the_player() {
    let director = ScriptedDirector::new([DirectorReply::default().with_call(ToolCall::new(
        "run_item_hook",
        json!({"hook": "move_skeleton", "item": "bones"}),
    ))]);
    let ghost = ScriptedMind::new([call("set_target_tile", json!({"tile": "crypt"}))]);
    let mut engine =
        TurnEngine::with_dice(EngineConfig::default(), ScriptedDice::new([10]), director)
            .unwrap()
            .with_mind(CreatureRole::Ghost, ghost);
    let mut world = island();

    let decision = engine.run_player_turn(&mut world, &p1(), "drag the bones").unwrap();

    assert_eq!(
        decision.creature_narration,
        vec![
            "Ghost heads toward crypt.".to_string(),
            "Ghost moves to grove.".to_string()
        ]
    );
    assert_eq!(
        world.creature(&creature("g1")).unwrap().actor.location,
        tile("grove")
    );
}

#[test]
fn ghost_check_is_observational() {
    let ghost = ScriptedMind::new([call(
        "request_check",
        json!({
            "check_type": "INTIMIDATION",
            "subject_kind": "player",
            "subject_id": "p1",
            "difficulty": 30
        }),
    )]);
    let mut engine = engine_with(CreatureRole::Ghost, ghost, 10);
    let mut world = island();
    let before = world.clone();

    let report = engine.run_creature_turn(&mut world, CreatureRole::Ghost);

    assert_eq!(report.checks.len(), 1);
    assert!(!report.checks[0].success);
    assert_eq!(world, before);
}

#[test]
fn failing_mind_degrades_to_silence() {
    let mind = ScriptedMind::default();
    mind.push_error(CollaboratorError::Unavailable("offline".to_string()));
    let mut engine = engine_with(CreatureRole::Monkey, mind, 10);
    let mut world = island();

    let report = engine.run_creature_turn(&mut world, CreatureRole::Monkey);

    assert!(report.narration.is_empty());
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.creatures, vec![creature("m1")]);
}
