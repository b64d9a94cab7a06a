mod common;

use std::sync::Arc;

use common::{island, item, p1, tile};
use isle_core::{FlagName, Owner, TimePhase};
use isle_engine::{
    ControlSignal, DirectorReply, EngineConfig, EngineError, InMemorySessionRepository,
    PhaseSchedule, ScriptedDirector, SessionRepository, ToolCall, TurnEngine,
};
use isle_mechanics::ScriptedDice;
use serde_json::json;

fn push_skeleton() -> DirectorReply {
    DirectorReply::narrate("You heave the skeleton aside.").with_call(ToolCall::new(
        "run_item_hook",
        json!({"hook": "move_skeleton", "item": "bones", "verb": "push"}),
    ))
}

fn perception() -> DirectorReply {
    DirectorReply::narrate("You scan the treeline.").with_call(ToolCall::new(
        "check",
        json!({"check_type": "PERCEPTION", "difficulty": 12}),
    ))
}

#[test]
fn moving_the_skeleton_wakes_the_ghost() {
    let director = ScriptedDirector::new([push_skeleton()]);
    let mut engine = TurnEngine::new(EngineConfig::default().with_seed(7), director).unwrap();
    let mut world = island();

    let decision = engine
        .run_player_turn(&mut world, &p1(), "push the skeleton")
        .unwrap();

    assert_eq!(decision.turn, 1);
    assert!(decision.diagnostics.is_empty(), "{:?}", decision.diagnostics);
    assert_eq!(decision.narration[0], "You heave the skeleton aside.");
    assert!(
        decision
            .narration
            .contains(&"A cold wind moves through the trees.".to_string())
    );
    assert!(world.session().flag(FlagName::GhostAwakened));
    for trinket in ["ring", "locket"] {
        assert_eq!(
            world.item(&item(trinket)).unwrap().owner(),
            &Owner::Tile(tile("crypt"))
        );
    }
    assert_eq!(world.tile(&tile("crypt")).unwrap().events.len(), 1);
    assert_eq!(
        world.player(&p1()).unwrap().actor.events.latest().unwrap().turn,
        0
    );
}

#[test]
fn empty_decision_still_advances_one_turn() {
    let mut engine = TurnEngine::new(EngineConfig::default(), ScriptedDirector::default()).unwrap();
    let mut world = island();
    let before = world.clone();

    let decision = engine.run_player_turn(&mut world, &p1(), "wait").unwrap();

    assert_eq!(decision.turn, 1);
    assert_eq!(world.session().turn(), 1);
    assert!(decision.check_results.is_empty());
    assert_eq!(world.players().count(), before.players().count());
    assert_eq!(
        world.player(&p1()).unwrap(),
        before.player(&p1()).unwrap()
    );
}

#[test]
fn quit_leaves_world_untouched() {
    let mut engine = TurnEngine::new(EngineConfig::default(), ScriptedDirector::default()).unwrap();
    let mut world = island();
    let err = engine.run_player_turn(&mut world, &p1(), "quit").unwrap_err();
    assert!(matches!(err, EngineError::ControlSignal(ControlSignal::Quit)));
    assert_eq!(world, island());
}

#[test]
fn same_seed_same_story() {
    let play = || {
        let director = ScriptedDirector::new([perception(), push_skeleton(), perception()]);
        let config = EngineConfig::default().with_seed(1234);
        let mut engine = TurnEngine::new(config, director).unwrap();
        let mut world = island();
        let mut narration = Vec::new();
        let mut rolls = Vec::new();
        for input in ["look", "push", "look"] {
            let decision = engine.run_player_turn(&mut world, &p1(), input).unwrap();
            narration.extend(decision.narration);
            rolls.extend(decision.check_results.iter().map(|c| (c.roll, c.total, c.success)));
        }
        (narration, rolls, world.to_json().unwrap())
    };

    let first = play();
    let second = play();
    assert_eq!(first.0, second.0);
    assert_eq!(first.1, second.1);
    assert_eq!(first.1.len(), 2);
    assert_eq!(first.2, second.2);
}

#[test]
fn setting_a_flag_twice_is_harmless() {
    let set = ToolCall::new("set_flag", json!({"flag": "signalFireLit"}));
    let reply = DirectorReply::default()
        .with_call(set.clone())
        .with_call(set);
    let mut engine =
        TurnEngine::new(EngineConfig::default(), ScriptedDirector::new([reply])).unwrap();
    let mut world = island();

    let decision = engine.run_player_turn(&mut world, &p1(), "light the fire").unwrap();

    assert!(decision.diagnostics.is_empty());
    assert!(world.session().flag(FlagName::SignalFireLit));
    assert_eq!(decision.narration.len(), 2);
}

#[test]
fn malformed_reply_is_a_no_op() {
    let reply = DirectorReply::narrate("You walk to the beach.")
        .with_call(ToolCall::new("move_player", json!({"destination": "beach"})));
    let mut engine =
        TurnEngine::new(EngineConfig::default(), ScriptedDirector::new([reply])).unwrap();
    let mut world = island();

    let decision = engine.run_player_turn(&mut world, &p1(), "go to the beach").unwrap();

    assert_eq!(world.player(&p1()).unwrap().actor.location, tile("crypt"));
    assert_eq!(decision.narration, vec!["Nothing happens.".to_string()]);
    assert_eq!(decision.diagnostics.len(), 1);
    assert_eq!(decision.turn, 1);
}

#[test]
fn rejected_operation_skips_the_rest() {
    let reply = DirectorReply::default()
        .with_call(ToolCall::new("move_player", json!({"to_tile": "volcano"})))
        .with_call(ToolCall::new("move_player", json!({"to_tile": "beach"})));
    let mut engine =
        TurnEngine::new(EngineConfig::default(), ScriptedDirector::new([reply])).unwrap();
    let mut world = island();

    let decision = engine.run_player_turn(&mut world, &p1(), "run").unwrap();

    assert_eq!(world.player(&p1()).unwrap().actor.location, tile("crypt"));
    assert_eq!(decision.narration, vec!["Nothing happens.".to_string()]);
    assert!(decision.diagnostics.iter().any(|d| d.contains("skipped")));
}

#[test]
fn darkness_then_midnight_ends_the_game() {
    let schedule = PhaseSchedule {
        dark_from_turn: 2,
        midnight_turn: 3,
    };
    let config = EngineConfig::default().with_phase_schedule(schedule);
    let mut engine =
        TurnEngine::with_dice(config, ScriptedDice::new([10]), ScriptedDirector::default())
            .unwrap();
    let mut world = island();

    let first = engine.run_player_turn(&mut world, &p1(), "wait").unwrap();
    assert_eq!(world.session().phase(), TimePhase::Light);
    assert!(!first.game_over);

    let second = engine.run_player_turn(&mut world, &p1(), "wait").unwrap();
    assert_eq!(world.session().phase(), TimePhase::Dark);
    assert!(second.narration.iter().any(|n| n.contains("Darkness")));
    assert!(!second.game_over);

    let third = engine.run_player_turn(&mut world, &p1(), "wait").unwrap();
    assert!(world.session().flag(FlagName::MidnightReached));
    assert!(third.narration.iter().any(|n| n.starts_with("Midnight")));
    assert!(third.game_over);

    let fourth = engine.run_player_turn(&mut world, &p1(), "wait").unwrap();
    assert!(!fourth.narration.iter().any(|n| n.starts_with("Midnight")));
    assert!(fourth.game_over);
}

#[test]
fn turns_are_saved_to_the_repository() {
    let repo = Arc::new(InMemorySessionRepository::new());
    let mut world = island();
    let id = repo.create_session(&world).unwrap();
    let mut engine = TurnEngine::new(EngineConfig::default(), ScriptedDirector::default())
        .unwrap()
        .with_repository(repo.clone());

    engine.run_player_turn(&mut world, &p1(), "wait").unwrap();

    let stored = repo.find_by_id(&id).unwrap().unwrap();
    assert_eq!(stored.session().turn(), 1);
}
