//! The turn engine: player turns, creature turns, and the turn clock.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use isle_core::{
    ActorRef, CreatureId, CreatureRole, FlagName, FlagTarget, PlayerId, TimePhase, World,
};
use isle_mechanics::{CheckResolver, CheckResult, DiceSource, SeededDice};
use tracing::{debug, info, warn};

use crate::applier::{Applier, ApplyReport};
use crate::collaborator::{CreatureMind, Director};
use crate::command::{Parsed, parse_command};
use crate::config::EngineConfig;
use crate::error::{ControlSignal, DecodeError, EngineError, EngineResult};
use crate::hooks::HookRegistry;
use crate::intent::{IntentTranslator, decode_intent};
use crate::operation::{StateChange, decode_tool_call};
use crate::repository::SessionRepository;
use crate::tool::ToolCall;
use crate::view::ActorView;

/// The outcome of one player turn.
#[derive(Debug, Clone, Default)]
pub struct TurnDecision {
    /// Turn number after the turn advanced.
    pub turn: u32,
    /// Narration for the player's action and the clock, in order.
    pub narration: Vec<String>,
    /// Checks rolled during the turn, creature checks last.
    pub check_results: Vec<CheckResult>,
    /// Why parts of the turn were dropped. Not shown to players.
    pub diagnostics: Vec<String>,
    /// Narration from creature turns that followed.
    pub creature_narration: Vec<String>,
    /// Midnight has been reached or the turn limit is used up.
    pub game_over: bool,
}

impl TurnDecision {
    /// All narration as one block, creatures last.
    pub fn narration_text(&self) -> String {
        self.narration
            .iter()
            .chain(&self.creature_narration)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The outcome of one role's creature turn.
#[derive(Debug, Clone, Default)]
pub struct CreatureTurnReport {
    /// Creatures that were consulted, in id order.
    pub creatures: Vec<CreatureId>,
    /// Narration, in order.
    pub narration: Vec<String>,
    /// Checks rolled.
    pub checks: Vec<CheckResult>,
    /// Dropped intents and rejected operations.
    pub diagnostics: Vec<String>,
}

/// Resolves player and creature turns against a world.
pub struct TurnEngine<D = SeededDice> {
    config: EngineConfig,
    hooks: HookRegistry,
    resolver: CheckResolver<D>,
    director: Box<dyn Director>,
    minds: BTreeMap<CreatureRole, Box<dyn CreatureMind>>,
    repository: Option<Arc<dyn SessionRepository>>,
    recent_checks: VecDeque<CheckResult>,
}

impl TurnEngine<SeededDice> {
    /// Create an engine rolling seeded dice from `config.seed`.
    pub fn new(config: EngineConfig, director: impl Director + 'static) -> EngineResult<Self> {
        let dice = SeededDice::from_optional_seed(config.seed);
        Self::with_dice(config, dice, director)
    }
}

impl<D: DiceSource> TurnEngine<D> {
    /// Create an engine with an explicit dice source.
    pub fn with_dice(
        config: EngineConfig,
        dice: D,
        director: impl Director + 'static,
    ) -> EngineResult<Self> {
        config.validate()?;
        let resolver =
            CheckResolver::new(dice, config.modifier_table.clone()).with_die(config.check_die);
        Ok(Self {
            recent_checks: VecDeque::with_capacity(config.recent_checks_capacity),
            config,
            hooks: HookRegistry::with_defaults(),
            resolver,
            director: Box::new(director),
            minds: BTreeMap::new(),
            repository: None,
        })
    }

    /// Replace the hook registry.
    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    /// Attach the mind that drives every creature of `role`.
    pub fn with_mind(mut self, role: CreatureRole, mind: impl CreatureMind + 'static) -> Self {
        self.minds.insert(role, Box::new(mind));
        self
    }

    /// Save the world to `repository` after every turn.
    pub fn with_repository(mut self, repository: Arc<dyn SessionRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The hook registry.
    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Toggle automatic creature turns after each player turn.
    pub fn set_auto_process_creatures(&mut self, enabled: bool) {
        self.config.auto_process_creatures = enabled;
    }

    /// The most recent check results, oldest first.
    pub fn recent_check_results(&self) -> Vec<CheckResult> {
        self.recent_checks.iter().cloned().collect()
    }

    /// Resolve one line of input from `player`.
    ///
    /// Blank input and `quit` come back as [`EngineError::ControlSignal`]
    /// and leave the world untouched. Everything else advances the turn,
    /// even when the director's decision is dropped.
    pub fn run_player_turn(
        &mut self,
        world: &mut World,
        player: &PlayerId,
        input: &str,
    ) -> EngineResult<TurnDecision> {
        let command = match parse_command(player, input) {
            Parsed::Turn(command) => command,
            Parsed::Blank => return Err(EngineError::ControlSignal(ControlSignal::Blank)),
            Parsed::Quit => return Err(EngineError::ControlSignal(ControlSignal::Quit)),
        };
        if world.player(player).is_none() {
            return Err(EngineError::UnknownPlayer(player.clone()));
        }
        let acting = ActorRef::Player(player.clone());
        let mut decision = TurnDecision::default();

        let changes = match self.director.decide(world, &command) {
            Ok(reply) => match decode_all(&reply.tool_calls, &acting) {
                Ok(changes) => {
                    if !reply.narration.trim().is_empty() {
                        decision.narration.push(reply.narration);
                    }
                    changes
                }
                Err(error) => {
                    warn!(%player, error = %error, "director decision rejected");
                    decision
                        .diagnostics
                        .push(format!("director decision rejected: {error}"));
                    decision.narration.push(self.config.fallback_narration.clone());
                    Vec::new()
                }
            },
            Err(error) => {
                warn!(%player, error = %error, "director failed");
                decision.diagnostics.push(error.to_string());
                decision.narration.push(self.config.fallback_narration.clone());
                Vec::new()
            }
        };

        let report = self.apply(world, &acting, &changes);
        let applied = report.applied;
        absorb(&mut decision.narration, &mut decision.diagnostics, &report);
        self.remember(&report.checks);
        decision.check_results = report.checks;

        decision.turn = self.advance_clock(world, &mut decision.narration);

        if self.config.auto_process_creatures {
            let mut roles = Vec::with_capacity(2);
            if world.session().flag(FlagName::GhostAwakened) {
                roles.push(CreatureRole::Ghost);
            }
            roles.push(CreatureRole::Monkey);
            for role in roles {
                let report = self.creature_turn(world, role);
                decision.creature_narration.extend(report.narration);
                decision.check_results.extend(report.checks);
                decision.diagnostics.extend(report.diagnostics);
            }
        }

        decision.game_over =
            world.session().flag(FlagName::MidnightReached) || world.session().turns_exhausted();
        self.persist(world, &mut decision.diagnostics);

        info!(
            %player,
            turn = decision.turn,
            applied,
            checks = decision.check_results.len(),
            game_over = decision.game_over,
            "player turn resolved"
        );
        Ok(decision)
    }

    /// Let every creature of `role` act once, in id order.
    pub fn run_creature_turn(
        &mut self,
        world: &mut World,
        role: CreatureRole,
    ) -> CreatureTurnReport {
        let mut report = self.creature_turn(world, role);
        self.persist(world, &mut report.diagnostics);
        report
    }

    fn creature_turn(&mut self, world: &mut World, role: CreatureRole) -> CreatureTurnReport {
        let mut report = CreatureTurnReport::default();
        if !self.minds.contains_key(&role) {
            debug!(%role, "no mind attached, skipping creature turn");
            return report;
        }
        let ids: Vec<CreatureId> = world
            .creatures_with_role(role)
            .map(|c| c.id.clone())
            .collect();
        for id in ids {
            self.act(world, &id, role, &mut report);
            self.step_toward_target(world, &id, &mut report);
            report.creatures.push(id);
        }
        self.remember(&report.checks);
        debug!(%role, creatures = report.creatures.len(), "creature turn resolved");
        report
    }

    fn act(
        &mut self,
        world: &mut World,
        id: &CreatureId,
        role: CreatureRole,
        report: &mut CreatureTurnReport,
    ) {
        let Some(mind) = self.minds.get(&role) else {
            return;
        };
        let Some(view) = ActorView::build(world, id, self.recent_checks.iter()) else {
            return;
        };
        let call = match mind.decide(&view) {
            Ok(Some(call)) => call,
            Ok(None) => {
                debug!(creature = %id, "creature idles");
                return;
            }
            Err(error) => {
                warn!(creature = %id, error = %error, "creature mind failed");
                report.diagnostics.push(format!("{id}: {error}"));
                return;
            }
        };
        let intent = match decode_intent(&call, id, role) {
            Ok(intent) => intent,
            Err(error) => {
                warn!(creature = %id, error = %error, "creature intent rejected");
                report.diagnostics.push(format!("{id}: {error}"));
                return;
            }
        };
        let steal_difficulty = self.config.steal_difficulty;
        let mut translator = IntentTranslator::new(&mut self.resolver, steal_difficulty);
        let translation = match translator.translate(world, id, &intent) {
            Ok(translation) => translation,
            Err(error) => {
                warn!(
                    creature = %id,
                    intent = intent.name(),
                    error = %error,
                    "creature intent failed"
                );
                report.diagnostics.push(format!("{id}: {error}"));
                return;
            }
        };
        report.narration.extend(translation.narration);
        report.checks.extend(translation.checks);

        let applied = self.apply(world, &ActorRef::Creature(id.clone()), &translation.changes);
        absorb(&mut report.narration, &mut report.diagnostics, &applied);
        report.checks.extend(applied.checks);
    }

    fn step_toward_target(
        &mut self,
        world: &mut World,
        id: &CreatureId,
        report: &mut CreatureTurnReport,
    ) {
        let Some(creature) = world.creature(id) else {
            return;
        };
        let Some(target) = creature.target_tile().cloned() else {
            return;
        };
        let here = creature.actor.location.clone();
        let change = if here == target {
            StateChange::SetCreatureTarget {
                creature: id.clone(),
                tile: None,
            }
        } else {
            match world.next_step_toward(&here, &target) {
                Some(next) => StateChange::MoveCreature {
                    creature: id.clone(),
                    to_tile: next,
                },
                None => {
                    debug!(creature = %id, %target, "no step toward target");
                    return;
                }
            }
        };
        let applied = self.apply(world, &ActorRef::Creature(id.clone()), &[change]);
        absorb(&mut report.narration, &mut report.diagnostics, &applied);
    }

    fn apply(
        &mut self,
        world: &mut World,
        actor: &ActorRef,
        changes: &[StateChange],
    ) -> ApplyReport {
        Applier::new(&self.hooks, &mut self.resolver, self.config.failure_policy)
            .with_fallback_narration(&self.config.fallback_narration)
            .apply_all(world, actor, changes)
    }

    /// Advance the turn, recompute the phase, and cross midnight once.
    fn advance_clock(&self, world: &mut World, narration: &mut Vec<String>) -> u32 {
        let schedule = self.config.phase_schedule;
        let turn = world.session_mut().advance_turn();

        let phase = schedule.phase_for(turn);
        if phase != world.session().phase() {
            world.session_mut().set_phase(phase);
            narration.push(
                match phase {
                    TimePhase::Dark => "Darkness settles over the island.",
                    TimePhase::Light => "Daylight returns to the island.",
                }
                .to_string(),
            );
        }

        if schedule.is_midnight(turn) && !world.session().flag(FlagName::MidnightReached) {
            match world.set_flag(&FlagTarget::Session, FlagName::MidnightReached, true) {
                Ok(()) => narration.push("Midnight. The island holds its breath.".to_string()),
                Err(error) => warn!(error = %error, "could not mark midnight"),
            }
        }
        turn
    }

    fn remember(&mut self, checks: &[CheckResult]) {
        let capacity = self.config.recent_checks_capacity.max(1);
        for check in checks {
            while self.recent_checks.len() >= capacity {
                self.recent_checks.pop_front();
            }
            self.recent_checks.push_back(check.clone());
        }
    }

    fn persist(&self, world: &World, diagnostics: &mut Vec<String>) {
        let Some(repository) = &self.repository else {
            return;
        };
        if let Err(error) = repository.save(world) {
            warn!(session = %world.session().id, error = %error, "session save failed");
            diagnostics.push(format!("save failed: {error}"));
        }
    }
}

fn decode_all(calls: &[ToolCall], acting: &ActorRef) -> Result<Vec<StateChange>, DecodeError> {
    calls.iter().map(|call| decode_tool_call(call, acting)).collect()
}

fn absorb(narration: &mut Vec<String>, diagnostics: &mut Vec<String>, report: &ApplyReport) {
    narration.extend(report.narration.iter().cloned());
    diagnostics.extend(report.errors.iter().map(|e| format!("operation rejected: {e}")));
    if report.skipped > 0 {
        diagnostics.push(format!("{} operation(s) skipped", report.skipped));
    }
}
