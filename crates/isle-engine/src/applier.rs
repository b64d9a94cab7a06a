//! Validated, ordered application of operations to the world.
//!
//! Every operation either applies completely or not at all. A hook's
//! follow-up operations are applied to a staged copy of the world that is
//! committed only when all of them succeed.

use isle_core::{ActorRef, ItemId, Owner, World};
use isle_mechanics::{CheckRequest, CheckResolver, CheckResult, DiceSource};
use tracing::{debug, warn};

use crate::config::FailurePolicy;
use crate::error::ApplyError;
use crate::hooks::{HookRegistry, item_name};
use crate::operation::{StateChange, resolve_owner};

/// What happened while applying a sequence.
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Narration fragments, in order.
    pub narration: Vec<String>,
    /// Checks rolled, in order.
    pub checks: Vec<CheckResult>,
    /// Number of operations applied.
    pub applied: usize,
    /// Number of operations not attempted after an abort.
    pub skipped: usize,
    /// Rejected operations.
    pub errors: Vec<ApplyError>,
}

impl ApplyReport {
    /// Whether every operation applied.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.skipped == 0
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: ApplyReport) {
        self.narration.extend(other.narration);
        self.checks.extend(other.checks);
        self.applied += other.applied;
        self.skipped += other.skipped;
        self.errors.extend(other.errors);
    }
}

#[derive(Debug, Default)]
struct Applied {
    narration: Vec<String>,
    checks: Vec<CheckResult>,
}

impl Applied {
    fn say(text: String) -> Self {
        Self {
            narration: vec![text],
            checks: Vec::new(),
        }
    }

    fn silent() -> Self {
        Self::default()
    }

    fn absorb(&mut self, other: Applied) {
        self.narration.extend(other.narration);
        self.checks.extend(other.checks);
    }
}

/// Applies operations on behalf of one acting actor.
pub struct Applier<'a, D> {
    hooks: &'a HookRegistry,
    resolver: &'a mut CheckResolver<D>,
    policy: FailurePolicy,
    fallback: &'a str,
}

impl<'a, D: DiceSource> Applier<'a, D> {
    /// Create an applier.
    pub fn new(
        hooks: &'a HookRegistry,
        resolver: &'a mut CheckResolver<D>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            hooks,
            resolver,
            policy,
            fallback: "Nothing happens.",
        }
    }

    /// Narration used for a rejected operation.
    pub fn with_fallback_narration(mut self, text: &'a str) -> Self {
        self.fallback = text;
        self
    }

    /// Apply `changes` in order.
    ///
    /// A rejected operation adds the fallback narration and an error. Under
    /// [`FailurePolicy::Abort`] the rest of the sequence is skipped.
    pub fn apply_all(
        &mut self,
        world: &mut World,
        actor: &ActorRef,
        changes: &[StateChange],
    ) -> ApplyReport {
        let mut report = ApplyReport::default();
        for (index, change) in changes.iter().enumerate() {
            match self.apply_change(world, actor, change, false) {
                Ok(applied) => {
                    debug!(op = change.kind(), %actor, "applied operation");
                    report.applied += 1;
                    report.narration.extend(applied.narration);
                    report.checks.extend(applied.checks);
                }
                Err(error) => {
                    warn!(op = change.kind(), index, %actor, error = %error, "operation rejected");
                    report.narration.push(self.fallback.to_string());
                    report.errors.push(error);
                    if self.policy == FailurePolicy::Abort {
                        report.skipped = changes.len() - index - 1;
                        if report.skipped > 0 {
                            debug!(skipped = report.skipped, "skipping remaining operations");
                        }
                        break;
                    }
                }
            }
        }
        report
    }

    /// Apply a single operation.
    pub fn apply_one(
        &mut self,
        world: &mut World,
        actor: &ActorRef,
        change: &StateChange,
    ) -> Result<Vec<String>, ApplyError> {
        let applied = self.apply_change(world, actor, change, false)?;
        Ok(applied.narration)
    }

    fn apply_change(
        &mut self,
        world: &mut World,
        actor: &ActorRef,
        change: &StateChange,
        in_hook: bool,
    ) -> Result<Applied, ApplyError> {
        match change {
            StateChange::MovePlayer { player, to_tile } => {
                world.move_player(player, to_tile)?;
                let name = actor_name(world, &ActorRef::Player(player.clone()));
                Ok(Applied::say(format!("{name} moves to {to_tile}.")))
            }
            StateChange::TransferItem {
                item,
                owner_kind,
                owner_id,
                contained_by,
            } => {
                let owner = resolve_owner(*owner_kind, owner_id, contained_by.as_ref());
                world.transfer_item(item, owner.clone())?;
                Ok(Applied::say(format!(
                    "The {} is now {}.",
                    item_name(world, item).to_lowercase(),
                    describe_owner(world, &owner),
                )))
            }
            StateChange::SetFlag {
                target,
                flag,
                value,
            } => {
                world.set_flag(target, *flag, *value)?;
                Ok(Applied::say(format!("{flag} is now {value} for {target}.")))
            }
            StateChange::RunItemHook { hook, item, verb } => {
                if in_hook {
                    return Err(ApplyError::NestedHook(hook.clone()));
                }
                self.run_hook(world, actor, hook, item, verb.as_deref())
            }
            StateChange::Check {
                check_type,
                subject,
                difficulty,
            } => {
                let request = CheckRequest::new(check_type.clone(), subject.clone(), *difficulty);
                let result = self.resolver.evaluate(world, &request);
                debug!(
                    check_type = %result.check_type,
                    die = %self.resolver.die(),
                    roll = result.roll,
                    modifier = result.modifier,
                    success = result.success,
                    "check resolved"
                );
                Ok(Applied {
                    narration: vec![result.narrate()],
                    checks: vec![result],
                })
            }
            StateChange::SetCreatureTarget { creature, tile } => {
                world.set_creature_target(creature, tile.clone())?;
                let name = actor_name(world, &ActorRef::Creature(creature.clone()));
                Ok(Applied::say(match tile {
                    Some(tile) => format!("{name} heads toward {tile}."),
                    None => format!("{name} stops wandering."),
                }))
            }
            StateChange::MoveCreature { creature, to_tile } => {
                world.move_creature(creature, to_tile)?;
                let name = actor_name(world, &ActorRef::Creature(creature.clone()));
                Ok(Applied::say(format!("{name} moves to {to_tile}.")))
            }
            StateChange::RecordEvent { target, text } => {
                world.record_event(target, text.clone())?;
                Ok(Applied::silent())
            }
            StateChange::SetTileNote { tile, note } => {
                world.set_tile_note(tile, note.clone())?;
                Ok(Applied::silent())
            }
        }
    }

    fn run_hook(
        &mut self,
        world: &mut World,
        actor: &ActorRef,
        hook: &isle_core::HookId,
        item: &ItemId,
        verb: Option<&str>,
    ) -> Result<Applied, ApplyError> {
        let outcome = self.hooks.dispatch(world, actor, hook, item, verb)?;
        if outcome
            .changes
            .iter()
            .any(|c| matches!(c, StateChange::RunItemHook { .. }))
        {
            return Err(ApplyError::NestedHook(hook.clone()));
        }

        let mut staged = world.clone();
        let mut applied = Applied {
            narration: outcome.narration,
            checks: Vec::new(),
        };
        for change in &outcome.changes {
            applied.absorb(self.apply_change(&mut staged, actor, change, true)?);
        }
        *world = staged;
        debug!(%hook, %item, changes = outcome.changes.len(), "hook committed");
        Ok(applied)
    }
}

fn actor_name(world: &World, actor: &ActorRef) -> String {
    world
        .actor(actor)
        .map(|a| a.name.clone())
        .unwrap_or_else(|| actor.to_string())
}

fn describe_owner(world: &World, owner: &Owner) -> String {
    match owner {
        Owner::Tile(tile) => format!("on {tile}"),
        Owner::Player(id) => format!(
            "carried by {}",
            actor_name(world, &ActorRef::Player(id.clone()))
        ),
        Owner::Creature(id) => format!(
            "carried by {}",
            actor_name(world, &ActorRef::Creature(id.clone()))
        ),
        Owner::Item(id) => format!("inside the {}", item_name(world, id).to_lowercase()),
    }
}
