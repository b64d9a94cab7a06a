//! Creature intents: what a ghost or monkey wants to do, and the operations
//! that carry it out.

use isle_core::{
    ActorRef, CreatureId, CreatureRole, EventTarget, HookId, ItemId, Owner, PlayerId, TileId,
    World,
};
use isle_mechanics::{CheckRequest, CheckResolver, CheckResult, CheckType, DiceSource};
use tracing::debug;

use crate::error::{ApplyError, DecodeError};
use crate::hooks::item_name;
use crate::operation::{StateChange, decode_subject, decode_transfer};
use crate::tool::{Args, ToolCall};

/// Item tag monkeys cannot resist.
pub const BAIT_TAG: &str = "bait";

/// A decoded creature decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatureIntent {
    /// Start heading for a tile.
    SetTargetTile {
        /// Destination.
        tile: TileId,
    },
    /// Make someone roll a check.
    RequestCheck {
        /// Which check.
        check_type: CheckType,
        /// Who rolls.
        subject: ActorRef,
        /// Total needed.
        difficulty: i32,
    },
    /// Move an item to a new owner.
    TransferItem {
        /// The item.
        item: ItemId,
        /// Its new owner.
        owner: Owner,
    },
    /// Trigger an item's hook.
    RunItemHook {
        /// The hook.
        hook: HookId,
        /// The item.
        item: ItemId,
        /// Verb, if any.
        verb: Option<String>,
    },
    /// Tail a player.
    Follow {
        /// The player to follow.
        player: PlayerId,
    },
    /// Snatch something a player carries.
    Steal {
        /// The victim.
        player: PlayerId,
        /// A specific item, or `None` to pick one.
        item: Option<ItemId>,
    },
    /// Drop a carried item on a tile.
    Throw {
        /// A specific item, or `None` for the first carried one.
        item: Option<ItemId>,
        /// Where it lands, or `None` for the creature's own tile.
        tile: Option<TileId>,
    },
    /// Head back to the home tile.
    ReturnHome,
    /// Do nothing, visibly.
    Ignore,
}

impl CreatureIntent {
    /// The intent name, as used in tool calls.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetTargetTile { .. } => "set_target_tile",
            Self::RequestCheck { .. } => "request_check",
            Self::TransferItem { .. } => "transfer_item",
            Self::RunItemHook { .. } => "run_item_hook",
            Self::Follow { .. } => "follow",
            Self::Steal { .. } => "steal",
            Self::Throw { .. } => "throw",
            Self::ReturnHome => "return_home",
            Self::Ignore => "ignore",
        }
    }

    /// Whether a creature of `role` may act on this intent.
    pub fn allowed_for(&self, role: CreatureRole) -> bool {
        match role {
            CreatureRole::Ghost => matches!(
                self,
                Self::SetTargetTile { .. }
                    | Self::RequestCheck { .. }
                    | Self::TransferItem { .. }
                    | Self::RunItemHook { .. }
            ),
            CreatureRole::Monkey => matches!(
                self,
                Self::Follow { .. }
                    | Self::Steal { .. }
                    | Self::Throw { .. }
                    | Self::ReturnHome
                    | Self::Ignore
            ),
        }
    }
}

/// Decode a creature mind's tool call and check it against the role.
///
/// A `request_check` without a subject makes the creature itself roll.
pub fn decode_intent(
    call: &ToolCall,
    creature: &CreatureId,
    role: CreatureRole,
) -> Result<CreatureIntent, DecodeError> {
    let args = Args::of(call)?;
    let intent = match call.name.trim().to_lowercase().as_str() {
        "set_target_tile" => CreatureIntent::SetTargetTile {
            tile: TileId::new(args.str("tile")?),
        },
        "request_check" => CreatureIntent::RequestCheck {
            check_type: CheckType::parse(args.str("check_type")?),
            subject: decode_subject(&args, &ActorRef::Creature(creature.clone()))?,
            difficulty: args.i32("difficulty")?,
        },
        "transfer_item" => {
            let (item, owner) = decode_transfer(&args)?;
            CreatureIntent::TransferItem { item, owner }
        }
        "run_item_hook" => CreatureIntent::RunItemHook {
            hook: HookId::new(args.str("hook")?),
            item: ItemId::new(args.str("item")?),
            verb: args.opt_str("verb")?.map(str::to_lowercase),
        },
        "follow" => CreatureIntent::Follow {
            player: PlayerId::new(args.str("player")?),
        },
        "steal" => CreatureIntent::Steal {
            player: PlayerId::new(args.str("player")?),
            item: args.opt_str("item")?.map(ItemId::new),
        },
        "throw" => CreatureIntent::Throw {
            item: args.opt_str("item")?.map(ItemId::new),
            tile: args.opt_str("tile")?.map(TileId::new),
        },
        "return_home" => CreatureIntent::ReturnHome,
        "ignore" => CreatureIntent::Ignore,
        _ => return Err(DecodeError::UnknownTool(call.name.clone())),
    };
    if !intent.allowed_for(role) {
        return Err(DecodeError::NotAllowed {
            intent: intent.name().to_string(),
            role,
        });
    }
    Ok(intent)
}

/// Operations and side results produced by translating one intent.
#[derive(Debug, Default)]
pub struct Translation {
    /// Operations to apply with the creature as actor.
    pub changes: Vec<StateChange>,
    /// Checks rolled while deciding the outcome.
    pub checks: Vec<CheckResult>,
    /// Narration emitted before the operations are applied.
    pub narration: Vec<String>,
}

/// Turns intents into operations for one creature.
pub struct IntentTranslator<'a, D> {
    resolver: &'a mut CheckResolver<D>,
    steal_difficulty: i32,
}

impl<'a, D: DiceSource> IntentTranslator<'a, D> {
    /// Create a translator rolling contests on `resolver`.
    pub fn new(resolver: &'a mut CheckResolver<D>, steal_difficulty: i32) -> Self {
        Self {
            resolver,
            steal_difficulty,
        }
    }

    /// Translate `intent` for `creature`.
    pub fn translate(
        &mut self,
        world: &World,
        creature: &CreatureId,
        intent: &CreatureIntent,
    ) -> Result<Translation, ApplyError> {
        let body = world
            .creature(creature)
            .ok_or_else(|| isle_core::IsleError::CreatureNotFound(creature.clone()))?;
        let role = body.role;
        if !intent.allowed_for(role) {
            return Err(ApplyError::intent(
                role,
                format!("{} is not available", intent.name()),
            ));
        }
        let name = body.actor.name.clone();
        let here = body.actor.location.clone();
        let me = ActorRef::Creature(creature.clone());

        let mut out = Translation::default();
        match intent {
            CreatureIntent::SetTargetTile { tile } => {
                out.changes.push(target(creature, tile.clone()));
            }
            CreatureIntent::RequestCheck {
                check_type,
                subject,
                difficulty,
            } => out.changes.push(StateChange::check(CheckRequest::new(
                check_type.clone(),
                subject.clone(),
                *difficulty,
            ))),
            CreatureIntent::TransferItem { item, owner } => {
                out.changes
                    .push(StateChange::transfer(item.clone(), owner.clone()));
            }
            CreatureIntent::RunItemHook { hook, item, verb } => {
                out.changes.push(StateChange::RunItemHook {
                    hook: hook.clone(),
                    item: item.clone(),
                    verb: verb.clone(),
                });
            }
            CreatureIntent::Follow { player } => {
                let victim = world
                    .player(player)
                    .ok_or_else(|| ApplyError::intent(role, format!("no player {player}")))?;
                out.changes
                    .push(target(creature, victim.actor.location.clone()));
            }
            CreatureIntent::ReturnHome => {
                out.changes.push(target(creature, body.home_tile.clone()));
            }
            CreatureIntent::Ignore => {
                out.narration.push(format!("{name} ignores everyone."));
            }
            CreatureIntent::Steal { player, item } => {
                self.steal(world, &mut out, creature, &name, &here, player, item.as_ref())?;
            }
            CreatureIntent::Throw { item, tile } => {
                let loot = match item {
                    Some(item) => {
                        let owned = world
                            .item(item)
                            .is_some_and(|i| *i.owner() == Owner::Creature(creature.clone()));
                        if !owned {
                            return Err(ApplyError::intent(
                                role,
                                format!("{name} does not carry {item}"),
                            ));
                        }
                        Some(item.clone())
                    }
                    None => world.carried_by(&me).first().map(|i| i.id.clone()),
                };
                let Some(loot) = loot else {
                    out.narration.push(format!("{name} has nothing to throw."));
                    return Ok(out);
                };
                let dest = tile.clone().unwrap_or(here);
                if world.tile(&dest).is_none() {
                    return Err(ApplyError::intent(role, format!("no tile {dest}")));
                }
                out.narration.push(format!(
                    "{name} throws the {} toward {dest}.",
                    item_name(world, &loot).to_lowercase()
                ));
                out.changes.push(StateChange::transfer(loot, Owner::Tile(dest)));
            }
        }
        Ok(out)
    }

    #[allow(clippy::too_many_arguments)]
    fn steal(
        &mut self,
        world: &World,
        out: &mut Translation,
        creature: &CreatureId,
        name: &str,
        here: &TileId,
        player: &PlayerId,
        item: Option<&ItemId>,
    ) -> Result<(), ApplyError> {
        let role = CreatureRole::Monkey;
        let victim = world
            .player(player)
            .ok_or_else(|| ApplyError::intent(role, format!("no player {player}")))?;
        if victim.actor.location != *here {
            return Err(ApplyError::intent(
                role,
                format!("{} is out of reach of {name}", victim.actor.name),
            ));
        }
        let victim_name = victim.actor.name.clone();
        let victim_ref = ActorRef::Player(player.clone());

        let carried = world.carried_by(&victim_ref);
        let loot = match item {
            Some(item) => carried.iter().find(|i| i.id == *item).copied().ok_or_else(|| {
                ApplyError::intent(role, format!("{victim_name} does not carry {item}"))
            })?,
            None => {
                let bait = carried.iter().find(|i| {
                    world
                        .item_type(&i.item_type)
                        .is_some_and(|t| t.has_tag(BAIT_TAG))
                });
                match bait.or(carried.first()) {
                    Some(loot) => *loot,
                    None => {
                        out.narration.push(format!(
                            "{name} finds nothing worth stealing from {victim_name}."
                        ));
                        return Ok(());
                    }
                }
            }
        };
        let loot_name = item_name(world, &loot.id).to_lowercase();
        let is_bait = world
            .item_type(&loot.item_type)
            .is_some_and(|t| t.has_tag(BAIT_TAG));

        if !is_bait {
            let request =
                CheckRequest::new(CheckType::Perception, victim_ref.clone(), self.steal_difficulty);
            let check = self.resolver.evaluate(world, &request);
            debug!(
                %creature,
                %player,
                roll = check.roll,
                success = check.success,
                "steal contested"
            );
            let noticed = check.success;
            out.narration.push(check.narrate());
            out.checks.push(check);
            if noticed {
                out.narration.push(format!(
                    "{victim_name} catches {name} reaching for the {loot_name}."
                ));
                out.changes.push(StateChange::RecordEvent {
                    target: EventTarget::Player(player.clone()),
                    text: format!("Caught {name} trying to steal the {loot_name}."),
                });
                return Ok(());
            }
        }

        out.narration.push(format!(
            "{name} snatches the {loot_name} from {victim_name}!"
        ));
        out.changes.push(StateChange::transfer(
            loot.id.clone(),
            Owner::Creature(creature.clone()),
        ));
        out.changes.push(StateChange::RecordEvent {
            target: EventTarget::Player(player.clone()),
            text: format!("{name} stole the {loot_name}."),
        });
        Ok(())
    }
}

fn target(creature: &CreatureId, tile: TileId) -> StateChange {
    StateChange::SetCreatureTarget {
        creature: creature.clone(),
        tile: Some(tile),
    }
}
