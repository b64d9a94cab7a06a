//! The closed operation algebra and its decoding from tool calls.

use isle_core::{
    ActorRef, CreatureId, EventTarget, FlagName, FlagTarget, HookId, ItemId, Owner, OwnerKind,
    PlayerId, TileId,
};
use isle_mechanics::{CheckRequest, CheckType};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::tool::{Args, ToolCall};

/// One instruction the applier executes against the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StateChange {
    /// Put a player on a tile.
    MovePlayer {
        /// The player.
        player: PlayerId,
        /// Destination tile.
        to_tile: TileId,
    },
    /// Give an item a new owner. `contained_by` nests it inside another item
    /// and takes precedence over the owner fields.
    TransferItem {
        /// The item.
        item: ItemId,
        /// Kind of the new owner.
        owner_kind: OwnerKind,
        /// Identifier of the new owner.
        owner_id: String,
        /// Containing item, when nesting.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        contained_by: Option<ItemId>,
    },
    /// Set a boolean flag.
    SetFlag {
        /// Where the flag lives.
        target: FlagTarget,
        /// Which flag.
        flag: FlagName,
        /// New value.
        value: bool,
    },
    /// Run an item's hook on behalf of the acting actor.
    RunItemHook {
        /// The hook.
        hook: HookId,
        /// The item acted upon.
        item: ItemId,
        /// The verb used, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        verb: Option<String>,
    },
    /// Roll a check. Observational: the world is not changed.
    Check {
        /// Which check.
        check_type: CheckType,
        /// Who makes it.
        subject: ActorRef,
        /// Total needed.
        difficulty: i32,
    },
    /// Set or clear a creature's movement target.
    SetCreatureTarget {
        /// The creature.
        creature: CreatureId,
        /// Target tile, or `None` to clear.
        tile: Option<TileId>,
    },
    /// Put a creature on a tile.
    MoveCreature {
        /// The creature.
        creature: CreatureId,
        /// Destination tile.
        to_tile: TileId,
    },
    /// Append an entry to an event log.
    RecordEvent {
        /// Whose log.
        target: EventTarget,
        /// The entry text.
        text: String,
    },
    /// Replace a tile's remembered note.
    SetTileNote {
        /// The tile.
        tile: TileId,
        /// New note, or `None` to clear.
        note: Option<String>,
    },
}

impl StateChange {
    /// A transfer to the given owner.
    pub fn transfer(item: ItemId, owner: Owner) -> Self {
        let (owner_kind, owner_id, contained_by) = match owner {
            Owner::Item(container) => (OwnerKind::Item, container.to_string(), Some(container)),
            other => (other.kind(), owner_id_of(&other), None),
        };
        Self::TransferItem {
            item,
            owner_kind,
            owner_id,
            contained_by,
        }
    }

    /// A check operation from a request.
    pub fn check(request: CheckRequest) -> Self {
        Self::Check {
            check_type: request.check_type,
            subject: request.subject,
            difficulty: request.difficulty,
        }
    }

    /// The operation name, as used in tool calls and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MovePlayer { .. } => "move_player",
            Self::TransferItem { .. } => "transfer_item",
            Self::SetFlag { .. } => "set_flag",
            Self::RunItemHook { .. } => "run_item_hook",
            Self::Check { .. } => "check",
            Self::SetCreatureTarget { .. } => "set_creature_target",
            Self::MoveCreature { .. } => "move_creature",
            Self::RecordEvent { .. } => "record_event",
            Self::SetTileNote { .. } => "set_tile_note",
        }
    }

    /// The owner a transfer resolves to.
    pub fn transfer_owner(&self) -> Option<Owner> {
        match self {
            Self::TransferItem {
                owner_kind,
                owner_id,
                contained_by,
                ..
            } => Some(resolve_owner(*owner_kind, owner_id, contained_by.as_ref())),
            _ => None,
        }
    }
}

/// The owner named by transfer fields. A container wins over the owner pair.
pub(crate) fn resolve_owner(kind: OwnerKind, id: &str, contained_by: Option<&ItemId>) -> Owner {
    match contained_by {
        Some(container) => Owner::Item(container.clone()),
        None => Owner::from_parts(kind, id),
    }
}

fn owner_id_of(owner: &Owner) -> String {
    match owner {
        Owner::Tile(id) => id.to_string(),
        Owner::Player(id) => id.to_string(),
        Owner::Creature(id) => id.to_string(),
        Owner::Item(id) => id.to_string(),
    }
}

/// Decode a director tool call into an operation.
///
/// `acting` fills in the player of `move_player` and the subject of `check`
/// when the call leaves them out.
pub fn decode_tool_call(call: &ToolCall, acting: &ActorRef) -> Result<StateChange, DecodeError> {
    let args = Args::of(call)?;
    let change = match call.name.trim().to_lowercase().as_str() {
        "move_player" => {
            let player = match args.opt_str("player")? {
                Some(id) => PlayerId::new(id),
                None => match acting {
                    ActorRef::Player(id) => id.clone(),
                    ActorRef::Creature(_) => return Err(args.missing("player")),
                },
            };
            StateChange::MovePlayer {
                player,
                to_tile: TileId::new(args.str("to_tile")?),
            }
        }
        "transfer_item" => {
            let (item, owner) = decode_transfer(&args)?;
            StateChange::transfer(item, owner)
        }
        "set_flag" => {
            let name = args.str("flag")?;
            let flag = FlagName::parse(name).ok_or_else(|| args.invalid_str("flag", name))?;
            StateChange::SetFlag {
                target: decode_flag_target(&args)?,
                flag,
                value: args.bool_or("value", true)?,
            }
        }
        "run_item_hook" => StateChange::RunItemHook {
            hook: HookId::new(args.str("hook")?),
            item: ItemId::new(args.str("item")?),
            verb: args.opt_str("verb")?.map(str::to_lowercase),
        },
        "check" => StateChange::Check {
            check_type: CheckType::parse(args.str("check_type")?),
            subject: decode_subject(&args, acting)?,
            difficulty: args.i32("difficulty")?,
        },
        "set_creature_target" => StateChange::SetCreatureTarget {
            creature: CreatureId::new(args.str("creature")?),
            tile: args.opt_str("tile")?.map(TileId::new),
        },
        "move_creature" => StateChange::MoveCreature {
            creature: CreatureId::new(args.str("creature")?),
            to_tile: TileId::new(args.str("to_tile")?),
        },
        "record_event" => {
            let kind = args.str("target_kind")?;
            let id = args.str("target_id")?;
            let target = match kind.to_lowercase().as_str() {
                "tile" => EventTarget::Tile(TileId::new(id)),
                "player" => EventTarget::Player(PlayerId::new(id)),
                "creature" => EventTarget::Creature(CreatureId::new(id)),
                _ => return Err(args.invalid_str("target_kind", kind)),
            };
            StateChange::RecordEvent {
                target,
                text: args.str("text")?.to_string(),
            }
        }
        "set_tile_note" => StateChange::SetTileNote {
            tile: TileId::new(args.str("tile")?),
            note: args.opt_str("note")?.map(str::to_string),
        },
        _ => return Err(DecodeError::UnknownTool(call.name.clone())),
    };
    Ok(change)
}

/// Item and new owner of a `transfer_item` call. `contained_by` wins over
/// the owner pair.
pub(crate) fn decode_transfer(args: &Args<'_>) -> Result<(ItemId, Owner), DecodeError> {
    let item = ItemId::new(args.str("item")?);
    if let Some(container) = args.opt_str("contained_by")? {
        return Ok((item, Owner::Item(ItemId::new(container))));
    }
    let kind = args.str("owner_kind")?;
    let owner_kind = OwnerKind::parse(kind).ok_or_else(|| args.invalid_str("owner_kind", kind))?;
    Ok((item, Owner::from_parts(owner_kind, args.str("owner_id")?)))
}

fn decode_flag_target(args: &Args<'_>) -> Result<FlagTarget, DecodeError> {
    let kind = args.opt_str("target_kind")?.unwrap_or("session");
    match kind.to_lowercase().as_str() {
        "session" => Ok(FlagTarget::Session),
        "player" => Ok(FlagTarget::Player(PlayerId::new(args.str("target_id")?))),
        "creature" => Ok(FlagTarget::Creature(CreatureId::new(args.str("target_id")?))),
        _ => Err(args.invalid_str("target_kind", kind)),
    }
}

pub(crate) fn decode_subject(args: &Args<'_>, acting: &ActorRef) -> Result<ActorRef, DecodeError> {
    let Some(id) = args.opt_str("subject_id")? else {
        return Ok(acting.clone());
    };
    let kind = args.opt_str("subject_kind")?.unwrap_or("player");
    match kind.to_lowercase().as_str() {
        "player" => Ok(ActorRef::Player(PlayerId::new(id))),
        "creature" => Ok(ActorRef::Creature(CreatureId::new(id))),
        _ => Err(args.invalid_str("subject_kind", kind)),
    }
}
