//! The skeleton that should not have been moved.

use isle_core::{ActorRef, EventTarget, FlagName, FlagTarget, HookId, ItemId, World};

use super::{HookOutcome, ItemHook, item_name, spill_contents};
use crate::error::ApplyError;
use crate::operation::StateChange;

/// Moving the skeleton spills whatever it holds and wakes the ghost.
#[derive(Debug, Clone)]
pub struct MoveSkeletonHook {
    id: HookId,
}

impl MoveSkeletonHook {
    /// Hook id used by skeleton item types.
    pub const ID: &'static str = "move_skeleton";

    /// Create the hook.
    pub fn new() -> Self {
        Self {
            id: HookId::new(Self::ID),
        }
    }
}

impl Default for MoveSkeletonHook {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemHook for MoveSkeletonHook {
    fn id(&self) -> &HookId {
        &self.id
    }

    fn verbs(&self) -> &[&'static str] {
        &["move", "push", "drag"]
    }

    fn apply(
        &self,
        world: &World,
        actor: &ActorRef,
        item: &ItemId,
    ) -> Result<HookOutcome, ApplyError> {
        let body = world
            .actor(actor)
            .ok_or_else(|| ApplyError::hook(&self.id, format!("no such actor {actor}")))?;
        let tile = body.location.clone();
        let name = item_name(world, item);

        let mut changes = spill_contents(world, item, &tile);
        let spilled = changes.len();
        changes.push(StateChange::SetFlag {
            target: FlagTarget::Session,
            flag: FlagName::GhostAwakened,
            value: true,
        });
        changes.push(StateChange::RecordEvent {
            target: EventTarget::Tile(tile),
            text: format!("{} disturbed the {}.", body.name, name.to_lowercase()),
        });
        changes.push(StateChange::RecordEvent {
            target: EventTarget::from(actor.clone()),
            text: format!("You disturbed the {}.", name.to_lowercase()),
        });

        let mut narration = vec![format!(
            "The {} shifts with a dry rattle.",
            name.to_lowercase()
        )];
        if spilled > 0 {
            narration.push(format!("Something falls from its ribs ({spilled})."));
        }
        narration.push("A cold wind moves through the trees.".to_string());

        Ok(HookOutcome { narration, changes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::fixtures;
    use isle_core::{Owner, PlayerId, TileId};

    #[test]
    fn spills_contents_and_wakes_ghost() {
        let world = fixtures::crypt();
        let actor = ActorRef::Player(PlayerId::new("p1"));
        let outcome = MoveSkeletonHook::new()
            .apply(&world, &actor, &ItemId::new("bones"))
            .unwrap();

        let transfers: Vec<_> = outcome
            .changes
            .iter()
            .filter_map(StateChange::transfer_owner)
            .collect();
        assert_eq!(transfers.len(), 2);
        assert!(
            transfers
                .iter()
                .all(|o| *o == Owner::Tile(TileId::new("crypt")))
        );
        assert!(outcome.changes.contains(&StateChange::SetFlag {
            target: FlagTarget::Session,
            flag: FlagName::GhostAwakened,
            value: true,
        }));
        let events = outcome
            .changes
            .iter()
            .filter(|c| matches!(c, StateChange::RecordEvent { .. }))
            .count();
        assert_eq!(events, 2);
    }

    #[test]
    fn hook_does_not_mutate_world() {
        let world = fixtures::crypt();
        let before = world.clone();
        let actor = ActorRef::Player(PlayerId::new("p1"));
        let _ = MoveSkeletonHook::new().apply(&world, &actor, &ItemId::new("bones"));
        assert_eq!(world, before);
    }

    #[test]
    fn unknown_actor_is_hook_error() {
        let world = fixtures::crypt();
        let actor = ActorRef::Player(PlayerId::new("nobody"));
        assert!(matches!(
            MoveSkeletonHook::new().apply(&world, &actor, &ItemId::new("bones")),
            Err(ApplyError::Hook { .. })
        ));
    }
}
