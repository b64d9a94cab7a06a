//! Opening chests, crates, and other containers.

use isle_core::{ActorRef, EventTarget, HookId, ItemId, World};

use super::{HookOutcome, ItemHook, item_name, spill_contents};
use crate::error::ApplyError;
use crate::operation::StateChange;

/// Opening a container tips its contents onto the actor's tile.
#[derive(Debug, Clone)]
pub struct OpenContainerHook {
    id: HookId,
}

impl OpenContainerHook {
    /// Hook id used by container item types.
    pub const ID: &'static str = "open_container";

    /// Create the hook.
    pub fn new() -> Self {
        Self {
            id: HookId::new(Self::ID),
        }
    }
}

impl Default for OpenContainerHook {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemHook for OpenContainerHook {
    fn id(&self) -> &HookId {
        &self.id
    }

    fn verbs(&self) -> &[&'static str] {
        &["open", "search"]
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
        let name = item_name(world, item).to_lowercase();

        let mut changes = spill_contents(world, item, &tile);
        let narration = if changes.is_empty() {
            vec![format!("The {name} is empty.")]
        } else {
            vec![format!("{} opens the {name}.", body.name)]
        };
        changes.push(StateChange::RecordEvent {
            target: EventTarget::Tile(tile),
            text: format!("{} opened the {name}.", body.name),
        });
        Ok(HookOutcome { narration, changes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::fixtures;
    use isle_core::PlayerId;

    #[test]
    fn opening_spills_and_records() {
        let world = fixtures::crypt();
        let actor = ActorRef::Player(PlayerId::new("p1"));
        let outcome = OpenContainerHook::new()
            .apply(&world, &actor, &ItemId::new("chest"))
            .unwrap();
        assert_eq!(outcome.changes.len(), 2);
        assert_eq!(outcome.narration, vec!["Robin opens the chest.".to_string()]);
    }
}
