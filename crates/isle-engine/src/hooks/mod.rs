//! Item action hooks.
//!
//! A hook is a scripted reaction attached to an item type. Hooks only read
//! the world: they return narration plus further operations, and the applier
//! stays the single place where the world changes.

pub mod container;
pub mod skeleton;

pub use container::OpenContainerHook;
pub use skeleton::MoveSkeletonHook;

use std::collections::BTreeMap;

use isle_core::{ActorRef, HookId, ItemId, Owner, TileId, World};

use crate::error::{ApplyError, EngineError, EngineResult};
use crate::operation::StateChange;

/// What a hook produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookOutcome {
    /// Narration describing the reaction.
    pub narration: Vec<String>,
    /// Operations to apply immediately.
    pub changes: Vec<StateChange>,
}

/// A scripted reaction to verbs applied to an item.
pub trait ItemHook: Send + Sync {
    /// The hook identifier item types refer to.
    fn id(&self) -> &HookId;

    /// The verbs this hook reacts to.
    fn verbs(&self) -> &[&'static str];

    /// Produce the reaction of `item` to `actor`. Must not mutate anything.
    fn apply(&self, world: &World, actor: &ActorRef, item: &ItemId)
    -> Result<HookOutcome, ApplyError>;
}

/// Hooks by identifier. Built once and handed to the engine.
#[derive(Default)]
pub struct HookRegistry {
    hooks: BTreeMap<HookId, Box<dyn ItemHook>>,
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl HookRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in hooks.
    pub fn with_defaults() -> Self {
        let mut hooks: BTreeMap<HookId, Box<dyn ItemHook>> = BTreeMap::new();
        let skeleton = MoveSkeletonHook::new();
        hooks.insert(skeleton.id().clone(), Box::new(skeleton));
        let container = OpenContainerHook::new();
        hooks.insert(container.id().clone(), Box::new(container));
        Self { hooks }
    }

    /// Register a hook. Ids must be unique.
    pub fn register(&mut self, hook: impl ItemHook + 'static) -> EngineResult<()> {
        let id = hook.id().clone();
        if self.hooks.contains_key(&id) {
            return Err(EngineError::DuplicateHook(id));
        }
        self.hooks.insert(id, Box::new(hook));
        Ok(())
    }

    /// Look up a hook.
    pub fn find(&self, id: &HookId) -> Option<&dyn ItemHook> {
        self.hooks.get(id).map(|h| h.as_ref())
    }

    /// Whether a registered hook handles `verb` (case-insensitive).
    pub fn supports(&self, id: &HookId, verb: &str) -> bool {
        self.find(id)
            .is_some_and(|h| h.verbs().iter().any(|v| v.eq_ignore_ascii_case(verb)))
    }

    /// Registered hook ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &HookId> {
        self.hooks.keys()
    }

    /// Validate a hook invocation and run it.
    ///
    /// The hook must exist, the item must exist and its type must name this
    /// hook, and a given verb must be one the hook handles.
    pub fn dispatch(
        &self,
        world: &World,
        actor: &ActorRef,
        hook_id: &HookId,
        item: &ItemId,
        verb: Option<&str>,
    ) -> Result<HookOutcome, ApplyError> {
        let hook = self
            .find(hook_id)
            .ok_or_else(|| ApplyError::UnknownHook(hook_id.clone()))?;
        if world.item(item).is_none() {
            return Err(isle_core::IsleError::ItemNotFound(item.clone()).into());
        }
        let item_hook = world.item_type_of(item).and_then(|t| t.hook.as_ref());
        if item_hook != Some(hook_id) {
            return Err(ApplyError::HookMismatch {
                item: item.clone(),
                requested: hook_id.clone(),
            });
        }
        if let Some(verb) = verb {
            if !self.supports(hook_id, verb) {
                return Err(ApplyError::UnsupportedVerb {
                    hook: hook_id.clone(),
                    verb: verb.to_string(),
                });
            }
        }
        hook.apply(world, actor, item)
    }
}

/// Transfers moving every item nested directly in `container` onto `tile`.
pub(crate) fn spill_contents(world: &World, container: &ItemId, tile: &TileId) -> Vec<StateChange> {
    world
        .contents_of(container)
        .into_iter()
        .map(|nested| StateChange::transfer(nested.id.clone(), Owner::Tile(tile.clone())))
        .collect()
}

/// Display name of an item, falling back to its id.
pub(crate) fn item_name(world: &World, item: &ItemId) -> String {
    world
        .item_type_of(item)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| item.to_string())
}


#[cfg(test)]
mod tests {
    use super::*;
    use isle_core::PlayerId;

    struct Dummy(HookId);

    impl ItemHook for Dummy {
        fn id(&self) -> &HookId {
            &self.0
        }

        fn verbs(&self) -> &[&'static str] {
            &["poke"]
        }

        fn apply(
            &self,
            _world: &World,
            _actor: &ActorRef,
            _item: &ItemId,
        ) -> Result<HookOutcome, ApplyError> {
            Ok(HookOutcome::default())
        }
    }

    fn p1() -> ActorRef {
        ActorRef::Player(PlayerId::new("p1"))
    }

    #[test]
    fn defaults_registered() {
        let registry = HookRegistry::with_defaults();
        assert!(registry.find(&HookId::new("move_skeleton")).is_some());
        assert!(registry.supports(&HookId::new("move_skeleton"), "PUSH"));
        assert!(!registry.supports(&HookId::new("move_skeleton"), "eat"));
        assert!(registry.supports(&HookId::new("open_container"), "open"));
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut registry = HookRegistry::new();
        registry.register(Dummy(HookId::new("poke"))).unwrap();
        assert!(matches!(
            registry.register(Dummy(HookId::new("poke"))),
            Err(EngineError::DuplicateHook(_))
        ));
    }

    #[test]
    fn dispatch_validates_hook_item_and_verb() {
        let world = fixtures::crypt();
        let registry = HookRegistry::with_defaults();
        let skeleton = HookId::new("move_skeleton");

        assert!(matches!(
            registry.dispatch(&world, &p1(), &HookId::new("nope"), &"bones".into(), None),
            Err(ApplyError::UnknownHook(_))
        ));
        assert!(matches!(
            registry.dispatch(&world, &p1(), &skeleton, &"missing".into(), None),
            Err(ApplyError::World(_))
        ));
        assert!(matches!(
            registry.dispatch(&world, &p1(), &skeleton, &"chest".into(), None),
            Err(ApplyError::HookMismatch { .. })
        ));
        assert!(matches!(
            registry.dispatch(&world, &p1(), &skeleton, &"bones".into(), Some("lick")),
            Err(ApplyError::UnsupportedVerb { .. })
        ));
        assert!(
            registry
                .dispatch(&world, &p1(), &skeleton, &"bones".into(), Some("drag"))
                .is_ok()
        );
    }
}
