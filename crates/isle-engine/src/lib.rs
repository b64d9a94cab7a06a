//! Turn resolution for the island survival engine.
//!
//! A player's command goes to an external [`Director`], whose tool calls are
//! decoded into a closed set of [`StateChange`] operations. The [`Applier`]
//! validates and applies them in order, rolling checks and running item
//! hooks along the way. The [`TurnEngine`] then advances the clock and lets
//! ghosts and monkeys act through their [`CreatureMind`]s.

/// Validated application of operations.
pub mod applier;
/// Director and creature-mind ports plus scripted stand-ins.
pub mod collaborator;
/// Player input parsing.
pub mod command;
/// Engine configuration.
pub mod config;
/// The turn engine.
pub mod engine;
/// Error types.
pub mod error;
/// Item action hooks.
pub mod hooks;
/// Creature intents and their translation.
pub mod intent;
/// The operation algebra.
pub mod operation;
/// Session persistence.
pub mod repository;
/// Tool calls from collaborators.
pub mod tool;
/// Creature-facing world views.
pub mod view;

pub use applier::{Applier, ApplyReport};
pub use collaborator::{CreatureMind, Director, DirectorReply, ScriptedDirector, ScriptedMind};
pub use command::{Parsed, PlayerCommand, parse_command};
pub use config::{EngineConfig, FailurePolicy, PhaseSchedule};
pub use engine::{CreatureTurnReport, TurnDecision, TurnEngine};
pub use error::{
    ApplyError, CollaboratorError, ControlSignal, DecodeError, EngineError, EngineResult,
    RepoError,
};
pub use hooks::{HookOutcome, HookRegistry, ItemHook, MoveSkeletonHook, OpenContainerHook};
pub use intent::{CreatureIntent, IntentTranslator, Translation, decode_intent};
pub use operation::{StateChange, decode_tool_call};
pub use repository::{InMemorySessionRepository, SessionRepository};
pub use tool::ToolCall;
pub use view::{ActorView, ItemSighting, PlayerSighting};
