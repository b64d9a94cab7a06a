//! Error types for turn resolution.
//!
//! Four layers of failure are kept apart: [`DecodeError`] for collaborator
//! output that cannot be understood, [`CollaboratorError`] for collaborators
//! that could not answer, [`ApplyError`] for a single operation the world
//! rejected, and [`EngineError`] for what reaches the caller of the engine.

use isle_core::{CreatureRole, HookId, IsleError, ItemId, PlayerId, SessionId};
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Why a line of player input did not become a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// The line was empty or whitespace.
    Blank,
    /// The player asked to quit.
    Quit,
}

impl std::fmt::Display for ControlSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank => write!(f, "blank input"),
            Self::Quit => write!(f, "quit"),
        }
    }
}

/// Errors surfaced to the caller of the turn engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input was a control signal for the outer loop, not a turn.
    #[error("control signal: {0}")]
    ControlSignal(ControlSignal),

    /// The acting player does not exist in the world.
    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerId),

    /// A hook with this id is already registered.
    #[error("hook already registered: {0}")]
    DuplicateHook(HookId),

    /// The engine configuration is invalid.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Mechanics configuration error.
    #[error("{0}")]
    Mechanics(#[from] isle_mechanics::MechError),
}

/// A single operation could not be applied.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The world rejected the mutation.
    #[error("{0}")]
    World(#[from] IsleError),

    /// No hook is registered under this id.
    #[error("unknown hook: {0}")]
    UnknownHook(HookId),

    /// The item's type does not use the requested hook.
    #[error("item {item} does not react to hook {requested}")]
    HookMismatch {
        /// The targeted item.
        item: ItemId,
        /// The hook that was asked for.
        requested: HookId,
    },

    /// The hook does not handle the verb.
    #[error("hook {hook} does not support verb \"{verb}\"")]
    UnsupportedVerb {
        /// The hook.
        hook: HookId,
        /// The rejected verb.
        verb: String,
    },

    /// A hook tried to run another hook.
    #[error("hook {0} returned a nested run_item_hook")]
    NestedHook(HookId),

    /// A hook could not produce its outcome.
    #[error("hook {hook} failed: {reason}")]
    Hook {
        /// The hook.
        hook: HookId,
        /// What went wrong.
        reason: String,
    },

    /// A creature intent could not be carried out.
    #[error("{role} intent rejected: {reason}")]
    Intent {
        /// Role of the acting creature.
        role: CreatureRole,
        /// What went wrong.
        reason: String,
    },
}

impl ApplyError {
    /// Shorthand for [`ApplyError::Hook`].
    pub fn hook(hook: &HookId, reason: impl ToString) -> Self {
        Self::Hook {
            hook: hook.clone(),
            reason: reason.to_string(),
        }
    }

    /// Shorthand for [`ApplyError::Intent`].
    pub fn intent(role: CreatureRole, reason: impl ToString) -> Self {
        Self::Intent {
            role,
            reason: reason.to_string(),
        }
    }
}

/// Collaborator output that could not be decoded into an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The tool name is not part of the vocabulary.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The arguments were not a JSON object.
    #[error("{tool}: arguments must be an object")]
    NotAnObject {
        /// The tool.
        tool: String,
    },

    /// A required argument is missing.
    #[error("{tool}: missing field \"{field}\"")]
    MissingField {
        /// The tool.
        tool: String,
        /// The missing field.
        field: &'static str,
    },

    /// An argument has the wrong type or an unrecognized value.
    #[error("{tool}: invalid {field}: {value}")]
    InvalidValue {
        /// The tool.
        tool: String,
        /// The offending field.
        field: &'static str,
        /// The value as received.
        value: String,
    },

    /// The intent exists but is not available to this role.
    #[error("intent {intent} is not available to {role}")]
    NotAllowed {
        /// The intent name.
        intent: String,
        /// The acting role.
        role: CreatureRole,
    },
}

/// A collaborator could not produce a decision.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    /// The collaborator could not be reached.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// The collaborator did not answer in time.
    #[error("collaborator timed out")]
    Timeout,

    /// The collaborator answered with something unusable.
    #[error("malformed collaborator reply: {0}")]
    Malformed(String),
}

/// Session repository errors.
#[derive(Debug, Error)]
pub enum RepoError {
    /// No session with this id.
    #[error("session not found: {0}")]
    NotFound(SessionId),

    /// A session with this id already exists.
    #[error("session already exists: {0}")]
    AlreadyExists(SessionId),

    /// The storage lock was poisoned by a panicking writer.
    #[error("session storage unavailable: {0}")]
    Storage(String),
}
