//! External decision-makers consulted by the engine.
//!
//! The director decides what a player's command does; creature minds decide
//! what ghosts and monkeys do. Both answer in tool calls, which the engine
//! decodes and validates itself. Their reasoning is opaque to the engine.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use isle_core::World;
use serde::{Deserialize, Serialize};

use crate::command::PlayerCommand;
use crate::error::CollaboratorError;
use crate::tool::ToolCall;
use crate::view::ActorView;

/// The director's answer to a player command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectorReply {
    /// Prose describing the outcome.
    #[serde(default)]
    pub narration: String,
    /// Proposed operations, in order.
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl DirectorReply {
    /// A reply with narration and no operations.
    pub fn narrate(narration: impl Into<String>) -> Self {
        Self {
            narration: narration.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Builder: append a tool call.
    pub fn with_call(mut self, call: ToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }
}

/// Decides the outcome of player commands.
#[cfg_attr(test, mockall::automock)]
pub trait Director: Send + Sync {
    /// Propose narration and operations for a command.
    fn decide(
        &self,
        world: &World,
        command: &PlayerCommand,
    ) -> Result<DirectorReply, CollaboratorError>;
}

/// Decides what a creature does on its turn.
#[cfg_attr(test, mockall::automock)]
pub trait CreatureMind: Send + Sync {
    /// Pick an intent, or `None` to do nothing.
    fn decide(&self, view: &ActorView) -> Result<Option<ToolCall>, CollaboratorError>;
}

impl<T: Director + ?Sized> Director for Arc<T> {
    fn decide(
        &self,
        world: &World,
        command: &PlayerCommand,
    ) -> Result<DirectorReply, CollaboratorError> {
        (**self).decide(world, command)
    }
}

impl<T: CreatureMind + ?Sized> CreatureMind for Arc<T> {
    fn decide(&self, view: &ActorView) -> Result<Option<ToolCall>, CollaboratorError> {
        (**self).decide(view)
    }
}

/// A director that replays queued replies, then stays silent.
#[derive(Debug, Default)]
pub struct ScriptedDirector {
    replies: Mutex<VecDeque<Result<DirectorReply, CollaboratorError>>>,
}

impl ScriptedDirector {
    /// Create a director replaying `replies` in order.
    pub fn new(replies: impl IntoIterator<Item = DirectorReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Ok).collect()),
        }
    }

    /// Queue a reply.
    pub fn push(&self, reply: DirectorReply) {
        self.push_result(Ok(reply));
    }

    /// Queue a failure.
    pub fn push_error(&self, error: CollaboratorError) {
        self.push_result(Err(error));
    }

    fn push_result(&self, result: Result<DirectorReply, CollaboratorError>) {
        if let Ok(mut queue) = self.replies.lock() {
            queue.push_back(result);
        }
    }
}

impl Director for ScriptedDirector {
    fn decide(
        &self,
        _world: &World,
        _command: &PlayerCommand,
    ) -> Result<DirectorReply, CollaboratorError> {
        let mut queue = self
            .replies
            .lock()
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;
        queue.pop_front().unwrap_or_else(|| Ok(DirectorReply::default()))
    }
}

/// A creature mind that replays queued intents, then does nothing.
#[derive(Debug, Default)]
pub struct ScriptedMind {
    intents: Mutex<VecDeque<Result<Option<ToolCall>, CollaboratorError>>>,
}

impl ScriptedMind {
    /// Create a mind replaying `intents` in order.
    pub fn new(intents: impl IntoIterator<Item = Option<ToolCall>>) -> Self {
        Self {
            intents: Mutex::new(intents.into_iter().map(Ok).collect()),
        }
    }

    /// Queue an intent.
    pub fn push(&self, intent: Option<ToolCall>) {
        if let Ok(mut queue) = self.intents.lock() {
            queue.push_back(Ok(intent));
        }
    }

    /// Queue a failure.
    pub fn push_error(&self, error: CollaboratorError) {
        if let Ok(mut queue) = self.intents.lock() {
            queue.push_back(Err(error));
        }
    }
}

impl CreatureMind for ScriptedMind {
    fn decide(&self, _view: &ActorView) -> Result<Option<ToolCall>, CollaboratorError> {
        let mut queue = self
            .intents
            .lock()
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;
        queue.pop_front().unwrap_or(Ok(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isle_core::{PlayerId, Session, SessionId};
    use serde_json::json;

    fn command() -> PlayerCommand {
        PlayerCommand::new(PlayerId::new("p1"), "look")
    }

    fn world() -> World {
        World::new(Session::new(SessionId::from_uuid(uuid::Uuid::nil()), 5))
    }

    #[test]
    fn scripted_director_replays_then_goes_quiet() {
        let director = ScriptedDirector::new([DirectorReply::narrate("The surf rolls in.")]);
        director.push_error(CollaboratorError::Timeout);
        let world = world();
        assert_eq!(
            director.decide(&world, &command()).unwrap().narration,
            "The surf rolls in."
        );
        assert_eq!(
            director.decide(&world, &command()),
            Err(CollaboratorError::Timeout)
        );
        assert_eq!(
            director.decide(&world, &command()).unwrap(),
            DirectorReply::default()
        );
    }

    #[test]
    fn reply_deserializes_with_missing_fields() {
        let reply: DirectorReply = serde_json::from_value(json!({
            "tool_calls": [{"name": "move_player", "arguments": {"to_tile": "beach"}}]
        }))
        .unwrap();
        assert!(reply.narration.is_empty());
        assert_eq!(reply.tool_calls[0].name, "move_player");
    }
}
