//! Session bookkeeping: turn counter, time-of-day phase, and flags.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IsleError, IsleResult};
use crate::ids::{CreatureId, PlayerId, SessionId};

/// Time-of-day phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePhase {
    /// Daylight.
    #[default]
    Light,
    /// Night.
    Dark,
}

impl fmt::Display for TimePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

/// Which kind of target a flag may be set on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagScope {
    /// The session itself.
    Session,
    /// A player or creature.
    Actor,
}

/// The closed set of well-known flag names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlagName {
    /// The ghost has been disturbed and now takes turns.
    GhostAwakened,
    /// The midnight threshold has been crossed.
    MidnightReached,
    /// The signal fire on the island has been lit.
    SignalFireLit,
    /// The actor is hiding.
    Hidden,
    /// The actor is frightened.
    Frightened,
}

impl FlagName {
    /// Every known flag.
    pub const ALL: [FlagName; 5] = [
        Self::GhostAwakened,
        Self::MidnightReached,
        Self::SignalFireLit,
        Self::Hidden,
        Self::Frightened,
    ];

    /// The scope this flag belongs to.
    pub fn scope(self) -> FlagScope {
        match self {
            Self::GhostAwakened | Self::MidnightReached | Self::SignalFireLit => {
                FlagScope::Session
            }
            Self::Hidden | Self::Frightened => FlagScope::Actor,
        }
    }

    /// The canonical camelCase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GhostAwakened => "ghostAwakened",
            Self::MidnightReached => "midnightReached",
            Self::SignalFireLit => "signalFireLit",
            Self::Hidden => "hidden",
            Self::Frightened => "frightened",
        }
    }

    /// Parse a flag name, accepting camelCase, snake_case, or any casing.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|flag| flag.as_str().to_lowercase() == normalized)
    }
}

impl fmt::Display for FlagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a flag is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FlagTarget {
    /// The session.
    Session,
    /// A player.
    Player(PlayerId),
    /// A creature.
    Creature(CreatureId),
}

impl FlagTarget {
    /// The scope of this target.
    pub fn scope(&self) -> FlagScope {
        match self {
            Self::Session => FlagScope::Session,
            Self::Player(_) | Self::Creature(_) => FlagScope::Actor,
        }
    }
}

impl fmt::Display for FlagTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session => write!(f, "session"),
            Self::Player(id) => write!(f, "player:{id}"),
            Self::Creature(id) => write!(f, "creature:{id}"),
        }
    }
}

/// Turn counter, phase, and session-scoped flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier.
    pub id: SessionId,
    /// The turn count after which the game ends.
    pub max_turns: u32,
    turn: u32,
    phase: TimePhase,
    flags: BTreeMap<FlagName, bool>,
}

impl Session {
    /// Create a session at turn 0 in daylight.
    pub fn new(id: SessionId, max_turns: u32) -> Self {
        Self {
            id,
            max_turns,
            turn: 0,
            phase: TimePhase::Light,
            flags: BTreeMap::new(),
        }
    }

    /// Current turn number.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Current time phase.
    pub fn phase(&self) -> TimePhase {
        self.phase
    }

    /// Increment the turn counter by one. Returns the new turn.
    pub fn advance_turn(&mut self) -> u32 {
        self.turn = self.turn.saturating_add(1);
        self.turn
    }

    /// Set the time phase.
    pub fn set_phase(&mut self, phase: TimePhase) {
        self.phase = phase;
    }

    /// Whether the turn limit has been reached.
    pub fn turns_exhausted(&self) -> bool {
        self.turn >= self.max_turns
    }

    /// Read a session flag; unset flags read as false.
    pub fn flag(&self, name: FlagName) -> bool {
        self.flags.get(&name).copied().unwrap_or(false)
    }

    /// Set a session flag regardless of its prior value.
    pub fn set_flag(&mut self, name: FlagName, value: bool) -> IsleResult<()> {
        if name.scope() != FlagScope::Session {
            return Err(IsleError::FlagScopeMismatch {
                flag: name,
                target: FlagTarget::Session,
            });
        }
        self.flags.insert(name, value);
        Ok(())
    }

    /// Iterate over explicitly set flags.
    pub fn flags(&self) -> impl Iterator<Item = (FlagName, bool)> + '_ {
        self.flags.iter().map(|(k, v)| (*k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(SessionId::from_uuid(uuid::Uuid::nil()), 10)
    }

    #[test]
    fn new_session_starts_at_turn_zero_in_light() {
        let s = session();
        assert_eq!(s.turn(), 0);
        assert_eq!(s.phase(), TimePhase::Light);
        assert!(!s.flag(FlagName::GhostAwakened));
    }

    #[test]
    fn advance_turn_increments_by_one() {
        let mut s = session();
        assert_eq!(s.advance_turn(), 1);
        assert_eq!(s.advance_turn(), 2);
        assert!(!s.turns_exhausted());
    }

    #[test]
    fn set_flag_is_idempotent() {
        let mut s = session();
        s.set_flag(FlagName::GhostAwakened, true).unwrap();
        let once = s.clone();
        s.set_flag(FlagName::GhostAwakened, true).unwrap();
        assert_eq!(s, once);
    }

    #[test]
    fn actor_flag_rejected_on_session() {
        let mut s = session();
        assert!(matches!(
            s.set_flag(FlagName::Hidden, true),
            Err(IsleError::FlagScopeMismatch { .. })
        ));
    }

    #[test]
    fn flag_name_parse_variants() {
        assert_eq!(FlagName::parse("ghostAwakened"), Some(FlagName::GhostAwakened));
        assert_eq!(FlagName::parse("ghost_awakened"), Some(FlagName::GhostAwakened));
        assert_eq!(FlagName::parse("MIDNIGHTREACHED"), Some(FlagName::MidnightReached));
        assert_eq!(FlagName::parse("unknown"), None);
    }

    #[test]
    fn flag_name_serializes_camel_case() {
        let json = serde_json::to_string(&FlagName::SignalFireLit).unwrap();
        assert_eq!(json, "\"signalFireLit\"");
    }

    #[test]
    fn flag_target_serde_shape() {
        let json = serde_json::to_string(&FlagTarget::Session).unwrap();
        assert_eq!(json, r#"{"kind":"session"}"#);
        let target: FlagTarget = serde_json::from_str(r#"{"kind":"player","id":"p1"}"#).unwrap();
        assert_eq!(target, FlagTarget::Player(PlayerId::new("p1")));
    }
}
