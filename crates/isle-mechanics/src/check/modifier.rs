//! The replaceable modifier table.

use std::collections::BTreeMap;

use isle_core::{TimePhase, World};
use serde::{Deserialize, Serialize};

use super::{CheckRequest, CheckType};
use crate::error::MechResult;

/// How the modifier for one check type is derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ModifierRule {
    /// The subject's stat.
    Stat {
        /// Stat name, e.g. `AWR`.
        stat: String,
    },
    /// The subject's stat plus a bonus while the session is in `phase`.
    StatWithPhaseBonus {
        /// Stat name.
        stat: String,
        /// Phase in which the bonus applies.
        phase: TimePhase,
        /// Bonus added during that phase.
        bonus: i32,
    },
    /// A fixed value.
    Flat {
        /// The modifier.
        value: i32,
    },
}

impl ModifierRule {
    /// Shorthand for [`ModifierRule::Stat`].
    pub fn stat(stat: impl Into<String>) -> Self {
        Self::Stat { stat: stat.into() }
    }

    /// Compute the modifier for a request. A missing subject yields 0.
    pub fn modifier(&self, world: &World, request: &CheckRequest) -> i32 {
        let Some(actor) = world.actor(&request.subject) else {
            return 0;
        };
        match self {
            Self::Stat { stat } => actor.stat(stat).unwrap_or(0),
            Self::StatWithPhaseBonus { stat, phase, bonus } => {
                let base = actor.stat(stat).unwrap_or(0);
                if world.session().phase() == *phase {
                    base.saturating_add(*bonus)
                } else {
                    base
                }
            }
            Self::Flat { value } => *value,
        }
    }
}

/// Maps check types to modifier rules. Unmapped types get 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifierTable {
    rules: BTreeMap<CheckType, ModifierRule>,
}

impl Default for ModifierTable {
    fn default() -> Self {
        Self::empty()
            .with_rule(CheckType::Perception, ModifierRule::stat("AWR"))
            .with_rule(CheckType::Intimidation, ModifierRule::stat("CHA"))
            .with_rule(CheckType::Climb, ModifierRule::stat("AGI"))
            .with_rule(CheckType::Quicksand, ModifierRule::stat("AGI"))
            .with_rule(
                CheckType::Hearing,
                ModifierRule::StatWithPhaseBonus {
                    stat: "AWR".to_string(),
                    phase: TimePhase::Dark,
                    bonus: 2,
                },
            )
    }
}

impl ModifierTable {
    /// A table with no rules; every check gets modifier 0.
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Builder: map a check type to a rule, replacing any existing one.
    pub fn with_rule(mut self, check_type: CheckType, rule: ModifierRule) -> Self {
        self.rules.insert(check_type, rule);
        self
    }

    /// Map a check type to a rule in place.
    pub fn set_rule(&mut self, check_type: CheckType, rule: ModifierRule) {
        self.rules.insert(check_type, rule);
    }

    /// The rule for a check type.
    pub fn rule(&self, check_type: &CheckType) -> Option<&ModifierRule> {
        self.rules.get(check_type)
    }

    /// Compute the modifier for a request.
    pub fn modifier(&self, world: &World, request: &CheckRequest) -> i32 {
        self.rules
            .get(&request.check_type)
            .map_or(0, |rule| rule.modifier(world, request))
    }

    /// Load a table from JSON, e.g.
    /// `{"PERCEPTION": {"rule": "stat", "stat": "AWR"}}`.
    pub fn from_json(json: &str) -> MechResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the table as JSON.
    pub fn to_json(&self) -> MechResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MechError;
    use isle_core::{ActorRef, Player, PlayerId, Position, Session, SessionId, Tile, TileId};

    fn world(phase: TimePhase) -> World {
        let mut world = World::new(Session::new(SessionId::from_uuid(uuid::Uuid::nil()), 10));
        world
            .add_tile(Tile::new("beach", Position::new(0, 0), "beach"))
            .unwrap();
        world
            .add_player(
                Player::new("p1", "Robin", TileId::new("beach"))
                    .with_stat("AWR", 3)
                    .with_stat("CHA", -1),
            )
            .unwrap();
        world.session_mut().set_phase(phase);
        world
    }

    fn p1() -> ActorRef {
        ActorRef::Player(PlayerId::new("p1"))
    }

    #[test]
    fn default_table_reads_stats() {
        let world = world(TimePhase::Light);
        let table = ModifierTable::default();
        let req = CheckRequest::new(CheckType::Perception, p1(), 10);
        assert_eq!(table.modifier(&world, &req), 3);
        let req = CheckRequest::new(CheckType::Intimidation, p1(), 10);
        assert_eq!(table.modifier(&world, &req), -1);
        let req = CheckRequest::new(CheckType::Climb, p1(), 10);
        assert_eq!(table.modifier(&world, &req), 0);
    }

    #[test]
    fn hearing_bonus_only_in_dark() {
        let table = ModifierTable::default();
        let req = CheckRequest::new(CheckType::Hearing, p1(), 10);
        assert_eq!(table.modifier(&world(TimePhase::Light), &req), 3);
        assert_eq!(table.modifier(&world(TimePhase::Dark), &req), 5);
    }

    #[test]
    fn unmapped_type_and_missing_subject_are_zero() {
        let world = world(TimePhase::Dark);
        let table = ModifierTable::default();
        let req = CheckRequest::new("SWIM", p1(), 10);
        assert_eq!(table.modifier(&world, &req), 0);
        let ghost = ActorRef::Player(PlayerId::new("nobody"));
        let req = CheckRequest::new(CheckType::Hearing, ghost, 10);
        assert_eq!(table.modifier(&world, &req), 0);
    }

    #[test]
    fn table_loads_from_json() {
        let json = r#"{
            "perception": {"rule": "flat", "value": 4},
            "SWIM": {"rule": "stat", "stat": "AGI"}
        }"#;
        let table = ModifierTable::from_json(json).unwrap();
        assert_eq!(
            table.rule(&CheckType::Perception),
            Some(&ModifierRule::Flat { value: 4 })
        );
        assert!(table.rule(&CheckType::Hearing).is_none());
        let round = ModifierTable::from_json(&table.to_json().unwrap()).unwrap();
        assert_eq!(round, table);
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = ModifierTable::from_json(r#"{"CLIMB": {"rule": "dance"}}"#).unwrap_err();
        assert!(matches!(err, MechError::InvalidConfig(_)));
    }
}
