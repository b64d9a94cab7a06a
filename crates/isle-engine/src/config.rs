//! Configuration for the turn engine.

use isle_core::TimePhase;
use isle_mechanics::{Die, ModifierTable};

use crate::error::{EngineError, EngineResult};

/// What the applier does after an operation is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Skip every remaining operation in the sequence.
    #[default]
    Abort,
    /// Keep applying the remaining operations.
    Continue,
}

/// Maps turn numbers to time-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSchedule {
    /// First turn that is dark.
    pub dark_from_turn: u32,
    /// Turn at which midnight is reached.
    pub midnight_turn: u32,
}

impl Default for PhaseSchedule {
    fn default() -> Self {
        Self {
            dark_from_turn: 10,
            midnight_turn: 20,
        }
    }
}

impl PhaseSchedule {
    /// The phase for a turn number.
    pub fn phase_for(&self, turn: u32) -> TimePhase {
        if turn >= self.dark_from_turn {
            TimePhase::Dark
        } else {
            TimePhase::Light
        }
    }

    /// Whether midnight has been reached at this turn.
    pub fn is_midnight(&self, turn: u32) -> bool {
        turn >= self.midnight_turn
    }
}

/// Configuration for a [`TurnEngine`](crate::TurnEngine).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Dice seed. `None` rolls from OS entropy.
    pub seed: Option<u64>,
    /// Run ghost and monkey turns after every player turn.
    pub auto_process_creatures: bool,
    /// How many check results to keep for collaborators.
    pub recent_checks_capacity: usize,
    /// What to do after a rejected operation.
    pub failure_policy: FailurePolicy,
    /// Day/night brackets.
    pub phase_schedule: PhaseSchedule,
    /// Check modifiers.
    pub modifier_table: ModifierTable,
    /// Die rolled for every check.
    pub check_die: Die,
    /// Difficulty of the victim's PERCEPTION check against a monkey theft.
    pub steal_difficulty: i32,
    /// Narration used when a decision cannot be carried out.
    pub fallback_narration: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            auto_process_creatures: true,
            recent_checks_capacity: 10,
            failure_policy: FailurePolicy::Abort,
            phase_schedule: PhaseSchedule::default(),
            modifier_table: ModifierTable::default(),
            check_die: Die::D20,
            steal_difficulty: 12,
            fallback_narration: "Nothing happens.".to_string(),
        }
    }
}

impl EngineConfig {
    /// Set a fixed dice seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable automatic creature turns.
    pub fn with_auto_process_creatures(mut self, enabled: bool) -> Self {
        self.auto_process_creatures = enabled;
        self
    }

    /// Set the recent-checks buffer size (minimum 1).
    pub fn with_recent_checks_capacity(mut self, capacity: usize) -> Self {
        self.recent_checks_capacity = capacity.max(1);
        self
    }

    /// Set the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Set the phase schedule.
    pub fn with_phase_schedule(mut self, schedule: PhaseSchedule) -> Self {
        self.phase_schedule = schedule;
        self
    }

    /// Replace the modifier table.
    pub fn with_modifier_table(mut self, table: ModifierTable) -> Self {
        self.modifier_table = table;
        self
    }

    /// Load the modifier table from JSON.
    pub fn with_modifier_table_json(mut self, json: &str) -> EngineResult<Self> {
        self.modifier_table = ModifierTable::from_json(json)?;
        Ok(self)
    }

    /// Set the check die.
    pub fn with_check_die(mut self, die: Die) -> Self {
        self.check_die = die;
        self
    }

    /// Set the check die from notation like `"d20"`.
    pub fn with_check_die_str(mut self, notation: &str) -> EngineResult<Self> {
        self.check_die = Die::parse(notation)?;
        Ok(self)
    }

    /// Set the steal contest difficulty.
    pub fn with_steal_difficulty(mut self, difficulty: i32) -> Self {
        self.steal_difficulty = difficulty;
        self
    }

    /// Check that the schedule is coherent and the check buffer can hold
    /// at least one result.
    pub fn validate(&self) -> EngineResult<()> {
        if self.recent_checks_capacity == 0 {
            return Err(EngineError::InvalidConfig(
                "recent_checks_capacity must be at least 1".to_string(),
            ));
        }
        if self.check_die.sides() < 2 {
            return Err(EngineError::InvalidConfig(format!(
                "check die {} needs at least two sides",
                self.check_die
            )));
        }
        let s = self.phase_schedule;
        if s.dark_from_turn > s.midnight_turn {
            return Err(EngineError::InvalidConfig(format!(
                "dark_from_turn ({}) is after midnight_turn ({})",
                s.dark_from_turn, s.midnight_turn
            )));
        }
        Ok(())
    }
}
