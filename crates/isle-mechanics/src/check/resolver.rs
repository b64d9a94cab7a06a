//! Check evaluation.

use isle_core::World;

use super::{CheckId, CheckRequest, CheckResult, ModifierTable};
use crate::dice::{DiceSource, Die};

/// Rolls checks against a modifier table.
#[derive(Debug, Clone)]
pub struct CheckResolver<D> {
    dice: D,
    die: Die,
    table: ModifierTable,
}

impl<D: DiceSource> CheckResolver<D> {
    /// Create a resolver with the given dice and modifier table.
    pub fn new(dice: D, table: ModifierTable) -> Self {
        Self {
            dice,
            die: Die::D20,
            table,
        }
    }

    /// Roll checks on `die` instead of a d20.
    pub fn with_die(mut self, die: Die) -> Self {
        self.die = die;
        self
    }

    /// The die rolled for every check.
    pub fn die(&self) -> Die {
        self.die
    }

    /// The active modifier table.
    pub fn table(&self) -> &ModifierTable {
        &self.table
    }

    /// Replace the modifier table wholesale.
    pub fn set_table(&mut self, table: ModifierTable) {
        self.table = table;
    }

    /// Access the underlying dice.
    pub fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }

    /// Roll the check die, add the modifier, and compare against the difficulty.
    pub fn evaluate(&mut self, world: &World, request: &CheckRequest) -> CheckResult {
        let roll = self.dice.roll_die(self.die);
        let modifier = self.table.modifier(world, request);
        let total = i32::try_from(roll)
            .unwrap_or(i32::MAX)
            .saturating_add(modifier);
        CheckResult {
            id: CheckId::next(),
            check_type: request.check_type.clone(),
            subject: request.subject.clone(),
            difficulty: request.difficulty,
            roll,
            modifier,
            total,
            success: total >= request.difficulty,
        }
    }
}
