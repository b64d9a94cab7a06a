//! Dice and check mechanics for the island survival engine.
//!
//! Provides a seedable [`DiceSource`], the [`CheckResolver`] that turns a
//! d20 roll (or another configured [`Die`]) plus a table-driven modifier into
//! a pass/fail [`CheckResult`], and the replaceable [`ModifierTable`] that
//! maps check types to stats.

pub mod check;
pub mod dice;
pub mod error;

pub use check::{
    CheckId, CheckRequest, CheckResolver, CheckResult, CheckType, ModifierRule, ModifierTable,
};
pub use dice::{DiceSource, Die, ScriptedDice, SeededDice};
pub use error::{MechError, MechResult};
