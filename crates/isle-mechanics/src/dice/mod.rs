//! Dice types and random sources.
//!
//! A [`DiceSource`] produces uniform rolls in `[1, sides]`. [`SeededDice`]
//! is reproducible for a fixed seed; [`ScriptedDice`] replays a fixed
//! sequence for replays and tests.

pub mod source;

pub use source::{ScriptedDice, SeededDice};

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};

/// Something that can roll dice.
pub trait DiceSource {
    /// Roll one die with `sides` faces, returning a value in `[1, sides]`.
    fn roll(&mut self, sides: u32) -> u32;

    /// Roll a typed die.
    fn roll_die(&mut self, die: Die) -> u32 {
        self.roll(die.sides())
    }
}

impl<D: DiceSource + ?Sized> DiceSource for Box<D> {
    fn roll(&mut self, sides: u32) -> u32 {
        (**self).roll(sides)
    }
}

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die, the default check die.
    D20,
    /// Percentile die (1-100).
    D100,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::Custom(n) => n,
        }
    }

    /// Parse a die from a string like "d20" or "D6".
    pub fn parse(s: &str) -> MechResult<Self> {
        let lower = s.trim().to_lowercase();
        let die = match lower.as_str() {
            "d4" => Self::D4,
            "d6" => Self::D6,
            "d8" => Self::D8,
            "d10" => Self::D10,
            "d12" => Self::D12,
            "d20" => Self::D20,
            "d100" => Self::D100,
            other => match other.strip_prefix('d').and_then(|n| n.parse::<u32>().ok()) {
                Some(n) if n >= 2 => Self::Custom(n),
                _ => return Err(MechError::InvalidDie(s.to_string())),
            },
        };
        Ok(die)
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn die_sides() {
        assert_eq!(Die::D4.sides(), 4);
        assert_eq!(Die::D20.sides(), 20);
        assert_eq!(Die::D100.sides(), 100);
        assert_eq!(Die::Custom(30).sides(), 30);
    }

    #[test]
    fn die_parse() {
        assert_eq!(Die::parse("d20").unwrap(), Die::D20);
        assert_eq!(Die::parse(" D6 ").unwrap(), Die::D6);
        assert_eq!(Die::parse("d30").unwrap(), Die::Custom(30));
        assert!(matches!(Die::parse("d1"), Err(MechError::InvalidDie(_))));
        assert!(Die::parse("coin").is_err());
    }

    #[test]
    fn die_display() {
        assert_eq!(Die::D20.to_string(), "d20");
        assert_eq!(Die::Custom(7).to_string(), "d7");
    }

    #[test]
    fn boxed_source_delegates() {
        let mut dice: Box<dyn DiceSource> = Box::new(ScriptedDice::new([4]));
        assert_eq!(dice.roll_die(Die::D6), 4);
    }
}
