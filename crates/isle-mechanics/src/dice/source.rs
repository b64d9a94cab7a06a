//! Concrete dice sources.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::DiceSource;

/// Pseudo-random dice backed by a standard RNG.
///
/// Two sources built from the same seed produce the same sequence.
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: StdRng,
}

impl SeededDice {
    /// Deterministic dice for a fixed seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Non-deterministic dice seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Dice from an optional seed; `None` means entropy.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl DiceSource for SeededDice {
    fn roll(&mut self, sides: u32) -> u32 {
        self.rng.random_range(1..=sides.max(1))
    }
}

/// Replays a fixed sequence of rolls.
///
/// Values are clamped into `[1, sides]` for the die being rolled. Once the
/// script is exhausted it keeps returning the last value (or 1 if empty).
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    queue: VecDeque<u32>,
    last: Option<u32>,
}

impl ScriptedDice {
    /// Create dice that replay `rolls` in order.
    pub fn new(rolls: impl IntoIterator<Item = u32>) -> Self {
        Self {
            queue: rolls.into_iter().collect(),
            last: None,
        }
    }

    /// Append another roll to the script.
    pub fn push(&mut self, roll: u32) {
        self.queue.push_back(roll);
    }

    /// Rolls not yet consumed.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self, sides: u32) -> u32 {
        let raw = self.queue.pop_front().or(self.last).unwrap_or(1);
        self.last = Some(raw);
        raw.clamp(1, sides.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededDice::from_seed(42);
        let mut b = SeededDice::from_seed(42);
        let rolls_a: Vec<u32> = (0..50).map(|_| a.roll(20)).collect();
        let rolls_b: Vec<u32> = (0..50).map(|_| b.roll(20)).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn entropy_rolls_in_range() {
        let mut dice = SeededDice::from_entropy();
        for _ in 0..100 {
            let r = dice.roll(6);
            assert!((1..=6).contains(&r));
        }
    }

    #[test]
    fn scripted_replays_then_repeats_last() {
        let mut dice = ScriptedDice::new([13, 2]);
        assert_eq!(dice.roll(20), 13);
        assert_eq!(dice.roll(20), 2);
        assert_eq!(dice.remaining(), 0);
        assert_eq!(dice.roll(20), 2);
    }

    #[test]
    fn scripted_clamps_into_range() {
        let mut dice = ScriptedDice::new([0, 99]);
        assert_eq!(dice.roll(20), 1);
        assert_eq!(dice.roll(20), 20);
    }

    #[test]
    fn empty_script_rolls_one() {
        let mut dice = ScriptedDice::default();
        assert_eq!(dice.roll(20), 1);
    }

    proptest! {
        #[test]
        fn seeded_rolls_stay_in_range(seed in any::<u64>(), sides in 1u32..200) {
            let mut dice = SeededDice::from_seed(seed);
            for _ in 0..20 {
                let r = dice.roll(sides);
                prop_assert!(r >= 1 && r <= sides);
            }
        }
    }
}
