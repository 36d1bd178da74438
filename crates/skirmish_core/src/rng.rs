use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::VecDeque;
use std::ops::RangeInclusive;

pub const DEFAULT_SEED: u64 = 42;

/// Source of every random draw the engine makes: hit counts, clone chance and
/// automatic army composition.
pub trait Dice {
    fn roll(&mut self, range: RangeInclusive<u32>) -> u32;

    /// `true` with probability `percent`/100. Always consumes one draw.
    fn chance(&mut self, percent: u32) -> bool {
        self.roll(0..=99) < percent
    }
}

#[derive(Clone, Debug)]
pub struct SimulationParams {
    pub seed: u64,
}

impl SimulationParams {
    pub fn from_env() -> Self {
        let seed = std::env::var("SKIRMISH_SEED")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(DEFAULT_SEED);
        Self { seed }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self { seed: DEFAULT_SEED }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationRng {
    seed: u64,
    rng: StdRng,
}

impl SimulationRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_params(params: &SimulationParams) -> Self {
        Self::new(params.seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn gen_range(&mut self, range: RangeInclusive<u32>) -> u32 {
        self.rng.gen_range(range)
    }
}

impl Dice for SimulationRng {
    fn roll(&mut self, range: RangeInclusive<u32>) -> u32 {
        self.gen_range(range)
    }
}

/// Replays a fixed list of rolls, clamped into whatever range is asked for.
/// Once exhausted every roll returns the low end of its range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<u32>,
    consumed: usize,
}

impl ScriptedDice {
    pub fn new(rolls: impl IntoIterator<Item = u32>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            consumed: 0,
        }
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, range: RangeInclusive<u32>) -> u32 {
        self.consumed += 1;
        let (low, high) = (*range.start(), *range.end());
        match self.rolls.pop_front() {
            Some(value) => value.clamp(low, high),
            None => low,
        }
    }
}

impl<D: Dice + ?Sized> Dice for &mut D {
    fn roll(&mut self, range: RangeInclusive<u32>) -> u32 {
        (**self).roll(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulation_rng_is_deterministic() {
        let mut a = SimulationRng::new(DEFAULT_SEED);
        let mut b = SimulationRng::new(DEFAULT_SEED);
        let left: Vec<u32> = (0..8).map(|_| a.roll(1..=5)).collect();
        let right: Vec<u32> = (0..8).map(|_| b.roll(1..=5)).collect();
        assert_eq!(left, right);
        assert!(left.iter().all(|v| (1..=5).contains(v)));
    }

    #[test]
    fn scripted_dice_clamps_and_falls_back_to_low_end() {
        let mut dice = ScriptedDice::new([9, 0]);
        assert_eq!(dice.roll(1..=5), 5);
        assert_eq!(dice.roll(1..=5), 1);
        assert_eq!(dice.roll(2..=4), 2);
        assert_eq!(dice.consumed(), 3);
    }

    #[test]
    fn chance_compares_against_percent() {
        let mut dice = ScriptedDice::new([9, 10]);
        assert!(dice.chance(10));
        assert!(!dice.chance(10));
    }
}
