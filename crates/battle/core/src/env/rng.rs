//! RNG oracle for deterministic random number generation.
//!
//! Oracles are pure functions of a seed. A session owns a base seed and a roll
//! nonce; [`Dice`] combines them into a fresh seed for every draw so a battle
//! can be replayed exactly from `(seed, actions)`.

use std::sync::atomic::{AtomicUsize, Ordering};

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR variant: 32-bit output from 64-bit state, one multiply plus a
/// xorshift and a data-dependent rotate.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Oracle that replays a fixed sequence of raw draws, ignoring the seed.
///
/// The sequence wraps around when exhausted. Useful for fixtures and for
/// reproducing a reported battle roll by roll.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    cursor: AtomicUsize,
}

impl SequenceRng {
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            values,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Builds a sequence from unit-interval values, so `0.0` makes every
    /// chance check succeed and `0.99` makes any check below 99% fail.
    pub fn from_units(units: &[f64]) -> Self {
        Self::new(units.iter().map(|&u| unit_to_raw(u)).collect())
    }

    /// Number of draws consumed so far.
    pub fn draws(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }
}

impl RngOracle for SequenceRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.values[index % self.values.len()]
    }
}

/// Compute a deterministic seed from the session seed and the roll nonce.
///
/// SplitMix64-style avalanche so consecutive nonces produce unrelated seeds.
pub fn compute_seed(game_seed: u64, nonce: u64) -> u64 {
    let mut hash = game_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xc4ceb9fe1a85ec53);
    hash ^= hash >> 33;
    hash
}

const RAW_SPAN: f64 = 4_294_967_296.0;

fn unit_to_raw(unit: f64) -> u32 {
    (unit.clamp(0.0, 1.0) * RAW_SPAN).min(u32::MAX as f64) as u32
}

/// Stateful roller for one resolution step.
///
/// Borrowed from a session's `(seed, rolls)` pair; the caller writes
/// [`Dice::nonce`] back when the step commits.
pub struct Dice<'a> {
    oracle: &'a dyn RngOracle,
    seed: u64,
    nonce: u64,
}

impl<'a> Dice<'a> {
    pub fn new(oracle: &'a dyn RngOracle, seed: u64, nonce: u64) -> Self {
        Self {
            oracle,
            seed,
            nonce,
        }
    }

    /// Roll nonce after the draws made so far.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn next_u32(&mut self) -> u32 {
        let value = self.oracle.next_u32(compute_seed(self.seed, self.nonce));
        self.nonce += 1;
        value
    }

    /// Uniform value in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.next_u32() as f64 / RAW_SPAN
    }

    /// Bernoulli trial with success probability `p`.
    ///
    /// Certain outcomes (`p <= 0` or `p >= 1`) do not consume a draw.
    pub fn chance(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.unit() < p
    }

    /// Uniform value in `[0, max)`.
    pub fn uniform(&mut self, max: f64) -> f64 {
        self.unit() * max
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "cannot pick from an empty range");
        if len <= 1 {
            return 0;
        }
        ((self.unit() * len as f64) as usize).min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_is_deterministic() {
        let rng = PcgRng;
        assert_eq!(rng.next_u32(42), rng.next_u32(42));
        assert_ne!(rng.next_u32(42), rng.next_u32(43));
    }

    #[test]
    fn dice_replays_from_same_seed_and_nonce() {
        let rng = PcgRng;
        let mut a = Dice::new(&rng, 7, 0);
        let mut b = Dice::new(&rng, 7, 0);
        let left: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let right: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_eq!(left, right);
        assert_eq!(a.nonce(), 8);
    }

    #[test]
    fn certain_chances_do_not_draw() {
        let rng = SequenceRng::from_units(&[0.5]);
        let mut dice = Dice::new(&rng, 0, 0);
        assert!(!dice.chance(0.0));
        assert!(dice.chance(1.0));
        assert_eq!(rng.draws(), 0);
        assert!(dice.chance(0.6));
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn sequence_units_map_back_to_units() {
        let rng = SequenceRng::from_units(&[0.0, 0.25, 0.99]);
        let mut dice = Dice::new(&rng, 0, 0);
        assert_eq!(dice.unit(), 0.0);
        assert!((dice.unit() - 0.25).abs() < 1e-9);
        assert!(!dice.chance(0.5));
    }

    #[test]
    fn index_stays_in_bounds() {
        let rng = SequenceRng::from_units(&[0.999_999, 0.0, 0.5]);
        let mut dice = Dice::new(&rng, 0, 0);
        assert_eq!(dice.index(3), 2);
        assert_eq!(dice.index(3), 0);
        assert_eq!(dice.index(3), 1);
    }
}
