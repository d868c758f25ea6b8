//! Randomness seam for the rules engine.
//!
//! The domain never touches an RNG directly. Every die roll goes through
//! [`RandomPort::gen_range`], so adapters can supply thread-local, seeded, or
//! scripted randomness (the last one also covers physical dice entered by hand).

use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of uniformly distributed integers.
pub trait RandomPort: Send + Sync {
    /// Returns an integer in `min..=max`.
    fn gen_range(&self, min: i32, max: i32) -> i32;
}

/// Roll a single die with `faces` sides.
///
/// Sizes past `i32::MAX` roll as `i32::MAX`; a zero-sided die rolls 1.
pub fn roll_die(random: &dyn RandomPort, faces: u32) -> i32 {
    let max = i32::try_from(faces).unwrap_or(i32::MAX).max(1);
    random.gen_range(1, max)
}

/// Scripted random source.
///
/// Returns values from a provided sequence, cycling if needed, clamped to the
/// requested range. Thread-safe via atomic operations.
#[derive(Debug)]
pub struct FixedRandom {
    values: Vec<i32>,
    index: AtomicUsize,
}

impl FixedRandom {
    /// Create a new FixedRandom with the given sequence of values.
    ///
    /// An empty sequence behaves like `constant(1)`.
    pub fn new(values: Vec<i32>) -> Self {
        let values = if values.is_empty() { vec![1] } else { values };
        Self {
            values,
            index: AtomicUsize::new(0),
        }
    }

    /// Create a FixedRandom that always returns the same value.
    pub fn constant(value: i32) -> Self {
        Self::new(vec![value])
    }

    /// Number of values consumed so far.
    pub fn draws(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }
}

impl Clone for FixedRandom {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            index: AtomicUsize::new(self.index.load(Ordering::SeqCst)),
        }
    }
}

impl RandomPort for FixedRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        let idx = self.index.fetch_add(1, Ordering::SeqCst);
        let value = self.values[idx % self.values.len()];
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_random_constant() {
        let rng = FixedRandom::constant(10);
        assert_eq!(rng.gen_range(1, 20), 10);
        assert_eq!(rng.gen_range(1, 20), 10);
        assert_eq!(rng.gen_range(1, 6), 6); // Clamped to max
        assert_eq!(rng.gen_range(15, 20), 15); // Clamped to min
    }

    #[test]
    fn test_fixed_random_sequence_cycles() {
        let rng = FixedRandom::new(vec![1, 5, 20]);
        assert_eq!(roll_die(&rng, 20), 1);
        assert_eq!(roll_die(&rng, 20), 5);
        assert_eq!(roll_die(&rng, 20), 20);
        assert_eq!(roll_die(&rng, 20), 1);
        assert_eq!(rng.draws(), 4);
    }

    #[test]
    fn test_roll_die_keeps_range_ordered() {
        let rng = FixedRandom::constant(50);
        assert_eq!(roll_die(&rng, 3_000_000_000), 50);
        assert_eq!(roll_die(&rng, 0), 1);
    }

    #[test]
    fn test_empty_sequence_rolls_ones() {
        let rng = FixedRandom::new(vec![]);
        assert_eq!(roll_die(&rng, 6), 1);
    }
}
