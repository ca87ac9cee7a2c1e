//! Seedable random source for mine placement and the Easy solver tier.
//!
//! Uses the `rand` crate with `SmallRng` (xoshiro256++), which works on native
//! targets and in WASM. Entropy comes from `getrandom` (browser crypto API on
//! wasm32).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A seedable RNG wrapper.
///
/// Can be seeded for deterministic replay, or created from system entropy.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: SmallRng,
}

impl GameRng {
    /// Create from system entropy (browser crypto.getRandomValues or OS).
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Create with a specific seed for deterministic behavior.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::from_seed)
    }

    /// Generate a random usize in [0, max).
    #[inline(always)]
    pub fn gen_range(&mut self, max: usize) -> usize {
        self.inner.random_range(0..max)
    }

    /// Pick `amount` distinct indices from `[0, len)`, uniformly.
    ///
    /// Callers must ensure `amount <= len`.
    pub fn sample(&mut self, len: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.inner, len, amount).into_vec()
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seeded_deterministic() {
        let mut rng1 = GameRng::from_seed(42);
        let mut rng2 = GameRng::from_seed(42);
        for _ in 0..100 {
            assert_eq!(rng1.gen_range(1000), rng2.gen_range(1000));
        }
    }

    #[test]
    fn test_range_bounds() {
        let mut rng = GameRng::from_seed(123);
        for _ in 0..1000 {
            let v = rng.gen_range(10);
            assert!(v < 10);
        }
    }

    #[test]
    fn test_sample_distinct_and_in_range() {
        let mut rng = GameRng::from_seed(7);
        let picked = rng.sample(91, 20);
        assert_eq!(picked.len(), 20);
        let unique: HashSet<_> = picked.iter().copied().collect();
        assert_eq!(unique.len(), 20);
        assert!(picked.iter().all(|&i| i < 91));
    }

    #[test]
    fn test_sample_everything() {
        let mut rng = GameRng::from_seed(9);
        let mut picked = rng.sample(5, 5);
        picked.sort_unstable();
        assert_eq!(picked, vec![0, 1, 2, 3, 4]);
    }
}
