//! Seedable randomness for ticket generation and draws.
//!
//! The same seed produces the same tickets and the same draw order, which
//! makes a hosted game reproducible from its seed.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    /// Create a deterministic RNG from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }

    /// `Some(seed)` is deterministic, `None` uses entropy.
    #[must_use]
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// Choose an element uniformly. `None` for an empty slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_shuffle() {
        let mut a: Vec<u32> = (1..=30).collect();
        let mut b = a.clone();
        GameRng::new(7).shuffle(&mut a);
        GameRng::new(7).shuffle(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut values: Vec<u32> = (1..=30).collect();
        GameRng::new(1).shuffle(&mut values);
        values.sort_unstable();
        assert_eq!(values, (1..=30).collect::<Vec<_>>());
    }

    #[test]
    fn test_choose_empty() {
        let empty: [u32; 0] = [];
        assert!(GameRng::new(3).choose(&empty).is_none());
    }
}
