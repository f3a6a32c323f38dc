//! Deterministic random number generation for dealing.
//!
//! Uses ChaCha8: the same seed always produces the same shuffle, which keeps
//! matches reproducible from `(seed)` alone for debugging and tests.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG owned by the dealer.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }
}
