//! Deterministic random number generation for deck shuffling.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical decks
//! - **Forkable**: Each play-through gets an independent stream
//! - **Uniform**: Shuffles are Fisher-Yates, every permutation equally likely
//!
//! ## Session Usage
//!
//! ```
//! use kimchi_sort::core::GameRng;
//!
//! let mut master = GameRng::new(42);
//!
//! // Fork for a new play-through
//! let mut session_rng = master.fork();
//!
//! let mut cards = vec![1, 2, 3, 4, 5];
//! session_rng.shuffle(&mut cards);
//!
//! // Forks are deterministic - same fork counter = same sequence
//! let mut master2 = GameRng::new(42);
//! let mut session_rng2 = master2.fork();
//! let mut cards2 = vec![1, 2, 3, 4, 5];
//! session_rng2.shuffle(&mut cards2);
//! assert_eq!(cards, cards2);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG with forking for per-session decks.
///
/// Uses ChaCha8 for speed while maintaining cryptographic quality randomness.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Create an RNG seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// Seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork this RNG to create an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence.
    /// The session engine forks once per `start_game`.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place.
    ///
    /// `SliceRandom::shuffle` is a Fisher-Yates shuffle: walking from the
    /// back, each slot swaps with a uniformly chosen slot at or before it.
    /// Comparator-based "random sorts" are not uniform and must not be used.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Return `0..len` in a uniformly random order.
    #[must_use]
    pub fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..len).collect();
        self.shuffle(&mut indices);
        indices
    }
}
