//! The simulation's single deterministic RNG stream.
//!
//! # Determinism strategy
//!
//! One `SmallRng` is seeded from the configured `random_seed` and owned by
//! the scheduler.  Every randomized decision — interior empty-cell sampling
//! at world construction, random agent placement, monster probability gating,
//! and `move_random` selection — draws from this stream, in the fixed order
//! the step loop imposes.  The same seed therefore yields an identical run:
//! identical world, identical action logs, identical summary.
//!
//! Nothing in the core reads the ambient thread RNG.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// The simulation-wide deterministic RNG.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` helper APIs
    /// (`rand::seq::index::sample`, etc.).
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Choose a random element from a slice.  Returns `None` if it is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }

    /// Sample `amount` distinct indices from `0..len` (order randomized).
    ///
    /// `amount` is capped at `len`.
    pub fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.0, len, amount.min(len)).into_vec()
    }
}
