use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    delays::{DelayBounds, DelaySource},
    work::WorkerId,
};

/// Reproducible delays: each worker draws from its own RNG seeded by `seed` and its index.
///
/// The draw for a worker does not depend on scheduling order, so the same seed
/// always yields the same delay per worker.
#[derive(Clone, Copy, Debug)]
pub struct SeededDelay {
    seed: u64,
}

impl SeededDelay {
    /// Creates a seeded source.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn worker_seed(&self, worker: WorkerId) -> u64 {
        self.seed ^ (worker.index() as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

impl DelaySource for SeededDelay {
    fn sample(&self, worker: WorkerId, bounds: DelayBounds) -> u64 {
        let mut rng = StdRng::seed_from_u64(self.worker_seed(worker));
        rng.random_range(bounds.min..=bounds.max)
    }
}
