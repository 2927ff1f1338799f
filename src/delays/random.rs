use rand::Rng;

use crate::{
    delays::{DelayBounds, DelaySource},
    work::WorkerId,
};

/// Uniform draw from the thread-local RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomDelay;

impl DelaySource for RandomDelay {
    fn sample(&self, _worker: WorkerId, bounds: DelayBounds) -> u64 {
        let mut rng = rand::rng();
        rng.random_range(bounds.min..=bounds.max)
    }
}
