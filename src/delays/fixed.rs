use crate::{
    delays::{DelayBounds, DelaySource},
    work::WorkerId,
};

/// Explicit delays, assigned by worker index (`values[i % len]`).
///
/// Values are clamped into the bounds; an empty list always yields `bounds.min`.
#[derive(Clone, Debug, Default)]
pub struct FixedDelays {
    values: Vec<u64>,
}

impl FixedDelays {
    /// Creates a source from the given per-worker values.
    #[must_use]
    pub fn new(values: impl Into<Vec<u64>>) -> Self {
        Self {
            values: values.into(),
        }
    }
}

impl DelaySource for FixedDelays {
    fn sample(&self, worker: WorkerId, bounds: DelayBounds) -> u64 {
        if self.values.is_empty() {
            return bounds.min;
        }
        let v = self.values[worker.index() % self.values.len()];
        bounds.clamp(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_and_clamps() {
        let bounds = DelayBounds::new(1, 5).unwrap();
        let src = FixedDelays::new([3, 9]);
        assert_eq!(src.sample(WorkerId::new(0), bounds), 3);
        assert_eq!(src.sample(WorkerId::new(1), bounds), 5);
        assert_eq!(src.sample(WorkerId::new(2), bounds), 3);
    }

    #[test]
    fn empty_uses_min() {
        let bounds = DelayBounds::new(2, 5).unwrap();
        assert_eq!(FixedDelays::default().sample(WorkerId::new(4), bounds), 2);
    }
}
