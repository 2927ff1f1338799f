use std::sync::Arc;

use crate::{delays::DelayBounds, work::WorkerId};

/// Shared handle to a delay source.
pub type DelayRef = Arc<dyn DelaySource>;

/// Produces one delay per worker.
///
/// Called from inside the worker's task, once, before the work starts.
/// Implementations should return a value within `bounds`; the runtime clamps
/// anything outside.
pub trait DelaySource: Send + Sync + 'static {
    /// Samples the delay for `worker`.
    fn sample(&self, worker: WorkerId, bounds: DelayBounds) -> u64;
}
