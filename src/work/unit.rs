//! # Work abstraction.
//!
//! A [`Work`] is what a worker does between sampling its delay and publishing
//! it. The runtime calls [`Work::perform`] exactly once per worker. On success
//! the worker sends its sampled delay onto the shared result channel; the work
//! itself has no say over the published value.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{error::WorkError, work::WorkerId};

/// Shared handle to a unit of work.
pub type WorkRef = Arc<dyn Work>;

/// # Asynchronous unit of simulated work.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use fanvisor::{Work, WorkError, WorkerId};
///
/// struct Instant;
///
/// #[async_trait]
/// impl Work for Instant {
///     fn name(&self) -> &str { "instant" }
///
///     async fn perform(&self, _worker: WorkerId, _delay: u64) -> Result<(), WorkError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Work: Send + Sync + 'static {
    /// Returns a stable, human-readable name.
    fn name(&self) -> &str;

    /// Performs the work for `worker` with its sampled `delay`.
    ///
    /// `Ok(())` lets the worker publish `delay`; an error fails the worker without
    /// sending anything. Must not block the executor.
    async fn perform(&self, worker: WorkerId, delay: u64) -> Result<(), WorkError>;
}
