use std::sync::Arc;

use crate::{
    core::{Config, Coordinator},
    delays::{DelayRef, RandomDelay},
    error::RuntimeError,
    subscribers::Subscribe,
    work::{Sleep, WorkRef},
};

/// Builder for constructing a [`Coordinator`] with optional parts.
pub struct CoordinatorBuilder {
    cfg: Config,
    delays: Option<DelayRef>,
    work: Option<WorkRef>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl CoordinatorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            delays: None,
            work: None,
            subscribers: Vec::new(),
        }
    }

    /// Sets the delay source (default: [`RandomDelay`]).
    pub fn with_delays(mut self, delays: DelayRef) -> Self {
        self.delays = Some(delays);
        self
    }

    /// Sets the work each worker performs (default: [`Sleep`] with `cfg.tick`).
    pub fn with_work(mut self, work: WorkRef) -> Self {
        self.work = Some(work);
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive lifecycle events through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Validates the configuration and builds the coordinator.
    pub fn build(self) -> Result<Coordinator, RuntimeError> {
        self.cfg.validate()?;

        let tick = self.cfg.tick;
        let delays = self
            .delays
            .unwrap_or_else(|| Arc::new(RandomDelay) as DelayRef);
        let work = self
            .work
            .unwrap_or_else(|| Arc::new(Sleep::new(tick)) as WorkRef);

        Ok(Coordinator::new_internal(
            self.cfg,
            delays,
            work,
            self.subscribers,
        ))
    }
}
