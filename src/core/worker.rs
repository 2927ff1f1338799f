//! # Worker: one unit of fan-out.
//!
//! ## Lifecycle
//! ```text
//! Created ──► Delaying ──► Sent ──► Terminated
//!                 │
//!                 └──► Failed (work error or panic)
//!
//! run():
//!   ├─► delay = bounds.clamp(delays.sample(id, bounds))
//!   ├─► publish WorkerStarting{ worker, delay }
//!   ├─► work.perform(id, delay)              (suspends; other workers keep running)
//!   ├─► tx.send(delay)
//!   ├─► publish WorkerSent{ worker, delay }
//!   └─► publish WorkerTerminated             (sender clone dropped on return)
//! ```
//!
//! ## Rules
//! - Sends **at most one** value, and that value is always the sampled delay.
//! - Panics in the delay source or the work are caught and reported as [`WorkError::Panicked`].
//! - The sender clone lives exactly as long as the worker's future.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::sync::mpsc;

use crate::{
    delays::{DelayBounds, DelayRef},
    error::WorkError,
    events::{Bus, Event, EventKind},
    subscribers::panic_message,
    work::{WorkRef, WorkerId},
};

/// Per-worker state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Spawned, delay not yet sampled.
    Created,
    /// Delay sampled; simulated work in progress.
    Delaying,
    /// Result published onto the channel.
    Sent,
    /// Finished; sender released.
    Terminated,
    /// Work failed or panicked; no result was sent.
    Failed,
}

/// Shared inputs for every worker of a run.
#[derive(Clone)]
pub(crate) struct WorkerParams {
    pub bounds: DelayBounds,
    pub delays: DelayRef,
    pub work: WorkRef,
}

pub(crate) struct Worker {
    id: WorkerId,
    params: WorkerParams,
    bus: Bus,
    tx: mpsc::UnboundedSender<u64>,
}

impl Worker {
    pub(crate) fn new(
        id: WorkerId,
        params: WorkerParams,
        bus: Bus,
        tx: mpsc::UnboundedSender<u64>,
    ) -> Self {
        Self {
            id,
            params,
            bus,
            tx,
        }
    }

    /// Runs the worker to completion and reports how it ended.
    pub(crate) async fn run(self) -> (WorkerId, Result<(), WorkError>) {
        let res = match AssertUnwindSafe(self.execute()).catch_unwind().await {
            Ok(res) => res,
            Err(payload) => Err(WorkError::Panicked {
                info: panic_message(payload.as_ref()),
            }),
        };

        match &res {
            Ok(()) => self
                .bus
                .publish(Event::new(EventKind::WorkerTerminated).with_worker(self.id)),
            Err(e) => self.bus.publish(
                Event::new(EventKind::WorkerFailed)
                    .with_worker(self.id)
                    .with_reason(e.to_string()),
            ),
        }
        (self.id, res)
    }

    async fn execute(&self) -> Result<(), WorkError> {
        let bounds = self.params.bounds;
        let delay = bounds.clamp(self.params.delays.sample(self.id, bounds));
        self.bus.publish(
            Event::new(EventKind::WorkerStarting)
                .with_worker(self.id)
                .with_delay(delay),
        );

        self.params.work.perform(self.id, delay).await?;

        // Receiver gone: the consumer dropped its drain, nothing left to deliver to.
        let _ = self.tx.send(delay);
        self.bus.publish(
            Event::new(EventKind::WorkerSent)
                .with_worker(self.id)
                .with_delay(delay),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{delays::FixedDelays, work::Sleep};
    use std::sync::Arc;
    use std::time::Duration;

    fn params(values: &[u64]) -> WorkerParams {
        WorkerParams {
            bounds: DelayBounds::default(),
            delays: Arc::new(FixedDelays::new(values.to_vec())),
            work: Arc::new(Sleep::new(Duration::from_secs(1))),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn sends_sampled_delay_and_publishes_lifecycle() {
        let bus = Bus::new(16);
        let mut events = bus.subscribe();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let worker = Worker::new(WorkerId::new(0), params(&[4]), bus, tx);
        let (id, res) = worker.run().await;

        assert_eq!(id, WorkerId::new(0));
        assert!(res.is_ok());
        assert_eq!(rx.recv().await, Some(4));
        // worker's sender was the only one
        assert_eq!(rx.recv().await, None);

        let kinds: Vec<EventKind> = std::iter::from_fn(|| events.try_recv().ok())
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::WorkerStarting,
                EventKind::WorkerSent,
                EventKind::WorkerTerminated
            ]
        );
    }
}
