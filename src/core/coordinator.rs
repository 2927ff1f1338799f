//! # Coordinator: fan-out to workers, fan-in through one channel.
//!
//! The [`Coordinator`] owns the run configuration and the pluggable parts
//! (delay source, work, subscribers). Each call to [`Coordinator::run_all`]
//! starts an independent run with its own channel, bus and subscriber set.
//!
//! ## High-level architecture
//! ```text
//! run_all():
//!   Bus::new(max(bus_capacity, event_budget)) ──► listener ─► SubscriberSet::emit(&Event)
//!   mpsc::unbounded_channel()  ──► (tx, rx)
//!
//! Fan-out:
//!   Worker[0]  Worker[1]  ...  Worker[N-1]          (one tokio task each, tx clone each)
//!       │          │                │
//!       └──────────┴──── send ──────┴──────► channel ──► Results (rx)
//!
//! Supervision:
//!   supervise(JoinSet, tx) ── join all ──► drop(tx) ──► channel closed
//!
//! Fan-in:
//!   Results::recv() ... None ──► Results::finish() ──► Report
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use fanvisor::{Config, Coordinator, SeededDelay};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config { tick: Duration::from_millis(1), ..Config::default() };
//!     let coordinator = Coordinator::builder(cfg)
//!         .with_delays(Arc::new(SeededDelay::new(7)))
//!         .build()?;
//!
//!     let mut results = coordinator.run_all();
//!     while let Some(value) = results.recv().await {
//!         assert!((1..=5).contains(&value));
//!     }
//!     let report = results.finish().await?;
//!     assert_eq!(report.received, 5);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::{
    sync::{broadcast, broadcast::error::RecvError, mpsc},
    task::JoinHandle,
};

use crate::{
    core::{
        Config, CoordinatorBuilder, Results,
        supervisor::{WorkerSet, supervise},
        worker::{Worker, WorkerParams},
    },
    delays::DelayRef,
    events::{Bus, Event},
    subscribers::{Subscribe, SubscriberSet},
    work::{WorkRef, WorkerId},
};

/// Launches a fixed pool of workers and hands their results back through one channel.
pub struct Coordinator {
    cfg: Config,
    params: WorkerParams,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl Coordinator {
    /// Returns a builder for the given configuration.
    pub fn builder(cfg: Config) -> CoordinatorBuilder {
        CoordinatorBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        delays: DelayRef,
        work: WorkRef,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        let params = WorkerParams {
            bounds: cfg.delay,
            delays,
            work,
        };
        Self {
            cfg,
            params,
            subscribers,
        }
    }

    /// Run configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Starts a run: spawns `cfg.workers` workers plus the supervisory task and
    /// returns the drain over their results.
    ///
    /// Must be called within a tokio runtime.
    /// The bus and every subscriber queue are sized from the run's event budget,
    /// so no lifecycle event is dropped for runtime-owned subscribers.
    pub fn run_all(&self) -> Results {
        let bus = Bus::new(self.cfg.run_bus_capacity());
        // each event may come back once per other subscriber as a health event
        let queue_floor = self
            .cfg
            .event_budget()
            .saturating_mul(self.subscribers.len().max(1));
        let set = SubscriberSet::with_min_capacity(self.subscribers.clone(), queue_floor);
        let listener = spawn_listener(bus.subscribe(), set);

        let (tx, rx) = mpsc::unbounded_channel();
        let set = self.spawn_workers(&bus, &tx);
        let supervisor = tokio::spawn(supervise(set, tx, bus.clone()));

        Results::new(rx, bus, supervisor, listener)
    }

    fn spawn_workers(&self, bus: &Bus, tx: &mpsc::UnboundedSender<u64>) -> WorkerSet {
        let mut set = WorkerSet::new();
        for index in 0..self.cfg.workers {
            let worker = Worker::new(
                WorkerId::new(index),
                self.params.clone(),
                bus.clone(),
                tx.clone(),
            );
            set.spawn(worker.run());
        }
        set
    }
}

/// Forwards bus events to the subscriber set until every bus clone is dropped,
/// then flushes the subscriber queues.
fn spawn_listener(mut rx: broadcast::Receiver<Event>, set: SubscriberSet) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => set.emit(&ev),
                Err(RecvError::Lagged(skipped)) => {
                    eprintln!("[fanvisor] event listener lagged: skipped {skipped} events");
                }
                Err(RecvError::Closed) => break,
            }
        }
        set.shutdown().await;
    })
}
