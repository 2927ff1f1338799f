//! # fanvisor
//!
//! **fanvisor** is a small fan-out/fan-in coordinator for tokio.
//!
//! It launches a fixed pool of workers, each of which samples a delay, performs
//! one unit of (simulated) work and publishes exactly one result onto a shared
//! channel. A supervisory task waits for every worker and only then closes the
//! channel, so the consumer's drain ends exactly when the last result is in.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   Worker 1   │   │   Worker 2   │   │   Worker N   │
//!     │ sample delay │   │ sample delay │   │ sample delay │
//!     │ perform work │   │ perform work │   │ perform work │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ send             │ send             │ send
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │              result channel (mpsc, unbounded, Open → Closed)      │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │        Results         │
//!                       │ recv() until None      │
//!                       └────────────────────────┘
//!
//!     Supervisory task: JoinSet::join_next() × N ──► drop(last sender) ──► Closed
//! ```
//!
//! ### Events
//! Workers, the supervisory task and the drain publish lifecycle [`Event`]s on a
//! broadcast [`Bus`]. A listener fans them out to [`Subscribe`] implementations
//! through a [`SubscriberSet`] (per-subscriber bounded queues, panic isolation).
//! A run sizes the bus and the queues from its worker count, so subscribers see
//! every event; a subscriber that panics is reported to the others as
//! [`EventKind::SubscriberPanicked`].
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                         |
//! |-------------------|----------------------------------------------------------|--------------------------------------------|
//! | **Coordination**  | Fan-out, join-all, single close, drain.                  | [`Coordinator`], [`Results`], [`Report`]   |
//! | **Work**          | What each worker does with its delay.                    | [`Work`], [`Sleep`], [`WorkFn`]            |
//! | **Delays**        | Pluggable, optionally deterministic delay generation.    | [`DelaySource`], [`SeededDelay`]           |
//! | **Subscriber API**| Hook into lifecycle events.                              | [`Subscribe`], [`Ledger`]                  |
//! | **Errors**        | Typed errors for the runtime and for work.               | [`RuntimeError`], [`WorkError`]            |
//! | **Configuration** | Worker count, bounds, tick, bus capacity.                | [`Config`], [`DelayBounds`]                |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use fanvisor::{Config, Coordinator};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config { workers: 3, tick: Duration::from_millis(1), ..Config::default() };
//!     let coordinator = Coordinator::builder(cfg).build()?;
//!
//!     let mut results = coordinator.run_all();
//!     while let Some(delay) = results.recv().await {
//!         println!("Received result: {delay}");
//!     }
//!     let report = results.finish().await?;
//!     assert_eq!(report.received, 3);
//!     Ok(())
//! }
//! ```
mod core;
mod delays;
mod error;
mod events;
mod subscribers;
mod work;

// ---- Public re-exports ----

pub use crate::core::{Config, Coordinator, CoordinatorBuilder, Report, Results, WorkerState};
pub use delays::{
    DelayBounds, DelayRef, DelaySource, FixedDelays, RandomDelay, SeededDelay,
};
pub use error::{RuntimeError, WorkError};
pub use events::{Bus, Event, EventKind};
pub use subscribers::{Ledger, Subscribe, SubscriberSet};
pub use work::{Sleep, Work, WorkFn, WorkRef, WorkerId};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
