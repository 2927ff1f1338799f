//! Runtime core: fan-out, supervision and fan-in.
//!
//! Internal modules:
//! - [`config`]: run settings (worker count, delay bounds, tick, bus capacity);
//! - [`builder`]: assembles a [`Coordinator`] from config and pluggable parts;
//! - [`coordinator`]: spawns workers, the supervisory task and the event listener;
//! - [`worker`]: one worker's lifecycle (sample → delay → send → terminate);
//! - [`supervisor`]: joins every worker, then closes the result channel;
//! - [`results`]: the consumer-side drain.

mod builder;
mod config;
mod coordinator;
mod results;
mod supervisor;
mod worker;

pub use builder::CoordinatorBuilder;
pub use config::Config;
pub use coordinator::Coordinator;
pub use results::{Report, Results};
pub use worker::WorkerState;
