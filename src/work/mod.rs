//! # Work abstractions.
//!
//! This module provides the worker-side types:
//! - [`WorkerId`] - identity of one worker in a run (index in `[0, N)`)
//! - [`Work`] - trait for the unit of simulated work a worker performs
//! - [`Sleep`] - default work: suspend for `delay × tick`, then report `delay`
//! - [`WorkFn`] - closure-backed work implementation
//! - [`WorkRef`] - shared reference to work (`Arc<dyn Work>`)

mod id;
mod sleep;
mod unit;
mod work_fn;

pub use id::WorkerId;
pub use sleep::Sleep;
pub use unit::{Work, WorkRef};
pub use work_fn::WorkFn;
