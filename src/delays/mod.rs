//! Delay generation.
//!
//! Each worker samples its simulated-work duration from a [`DelaySource`]
//! within inclusive [`DelayBounds`]. Sources are pluggable so runs can be made
//! deterministic.
//!
//! ## Contents
//! - [`DelayBounds`] inclusive `[min, max]` range of delay units
//! - [`DelaySource`] trait sampled once per worker
//! - [`RandomDelay`] thread-local RNG, the default
//! - [`SeededDelay`] reproducible per-worker draws from a seed
//! - [`FixedDelays`] explicit values, cycled by worker index
//!
//! ## Defaults
//! - `DelayBounds::default()` → `[1, 5]`.
//! - `Coordinator::builder` uses [`RandomDelay`] unless told otherwise.

mod bounds;
mod fixed;
mod random;
mod seeded;
mod source;

pub use bounds::DelayBounds;
pub use fixed::FixedDelays;
pub use random::RandomDelay;
pub use seeded::SeededDelay;
pub use source::{DelayRef, DelaySource};
