//! # Built-in subscribers
//!
//! - [`Ledger`]: per-worker state and channel-closure accounting.
//! - [`LogWriter`]: prints events in a human-readable form (demo/debug, feature `logging`).

mod ledger;
#[cfg(feature = "logging")]
mod log;

pub use ledger::Ledger;
#[cfg(feature = "logging")]
pub use log::LogWriter;
