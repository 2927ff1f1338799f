//! # Event subscribers for the fanvisor runtime.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and the built-in subscribers.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Worker ── publish(Event) ──► Bus ──► listener ──► SubscriberSet::emit(&Event)
//!                                                        │
//!                                             ┌──────────┼──────────┐
//!                                             ▼          ▼          ▼
//!                                          Ledger    LogWriter    Custom
//! ```
//!
//! ## Subscriber types
//! - **Passive subscribers** observe and react to events (console output, logging)
//! - **Stateful subscribers** maintain state derived from events ([`Ledger`])

mod embedded;
mod set;
mod subscriber;

pub use embedded::Ledger;
#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub(crate) use set::panic_message;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
