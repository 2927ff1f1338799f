//! # Event subscriber trait.
//!
//! Provides [`Subscribe`] an extension point for plugging custom event handlers into the runtime.
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs independently)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are caught, written to stderr and raised to the
//!   other subscribers as `SubscriberPanicked`)
//!
//! ## Rules
//! - A slow subscriber only affects its own queue.
//! - Queue overflow drops the event **for this subscriber only** and raises
//!   `SubscriberOverflow` to the others. Queues of a coordinator run are sized
//!   so this cannot happen.
//! - Events are processed sequentially (FIFO) per subscriber.
//! - Subscribers do not block publishers or each other.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use fanvisor::{Subscribe, Event, EventKind};
//!
//! struct Printer;
//!
//! #[async_trait]
//! impl Subscribe for Printer {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::ResultReceived) {
//!             println!("got {:?}", ev.delay);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "printer" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for runtime observability.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
/// - Slow processing affects only this subscriber's queue.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task, not in the publisher context.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in diagnostics.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this subscriber.
    ///
    /// The runtime clamps capacity to a minimum of 1, and a coordinator run raises
    /// it to the run's event budget. Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
