//! # Runtime events emitted by workers, the supervisory task and the drain.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Worker lifecycle**: starting, sent, terminated, failed
//! - **Channel lifecycle**: closed
//! - **Consumer side**: result received, all finished
//!
//! plus the **subscriber health** kinds, which the subscriber set raises about
//! one subscriber and delivers to the others.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use fanvisor::{Event, EventKind, WorkerId};
//!
//! let ev = Event::new(EventKind::WorkerStarting)
//!     .with_worker(WorkerId::new(0))
//!     .with_delay(3);
//!
//! assert_eq!(ev.kind, EventKind::WorkerStarting);
//! assert_eq!(ev.delay, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::work::WorkerId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(1);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Worker lifecycle ===
    /// Worker sampled its delay and is about to start working.
    ///
    /// Sets `worker`, `delay`.
    WorkerStarting,

    /// Worker published its result onto the channel.
    ///
    /// Sets `worker`, `delay` (the value sent).
    WorkerSent,

    /// Worker finished; its sender is about to be released.
    ///
    /// Sets `worker`.
    WorkerTerminated,

    /// Worker's work returned an error or panicked.
    ///
    /// Sets `worker`, `reason`.
    WorkerFailed,

    // === Channel lifecycle ===
    /// Supervisory task joined every worker and closed the result channel.
    ///
    /// Sets `reason` only when the run ended by fail-fast.
    ChannelClosed,

    // === Consumer side ===
    /// Drain received one result.
    ///
    /// Sets `delay` (the value received).
    ResultReceived,

    /// Drain observed end-of-stream and the supervisory task has returned.
    AllFinished,

    // === Subscriber health ===
    /// A subscriber's queue refused an event (full or closed); the event was
    /// dropped for that subscriber only.
    ///
    /// Sets `subscriber`, `reason`.
    SubscriberOverflow,

    /// A subscriber panicked while handling an event.
    ///
    /// Sets `subscriber`, `reason` (the panic message).
    SubscriberPanicked,
}

impl EventKind {
    /// True for events the subscriber set raises about its own subscribers.
    #[inline]
    pub fn is_subscriber_health(self) -> bool {
        matches!(
            self,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Worker the event concerns, if any.
    pub worker: Option<WorkerId>,
    /// Delay (or result value) in delay units.
    pub delay: Option<u64>,
    /// Human-readable reason (errors, fail-fast details).
    pub reason: Option<Arc<str>>,
    /// Subscriber the event concerns (health events only).
    pub subscriber: Option<&'static str>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker: None,
            delay: None,
            reason: None,
            subscriber: None,
        }
    }

    /// Attaches a worker id.
    #[inline]
    pub fn with_worker(mut self, worker: WorkerId) -> Self {
        self.worker = Some(worker);
        self
    }

    /// Attaches a delay / result value.
    #[inline]
    pub fn with_delay(mut self, delay: u64) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the name of the subscriber a health event concerns.
    #[inline]
    pub fn with_subscriber(mut self, name: &'static str) -> Self {
        self.subscriber = Some(name);
        self
    }
}
