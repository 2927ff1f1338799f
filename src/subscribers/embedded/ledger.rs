//! # Per-worker state ledger with sequence-based ordering.
//!
//! Rebuilds each worker's state machine and the channel's lifecycle from the
//! event stream, so a run can be audited after [`Results::finish`](crate::Results::finish).
//!
//! ## Rules
//! - `WorkerStarting` → `Delaying`, `WorkerSent` → `Sent`,
//!   `WorkerTerminated` → `Terminated`, `WorkerFailed` → `Failed`
//! - Events with `seq <= last_seq` for a worker are **rejected** (stale)
//! - Every `ChannelClosed` is recorded, so a double close is observable
//! - Reads are eventually consistent until the subscriber set is flushed

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    core::WorkerState,
    events::{Event, EventKind},
    subscribers::Subscribe,
    work::WorkerId,
};

#[derive(Debug, Clone, Copy)]
struct Entry {
    last_seq: u64,
    state: WorkerState,
}

#[derive(Debug, Default)]
struct Inner {
    workers: HashMap<WorkerId, Entry>,
    /// Sequence numbers of every `ChannelClosed` seen.
    closes: Vec<u64>,
    /// Highest `WorkerSent` sequence number seen.
    last_sent: Option<u64>,
    /// Values seen in `ResultReceived`.
    received: Vec<u64>,
}

/// Audit trail of one or more runs.
#[derive(Default)]
pub struct Ledger {
    inner: RwLock<Inner>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event. Returns `true` if it changed a worker's state.
    pub async fn update(&self, ev: &Event) -> bool {
        let mut inner = self.inner.write().await;
        match ev.kind {
            EventKind::ChannelClosed => {
                inner.closes.push(ev.seq);
                return false;
            }
            EventKind::ResultReceived => {
                if let Some(v) = ev.delay {
                    inner.received.push(v);
                }
                return false;
            }
            EventKind::WorkerSent => {
                inner.last_sent = inner.last_sent.max(Some(ev.seq));
            }
            _ => {}
        }

        let Some(worker) = ev.worker else {
            return false;
        };
        let next = match ev.kind {
            EventKind::WorkerStarting => WorkerState::Delaying,
            EventKind::WorkerSent => WorkerState::Sent,
            EventKind::WorkerTerminated => WorkerState::Terminated,
            EventKind::WorkerFailed => WorkerState::Failed,
            _ => return false,
        };

        let entry = inner.workers.entry(worker).or_insert(Entry {
            last_seq: 0,
            state: WorkerState::Created,
        });
        if ev.seq <= entry.last_seq {
            return false;
        }
        entry.last_seq = ev.seq;
        entry.state = next;
        true
    }

    /// Last known state of `worker` (`None` if never seen).
    pub async fn state(&self, worker: WorkerId) -> Option<WorkerState> {
        self.inner.read().await.workers.get(&worker).map(|e| e.state)
    }

    /// All known workers with their state, sorted by id.
    pub async fn snapshot(&self) -> Vec<(WorkerId, WorkerState)> {
        let inner = self.inner.read().await;
        let mut all: Vec<_> = inner.workers.iter().map(|(w, e)| (*w, e.state)).collect();
        all.sort_unstable_by_key(|(w, _)| *w);
        all
    }

    /// Number of `ChannelClosed` events seen.
    pub async fn closes(&self) -> usize {
        self.inner.read().await.closes.len()
    }

    /// True if the channel was closed exactly once and after the last send.
    pub async fn closed_once_after_sends(&self) -> bool {
        let inner = self.inner.read().await;
        match (inner.closes.as_slice(), inner.last_sent) {
            ([close], Some(sent)) => *close > sent,
            ([_], None) => true,
            _ => false,
        }
    }

    /// Values received by the drain, in arrival order.
    pub async fn received(&self) -> Vec<u64> {
        self.inner.read().await.received.clone()
    }
}

#[async_trait]
impl Subscribe for Ledger {
    async fn on_event(&self, ev: &Event) {
        self.update(ev).await;
    }

    fn name(&self) -> &'static str {
        "ledger"
    }

    fn queue_capacity(&self) -> usize {
        4096
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(kind: EventKind, w: usize) -> Event {
        Event::new(kind).with_worker(WorkerId::new(w))
    }

    #[tokio::test]
    async fn follows_worker_state_machine() {
        let ledger = Ledger::new();
        let id = WorkerId::new(0);

        assert!(ledger.update(&ev(EventKind::WorkerStarting, 0)).await);
        assert_eq!(ledger.state(id).await, Some(WorkerState::Delaying));
        assert!(ledger.update(&ev(EventKind::WorkerSent, 0).with_delay(2)).await);
        assert!(ledger.update(&ev(EventKind::WorkerTerminated, 0)).await);
        assert_eq!(ledger.state(id).await, Some(WorkerState::Terminated));
    }

    #[tokio::test]
    async fn rejects_stale_events() {
        let ledger = Ledger::new();
        let starting = ev(EventKind::WorkerStarting, 1);
        let done = ev(EventKind::WorkerTerminated, 1);

        assert!(ledger.update(&done).await);
        assert!(!ledger.update(&starting).await);
        assert_eq!(
            ledger.state(WorkerId::new(1)).await,
            Some(WorkerState::Terminated)
        );
    }

    #[tokio::test]
    async fn detects_close_before_send_and_double_close() {
        let early = Ledger::new();
        early.update(&Event::new(EventKind::ChannelClosed)).await;
        early.update(&ev(EventKind::WorkerSent, 0)).await;
        assert!(!early.closed_once_after_sends().await);

        let twice = Ledger::new();
        twice.update(&ev(EventKind::WorkerSent, 0)).await;
        twice.update(&Event::new(EventKind::ChannelClosed)).await;
        assert!(twice.closed_once_after_sends().await);
        twice.update(&Event::new(EventKind::ChannelClosed)).await;
        assert_eq!(twice.closes().await, 2);
        assert!(!twice.closed_once_after_sends().await);
    }
}
