//! # Supervisory task: join every worker, then close the result channel.
//!
//! The supervisory task owns the **last** result sender. Every worker holds a
//! clone that is dropped when its future completes. The channel therefore
//! closes exactly once, when this task drops its sender after the join-all.
//!
//! ```text
//! supervise(set, tx, bus)
//!   ├─► while join_next():
//!   │     ├─ Ok((_, Ok(())))       → worker accounted for
//!   │     ├─ Ok((worker, Err(e)))  → first failure? abort_all(), remember it
//!   │     ├─ Err(cancelled)        → aborted by fail-fast, accounted for
//!   │     └─ Err(other)            → first failure? abort_all(), remember it
//!   ├─► drop(tx)                   → channel Open → Closed
//!   └─► publish ChannelClosed
//! ```
//!
//! ## Rules
//! - Close happens-after every worker future has been dropped, so no send can
//!   race the close.
//! - The first failure wins; later ones are only accounted for.

use tokio::{sync::mpsc, task::JoinSet};

use crate::{
    error::{RuntimeError, WorkError},
    events::{Bus, Event, EventKind},
    work::WorkerId,
};

pub(crate) type WorkerSet = JoinSet<(WorkerId, Result<(), WorkError>)>;

/// Waits for all workers, closes the channel and returns how many were launched.
pub(crate) async fn supervise(
    mut set: WorkerSet,
    tx: mpsc::UnboundedSender<u64>,
    bus: Bus,
) -> Result<usize, RuntimeError> {
    let launched = set.len();
    let mut failure: Option<RuntimeError> = None;

    while let Some(joined) = set.join_next().await {
        let err = match joined {
            Ok((_, Ok(()))) => continue,
            Ok((worker, Err(error))) => RuntimeError::WorkerFailed { worker, error },
            Err(join_err) if join_err.is_cancelled() => continue,
            Err(join_err) => RuntimeError::Join {
                context: "worker",
                reason: join_err.to_string(),
            },
        };
        if failure.is_none() {
            set.abort_all();
            failure = Some(err);
        }
    }

    drop(tx);
    let closed = Event::new(EventKind::ChannelClosed);
    bus.publish(match &failure {
        Some(err) => closed.with_reason(err.as_message()),
        None => closed,
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(launched),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn closes_only_after_all_joined() {
        let bus = Bus::new(16);
        let (tx, mut rx) = mpsc::unbounded_channel::<u64>();
        let mut set = WorkerSet::new();
        for i in 0..3u64 {
            let tx = tx.clone();
            set.spawn(async move {
                tokio::time::sleep(Duration::from_secs(3 - i)).await;
                let _ = tx.send(i);
                (WorkerId::new(i as usize), Ok(()))
            });
        }

        let sup = tokio::spawn(supervise(set, tx, bus));
        let mut got = Vec::new();
        while let Some(v) = rx.recv().await {
            got.push(v);
        }
        assert_eq!(got, vec![2, 1, 0]);
        assert_eq!(sup.await.unwrap().unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn first_failure_aborts_the_rest() {
        let bus = Bus::new(16);
        let mut events = bus.subscribe();
        let (tx, mut rx) = mpsc::unbounded_channel::<u64>();
        let mut set = WorkerSet::new();
        set.spawn(async {
            (
                WorkerId::new(0),
                Err(WorkError::Fail {
                    error: "boom".into(),
                }),
            )
        });
        let slow = tx.clone();
        set.spawn(async move {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            let _ = slow.send(1);
            (WorkerId::new(1), Ok(()))
        });

        let res = supervise(set, tx, bus).await;
        assert!(matches!(
            res,
            Err(RuntimeError::WorkerFailed { worker, .. }) if worker == WorkerId::new(0)
        ));
        assert_eq!(rx.recv().await, None);

        let closed = events.recv().await.unwrap();
        assert_eq!(closed.kind, EventKind::ChannelClosed);
        assert!(closed.reason.is_some());
    }
}
