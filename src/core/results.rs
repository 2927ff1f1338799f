//! # Results: the consumer side of a run.
//!
//! [`Results`] drains the shared channel. It is a lazy, finite, one-shot
//! sequence: values arrive in completion order and the sequence ends once the
//! supervisory task has closed the channel.
//!
//! ```text
//! recv() ──► Some(v)   (publishes ResultReceived)
//!        ──► None      channel closed and empty
//!
//! finish():
//!   ├─► drain remaining values
//!   ├─► await supervisory task  → launched count or RuntimeError
//!   ├─► publish AllFinished, release the bus
//!   └─► await listener          → subscriber queues flushed or RuntimeError
//! ```

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::{
    sync::mpsc,
    task::{JoinError, JoinHandle},
};

use crate::{
    error::RuntimeError,
    events::{Bus, Event, EventKind},
};

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Workers spawned by `run_all()`.
    pub launched: usize,
    /// Results delivered to the consumer.
    pub received: usize,
}

/// Drain over the results of one run.
///
/// Obtained from [`Coordinator::run_all`](crate::Coordinator::run_all). Also
/// usable as a [`Stream`] of `u64`.
pub struct Results {
    rx: mpsc::UnboundedReceiver<u64>,
    bus: Bus,
    supervisor: JoinHandle<Result<usize, RuntimeError>>,
    listener: JoinHandle<()>,
    received: usize,
}

impl Results {
    pub(crate) fn new(
        rx: mpsc::UnboundedReceiver<u64>,
        bus: Bus,
        supervisor: JoinHandle<Result<usize, RuntimeError>>,
        listener: JoinHandle<()>,
    ) -> Self {
        Self {
            rx,
            bus,
            supervisor,
            listener,
            received: 0,
        }
    }

    /// Receives the next result, or `None` once the channel is closed and empty.
    pub async fn recv(&mut self) -> Option<u64> {
        let value = self.rx.recv().await?;
        self.record(value);
        Some(value)
    }

    /// Number of results received so far.
    #[inline]
    pub fn received(&self) -> usize {
        self.received
    }

    /// Drains what is left, waits for the supervisory task and flushes subscribers.
    ///
    /// Returns the supervisory task's error if the run failed fast, otherwise
    /// a [`RuntimeError::Join`] if either background task died.
    pub async fn finish(mut self) -> Result<Report, RuntimeError> {
        while self.recv().await.is_some() {}

        let Results {
            rx,
            bus,
            supervisor,
            listener,
            received,
        } = self;
        drop(rx);

        let outcome = joined("supervisor", supervisor.await).and_then(|launched| launched);

        bus.publish(Event::new(EventKind::AllFinished));
        drop(bus);
        // Ends once every bus clone is gone and the subscriber queues are flushed.
        let flushed = joined("event listener", listener.await);

        let launched = outcome?;
        flushed?;
        Ok(Report { launched, received })
    }

    fn record(&mut self, value: u64) {
        self.received += 1;
        self.bus
            .publish(Event::new(EventKind::ResultReceived).with_delay(value));
    }
}

/// Maps a background task's join failure to [`RuntimeError::Join`].
fn joined<T>(context: &'static str, res: Result<T, JoinError>) -> Result<T, RuntimeError> {
    res.map_err(|err| RuntimeError::Join {
        context,
        reason: err.to_string(),
    })
}

impl Stream for Results {
    type Item = u64;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<u64>> {
        let this = self.get_mut();
        match this.rx.poll_recv(cx) {
            Poll::Ready(Some(value)) => {
                this.record(value);
                Poll::Ready(Some(value))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dead_listener_is_reported() {
        let (tx, rx) = mpsc::unbounded_channel::<u64>();
        drop(tx);
        let supervisor = tokio::spawn(async { Ok::<usize, RuntimeError>(0) });
        let listener: JoinHandle<()> = tokio::spawn(async { panic!("listener went down") });
        let results = Results::new(rx, Bus::new(4), supervisor, listener);

        match results.finish().await {
            Err(RuntimeError::Join { context, reason }) => {
                assert_eq!(context, "event listener");
                assert!(reason.contains("panic"), "reason={reason}");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn supervisor_error_wins_over_listener() {
        let (tx, rx) = mpsc::unbounded_channel::<u64>();
        drop(tx);
        let supervisor = tokio::spawn(async {
            Err::<usize, _>(RuntimeError::InvalidBounds { min: 2, max: 1 })
        });
        let listener: JoinHandle<()> = tokio::spawn(async { panic!("listener went down") });

        let err = Results::new(rx, Bus::new(4), supervisor, listener)
            .finish()
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidBounds { .. }));
    }
}
