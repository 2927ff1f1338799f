//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for test or demo.
//!
//! ## Example output
//! ```text
//! [starting] worker=1 delay=3
//! [sent] worker=1 value=3
//! [terminated] worker=1
//! [channel-closed]
//! [received] value=3
//! [all-finished]
//! [subscriber-panicked] subscriber=ledger info=boom
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn worker(e: &Event) -> String {
    e.worker
        .map(|w| w.to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn value(e: &Event) -> String {
    e.delay
        .map(|d| d.to_string())
        .unwrap_or_else(|| "?".to_string())
}

/// Renders one event in bracket form.
fn line(e: &Event) -> String {
    let reason = e.reason.as_deref().unwrap_or("unknown");
    match e.kind {
        EventKind::WorkerStarting => format!("[starting] worker={} delay={}", worker(e), value(e)),
        EventKind::WorkerSent => format!("[sent] worker={} value={}", worker(e), value(e)),
        EventKind::WorkerTerminated => format!("[terminated] worker={}", worker(e)),
        EventKind::WorkerFailed => format!("[failed] worker={} err={reason}", worker(e)),
        EventKind::ChannelClosed => match e.reason.as_deref() {
            Some(reason) => format!("[channel-closed] reason={reason}"),
            None => "[channel-closed]".to_string(),
        },
        EventKind::ResultReceived => format!("[received] value={}", value(e)),
        EventKind::AllFinished => "[all-finished]".to_string(),
        EventKind::SubscriberOverflow => format!(
            "[subscriber-overflow] subscriber={} reason={reason}",
            e.subscriber.unwrap_or("?")
        ),
        EventKind::SubscriberPanicked => format!(
            "[subscriber-panicked] subscriber={} info={reason}",
            e.subscriber.unwrap_or("?")
        ),
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        println!("{}", line(e));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
