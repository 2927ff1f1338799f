//! # SubscriberSet: per-subscriber queues for one run's events
//!
//! [`SubscriberSet`] hands each [`Event`] to every subscriber through that
//! subscriber's own bounded queue and drain task. `emit` never awaits a
//! subscriber.
//!
//! ## Health events
//! When a queue refuses an event (full or closed) or a subscriber panics while
//! handling one, the set raises [`EventKind::SubscriberOverflow`] or
//! [`EventKind::SubscriberPanicked`] about it and queues that event for every
//! *other* subscriber. A line also goes to stderr. A failure while handling a
//! health event is only written to stderr, so health events never cascade.
//!
//! ## Flush
//! `shutdown()` first waits until every queued event (health events included)
//! has been handled, then closes the queues and joins the drain tasks.
//!
//! ```text
//!    emit(&Event)
//!        │                                  (Arc-clone per subscriber)
//!        ├──► [queue S1] ─► task S1 ─► on_event() ── panic ──┐
//!        ├──► [queue S2] ─► task S2 ─► on_event()            │
//!        └──► [queue SN] ─► task SN ─► on_event()            │
//!        ▲                                                   │
//!        └────── SubscriberPanicked to S2..SN ◄──────────────┘
//! ```

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use futures::FutureExt;
use tokio::{
    sync::{Notify, Semaphore, mpsc, mpsc::error::TrySendError},
    task::JoinHandle,
};

use crate::events::{Event, EventKind};

use super::Subscribe;

/// A subscriber that refused an event: `(index, name, why)`.
type Refusal = (usize, &'static str, &'static str);

/// Queue sender of one subscriber.
struct Route {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Routing table shared by `emit` and the drain tasks, so a task can report
/// its own subscriber's panic to the others.
struct Router {
    routes: RwLock<Vec<Route>>,
    /// Events queued but not yet handled.
    in_flight: AtomicUsize,
    idle: Notify,
}

impl Router {
    /// Queues `ev` for every subscriber but `skip` and returns the refusals.
    fn deliver(&self, ev: &Arc<Event>, skip: Option<usize>) -> Vec<Refusal> {
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        let mut refused = Vec::new();
        for (idx, route) in routes.iter().enumerate() {
            if skip == Some(idx) {
                continue;
            }
            // counted before the send so the drain task can never settle first
            self.in_flight.fetch_add(1, Ordering::AcqRel);
            if let Err(err) = route.sender.try_send(Arc::clone(ev)) {
                self.settle();
                let why = match err {
                    TrySendError::Full(_) => "queue full",
                    TrySendError::Closed(_) => "worker closed",
                };
                refused.push((idx, route.name, why));
            }
        }
        refused
    }

    /// Raises `health` about subscriber `idx` to all the others, unless the
    /// event that caused it was itself a health event.
    fn report(&self, cause: &Event, idx: usize, health: Event) {
        if cause.kind.is_subscriber_health() {
            return;
        }
        for (_, name, why) in self.deliver(&Arc::new(health), Some(idx)) {
            eprintln!("[fanvisor] subscriber '{name}' dropped health event: {why}");
        }
    }

    fn settle(&self) {
        if self.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.idle.notify_waiters();
        }
    }

    async fn wait_idle(&self) {
        loop {
            let idle = self.idle.notified();
            if self.in_flight.load(Ordering::Acquire) == 0 {
                return;
            }
            idle.await;
        }
    }

    /// Drops every sender; the drain tasks end once their queues are empty.
    fn close(&self) {
        self.routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Fan-out over subscribers with bounded queues, panic isolation and health events.
pub struct SubscriberSet {
    router: Arc<Router>,
    tasks: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Creates a set using each subscriber's preferred queue capacity.
    ///
    /// Must be called within a tokio runtime.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self::with_min_capacity(subs, 1)
    }

    /// Creates a set whose queues hold at least `min` events each.
    ///
    /// A run passes its event budget here, so runtime-owned subscribers never
    /// overflow. Must be called within a tokio runtime.
    #[must_use]
    pub fn with_min_capacity(subs: Vec<Arc<dyn Subscribe>>, min: usize) -> Self {
        let router = Arc::new(Router {
            routes: RwLock::new(Vec::with_capacity(subs.len())),
            in_flight: AtomicUsize::new(0),
            idle: Notify::new(),
        });
        let mut routes = Vec::with_capacity(subs.len());
        let mut tasks = Vec::with_capacity(subs.len());

        for (idx, sub) in subs.into_iter().enumerate() {
            let cap = sub
                .queue_capacity()
                .max(min)
                .clamp(1, Semaphore::MAX_PERMITS);
            let name = sub.name();
            let (sender, rx) = mpsc::channel::<Arc<Event>>(cap);
            tasks.push(tokio::spawn(drain(idx, sub, rx, Arc::clone(&router))));
            routes.push(Route { name, sender });
        }
        *router.routes.write().unwrap_or_else(PoisonError::into_inner) = routes;

        Self { router, tasks }
    }

    /// Queues one event for every subscriber without waiting.
    ///
    /// A refusing subscriber loses the event; the others get a
    /// [`EventKind::SubscriberOverflow`] about it.
    pub fn emit(&self, event: &Event) {
        let ev = Arc::new(event.clone());
        for (idx, name, why) in self.router.deliver(&ev, None) {
            eprintln!("[fanvisor] subscriber '{name}' dropped event: {why}");
            let overflow = Event::new(EventKind::SubscriberOverflow)
                .with_subscriber(name)
                .with_reason(why);
            self.router.report(&ev, idx, overflow);
        }
    }

    /// Waits until every queued event is handled, then closes the queues and
    /// joins the drain tasks.
    pub async fn shutdown(mut self) {
        self.router.wait_idle().await;
        self.router.close();
        for task in std::mem::take(&mut self.tasks) {
            let _ = task.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}

impl Drop for SubscriberSet {
    fn drop(&mut self) {
        // the drain tasks hold the router, so the queues only close from here
        self.router.close();
    }
}

async fn drain(
    idx: usize,
    sub: Arc<dyn Subscribe>,
    mut rx: mpsc::Receiver<Arc<Event>>,
    router: Arc<Router>,
) {
    let name = sub.name();
    while let Some(ev) = rx.recv().await {
        let handled = AssertUnwindSafe(sub.on_event(ev.as_ref()))
            .catch_unwind()
            .await;
        if let Err(payload) = handled {
            let info = panic_message(payload.as_ref());
            eprintln!("[fanvisor] subscriber '{name}' panicked: {info}");
            let panicked = Event::new(EventKind::SubscriberPanicked)
                .with_subscriber(name)
                .with_reason(info);
            router.report(&ev, idx, panicked);
        }
        router.settle();
    }
}

/// Renders a caught panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    /// Records `(kind, subscriber)` of every event it sees.
    struct Recorder {
        name: &'static str,
        capacity: usize,
        seen: Mutex<Vec<(EventKind, Option<&'static str>)>>,
    }

    impl Recorder {
        fn new(name: &'static str, capacity: usize) -> Arc<Self> {
            Arc::new(Self {
                name,
                capacity,
                seen: Mutex::new(Vec::new()),
            })
        }

        async fn count(&self, kind: EventKind) -> usize {
            self.seen.lock().await.iter().filter(|(k, _)| *k == kind).count()
        }

        async fn total(&self) -> usize {
            self.seen.lock().await.len()
        }
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.seen.lock().await.push((ev.kind, ev.subscriber));
        }
        fn name(&self) -> &'static str {
            self.name
        }
        fn queue_capacity(&self) -> usize {
            self.capacity
        }
    }

    struct Bomb(&'static str);

    #[async_trait]
    impl Subscribe for Bomb {
        async fn on_event(&self, _ev: &Event) {
            panic!("{} went off", self.0);
        }
        fn name(&self) -> &'static str {
            self.0
        }
    }

    #[tokio::test]
    async fn shutdown_flushes_queued_events() {
        let rec = Recorder::new("rec", 1024);
        let set = SubscriberSet::new(vec![rec.clone() as Arc<dyn Subscribe>]);
        assert_eq!(set.len(), 1);

        for _ in 0..10 {
            set.emit(&Event::new(EventKind::ResultReceived));
        }
        set.shutdown().await;
        assert_eq!(rec.count(EventKind::ResultReceived).await, 10);
    }

    #[tokio::test]
    async fn panic_is_isolated_and_reported_to_others() {
        let rec = Recorder::new("rec", 1024);
        let set = SubscriberSet::new(vec![
            Arc::new(Bomb("bomb")) as Arc<dyn Subscribe>,
            rec.clone() as Arc<dyn Subscribe>,
        ]);

        set.emit(&Event::new(EventKind::WorkerStarting));
        set.emit(&Event::new(EventKind::WorkerSent));
        set.shutdown().await;

        let seen = rec.seen.lock().await.clone();
        assert_eq!(seen.len(), 4, "seen {seen:?}");
        assert_eq!(rec.count(EventKind::WorkerStarting).await, 1);
        assert_eq!(rec.count(EventKind::WorkerSent).await, 1);
        assert!(
            seen.iter()
                .filter(|(k, _)| *k == EventKind::SubscriberPanicked)
                .all(|(_, sub)| *sub == Some("bomb"))
        );
        assert_eq!(rec.count(EventKind::SubscriberPanicked).await, 2);
    }

    #[tokio::test]
    async fn full_queue_is_reported_to_others() {
        let narrow = Recorder::new("narrow", 1);
        let rec = Recorder::new("rec", 1024);
        let set = SubscriberSet::new(vec![
            narrow.clone() as Arc<dyn Subscribe>,
            rec.clone() as Arc<dyn Subscribe>,
        ]);

        // no await between emits: the narrow queue cannot drain in between
        for _ in 0..3 {
            set.emit(&Event::new(EventKind::ResultReceived));
        }
        set.shutdown().await;

        assert_eq!(narrow.total().await, 1);
        assert_eq!(rec.count(EventKind::ResultReceived).await, 3);
        assert_eq!(rec.count(EventKind::SubscriberOverflow).await, 2);
        let seen = rec.seen.lock().await.clone();
        assert!(
            seen.iter()
                .filter(|(k, _)| *k == EventKind::SubscriberOverflow)
                .all(|(_, sub)| *sub == Some("narrow"))
        );
    }

    #[tokio::test]
    async fn health_events_do_not_cascade() {
        let rec = Recorder::new("rec", 1024);
        let set = SubscriberSet::new(vec![
            Arc::new(Bomb("left")) as Arc<dyn Subscribe>,
            Arc::new(Bomb("right")) as Arc<dyn Subscribe>,
            rec.clone() as Arc<dyn Subscribe>,
        ]);

        set.emit(&Event::new(EventKind::AllFinished));
        set.shutdown().await;

        // the event itself plus one report per bomb; the bombs also blow up on
        // each other's reports, which raises nothing further
        assert_eq!(rec.total().await, 3);
        assert_eq!(rec.count(EventKind::SubscriberPanicked).await, 2);
    }

    #[tokio::test]
    async fn min_capacity_overrides_preference() {
        let narrow = Recorder::new("narrow", 1);
        let set =
            SubscriberSet::with_min_capacity(vec![narrow.clone() as Arc<dyn Subscribe>], 8);

        for _ in 0..8 {
            set.emit(&Event::new(EventKind::WorkerSent));
        }
        set.shutdown().await;
        assert_eq!(narrow.count(EventKind::WorkerSent).await, 8);
    }

    #[test]
    fn panic_message_variants() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let borrowed: Box<dyn Any + Send> = Box::new("borrowed");
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(borrowed.as_ref()), "borrowed");
    }
}
