//! Demo run: five workers, delays in `[1, 5]` seconds, results printed as they arrive.
//!
//! ```bash
//! cargo run
//! cargo run --features logging   # also print every lifecycle event
//! ```

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use async_trait::async_trait;
use fanvisor::{
    Config, Coordinator, DelayRef, Event, EventKind, RandomDelay, Report, Subscribe,
};

/// Output shared by the announcer and the drain loop.
type Console<W> = Arc<Mutex<W>>;

/// Writes each worker's start announcement.
struct Announcer<W> {
    out: Console<W>,
}

#[async_trait]
impl<W: Write + Send + 'static> Subscribe for Announcer<W> {
    async fn on_event(&self, ev: &Event) {
        if let (EventKind::WorkerStarting, Some(worker), Some(delay)) =
            (ev.kind, ev.worker, ev.delay)
        {
            // nowhere to report a failed console write from here
            if let Ok(mut out) = self.out.lock() {
                let _ = writeln!(out, "Worker {worker} is working for {delay} seconds");
            }
        }
    }

    fn name(&self) -> &'static str {
        "announcer"
    }
}

fn lock<W>(out: &Console<W>) -> anyhow::Result<MutexGuard<'_, W>> {
    out.lock().map_err(|_| anyhow!("console writer poisoned"))
}

/// Builds a coordinator whose start announcements go to `out`.
fn coordinator<W: Write + Send + 'static>(
    cfg: Config,
    delays: DelayRef,
    out: &Console<W>,
) -> anyhow::Result<Coordinator> {
    #[allow(unused_mut)]
    let mut subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Announcer {
        out: Arc::clone(out),
    })];
    #[cfg(feature = "logging")]
    subs.push(Arc::new(fanvisor::LogWriter::new()));

    Ok(Coordinator::builder(cfg)
        .with_delays(delays)
        .with_subscribers(subs)
        .build()?)
}

/// Runs once, writing every received result and the closing line to `out`.
async fn report<W: Write>(coordinator: &Coordinator, out: &Console<W>) -> anyhow::Result<Report> {
    let mut results = coordinator.run_all();
    while let Some(result) = results.recv().await {
        writeln!(lock(out)?, "Received result: {result} seconds")?;
    }
    let report = results.finish().await?;

    writeln!(lock(out)?, "All workers finished.")?;
    Ok(report)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let out = Arc::new(Mutex::new(io::stdout()));
    let coordinator = coordinator(Config::default(), Arc::new(RandomDelay), &out)?;
    report(&coordinator, &out).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanvisor::FixedDelays;

    async fn run(workers: usize, delays: DelayRef) -> (Report, Vec<String>) {
        let out: Console<Vec<u8>> = Arc::new(Mutex::new(Vec::new()));
        let cfg = Config {
            workers,
            ..Config::default()
        };
        let c = coordinator(cfg, delays, &out).unwrap();
        let report = report(&c, &out).await.unwrap();

        let text = String::from_utf8(out.lock().unwrap().clone()).unwrap();
        (report, text.lines().map(str::to_owned).collect())
    }

    #[tokio::test(start_paused = true)]
    async fn five_workers_print_announcements_results_then_final_line() {
        let (report, lines) = run(5, Arc::new(FixedDelays::new([3, 1, 5, 2, 4]))).await;
        assert_eq!(report.received, 5);
        assert_eq!(lines.len(), 11, "{lines:#?}");

        let mut announced: Vec<&str> = lines[..5].iter().map(String::as_str).collect();
        announced.sort_unstable();
        assert_eq!(
            announced,
            vec![
                "Worker 1 is working for 3 seconds",
                "Worker 2 is working for 1 seconds",
                "Worker 3 is working for 5 seconds",
                "Worker 4 is working for 2 seconds",
                "Worker 5 is working for 4 seconds",
            ]
        );
        assert_eq!(
            lines[5..10],
            [
                "Received result: 1 seconds",
                "Received result: 2 seconds",
                "Received result: 3 seconds",
                "Received result: 4 seconds",
                "Received result: 5 seconds",
            ]
        );
        assert_eq!(lines[10], "All workers finished.");
    }

    #[tokio::test(start_paused = true)]
    async fn random_delays_stay_in_demo_bounds() {
        let (_, lines) = run(5, Arc::new(RandomDelay)).await;
        let values: Vec<u64> = lines
            .iter()
            .filter_map(|l| l.strip_prefix("Received result: "))
            .filter_map(|l| l.strip_suffix(" seconds"))
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(values.len(), 5);
        assert!(values.iter().all(|v| (1..=5).contains(v)), "{values:?}");
        assert_eq!(lines.last().map(String::as_str), Some("All workers finished."));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_workers_print_only_the_final_line() {
        let (report, lines) = run(0, Arc::new(RandomDelay)).await;
        assert_eq!(report.received, 0);
        assert_eq!(lines, vec!["All workers finished."]);
    }
}
