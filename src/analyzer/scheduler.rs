//! Analyzer scheduler
//!
//! A two-state loop: **Waiting** blocks on the queue's wake channel with a
//! bounded timeout; **Analyzing** takes a snapshot-consistent read of the
//! queue, emits a report and returns to Waiting. The wait is always bounded
//! by the fixed periodic interval, so the analyzer makes forward progress
//! even if no push ever fills the queue.

use crate::analyzer::report::QueueReport;
use crate::analyzer::sink::ReportSink;
use crate::core::sync::handle_mutex_poison;
use crate::queue::{ExpiringQueue, QueueError, QueueResult, WakeReason};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;

/// Periodic queue analyzer
///
/// Woken either by the queue's "became full" signal or by the fixed
/// interval elapsing, whichever occurs first. Every completed pass
/// increments the launch counter, including passes whose sink failed.
pub struct QueueAnalyzer<T> {
    queue: Arc<ExpiringQueue<T>>,
    sink: Mutex<Box<dyn ReportSink>>,
    interval: Duration,
    launch_count: AtomicUsize,
}

impl<T: Clone> QueueAnalyzer<T> {
    pub fn new(
        queue: Arc<ExpiringQueue<T>>,
        interval: Duration,
        sink: Box<dyn ReportSink>,
    ) -> Self {
        Self {
            queue,
            sink: Mutex::new(sink),
            interval,
            launch_count: AtomicUsize::new(0),
        }
    }

    /// Number of completed analysis passes
    pub fn launch_count(&self) -> usize {
        self.launch_count.load(Ordering::Acquire)
    }

    /// The fixed periodic wake interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one analysis pass
    ///
    /// Takes a consistent snapshot under the queue's lock, builds the
    /// report and emits it. A failing sink is logged and skipped; the pass
    /// still counts and the full-queue signal is still cleared, so a
    /// broken sink never stalls the wait loop.
    pub fn analyze_once(&self, reason: WakeReason) -> QueueResult<QueueReport> {
        let launch = self.launch_count.load(Ordering::Acquire) + 1;
        log::info!("Running queue analysis #{launch} (reason: {reason})");

        let snapshot = self.queue.snapshot()?;
        let memory = self.queue.memory_stats()?;
        let report = QueueReport::from_snapshot(
            launch,
            reason,
            &snapshot,
            self.queue.capacity(),
            memory,
        );

        {
            let mut sink = handle_mutex_poison(self.sink.lock(), |message| {
                QueueError::LockPoisoned { message }
            })?;
            if let Err(err) = sink.write_report(&report) {
                log::warn!("Skipping report emission for analysis #{launch}: {err}");
            }
        }

        self.queue.clear_full_signal();
        self.launch_count.fetch_add(1, Ordering::Release);

        Ok(report)
    }

    /// Run the Waiting/Analyzing loop until `deadline` or shutdown
    ///
    /// Each wait is bounded by `min(interval, remaining)`; the wake reason
    /// records whether the queue filled up or the timeout elapsed. The
    /// loop exits cleanly between passes, never mid-analysis.
    pub async fn run_until(
        &self,
        deadline: Instant,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> QueueResult<()> {
        loop {
            let now = Instant::now();
            if now >= deadline {
                log::debug!("Analyzer deadline reached after {} passes", self.launch_count());
                return Ok(());
            }

            let bounded_by = self.interval.min(deadline - now);
            let reason = tokio::select! {
                reason = self.queue.wait_until_full(bounded_by) => reason,
                _ = shutdown_rx.recv() => {
                    log::debug!("Analyzer stopping on shutdown signal");
                    return Ok(());
                }
            };

            self.analyze_once(reason)?;
        }
    }
}
