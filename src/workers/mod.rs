//! Worker task loops exercising the queue contract
//!
//! Workers are external callers of the queue: mixed workers alternate
//! between pushing generated notifications and popping, drainers only pop.
//! Every loop re-checks its deadline and the shutdown flag between
//! iterations and exits cleanly, never cancelled while holding the
//! queue's lock. Notification generation is an injected capability via
//! [`NotificationSource`], keeping randomness out of the core.

use crate::core::shutdown::ShutdownCoordinator;
use crate::queue::{ExpiringQueue, Notification, QueueError, Urgency};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::time::Instant;

/// Injected capability supplying a worker's notifications and pacing
pub trait NotificationSource<T>: Send {
    /// Produce the next notification to push
    fn next_notification(&mut self) -> Notification<T>;

    /// Decide whether the next operation is a push (`true`) or a pop
    fn should_push(&mut self) -> bool;

    /// How long the worker pauses between iterations
    fn think_time(&mut self) -> Duration;
}

/// Per-task operation tally, for conservation checks and end-of-run stats
#[derive(Debug, Clone)]
pub struct WorkerTally<T> {
    /// Payloads successfully pushed
    pub pushed: Vec<T>,
    /// Payloads successfully popped
    pub popped: Vec<T>,
    /// Pushes rejected because the queue stayed full after eviction
    pub rejected: usize,
    /// Pop attempts that found no valid notification
    pub empty_pops: usize,
}

impl<T> Default for WorkerTally<T> {
    fn default() -> Self {
        Self {
            pushed: Vec::new(),
            popped: Vec::new(),
            rejected: 0,
            empty_pops: 0,
        }
    }
}

/// Run a push-or-pop worker until the deadline or shutdown
pub async fn run_mixed_worker<T, S>(
    queue: Arc<ExpiringQueue<T>>,
    deadline: Instant,
    shutdown: Arc<ShutdownCoordinator>,
    mut source: S,
) -> WorkerTally<T>
where
    T: Clone + Send,
    S: NotificationSource<T>,
{
    let mut tally = WorkerTally::default();

    loop {
        if shutdown.is_shutdown_requested() || Instant::now() >= deadline {
            log::debug!("Mixed worker stopping");
            return tally;
        }

        if source.should_push() {
            let notification = source.next_notification();
            let payload = notification.payload().clone();
            match queue.push(notification) {
                Ok(()) => {
                    log::debug!("Notification pushed");
                    tally.pushed.push(payload);
                }
                Err(QueueError::AtCapacity { capacity }) => {
                    log::info!("Push rejected, queue still full after eviction (capacity {capacity})");
                    tally.rejected += 1;
                }
                Err(err) => {
                    log::warn!("Mixed worker giving up after push failure: {err}");
                    return tally;
                }
            }
        } else {
            match queue.pop() {
                Ok(Some(notification)) => {
                    log::debug!("Valid notification popped");
                    tally.popped.push(notification.into_payload());
                }
                Ok(None) => {
                    log::debug!("No valid notification in the queue");
                    tally.empty_pops += 1;
                }
                Err(err) => {
                    log::warn!("Mixed worker giving up after pop failure: {err}");
                    return tally;
                }
            }
        }

        if !pause_until_deadline(source.think_time(), deadline).await {
            return tally;
        }
    }
}

/// Run a pop-only worker until the deadline or shutdown
pub async fn run_drainer<T>(
    queue: Arc<ExpiringQueue<T>>,
    deadline: Instant,
    shutdown: Arc<ShutdownCoordinator>,
    pause: Duration,
) -> WorkerTally<T>
where
    T: Clone + Send,
{
    let mut tally = WorkerTally::default();

    loop {
        if shutdown.is_shutdown_requested() || Instant::now() >= deadline {
            log::debug!("Drainer stopping");
            return tally;
        }

        match queue.pop() {
            Ok(Some(notification)) => tally.popped.push(notification.into_payload()),
            Ok(None) => tally.empty_pops += 1,
            Err(err) => {
                log::warn!("Drainer giving up after pop failure: {err}");
                return tally;
            }
        }

        if !pause_until_deadline(pause, deadline).await {
            return tally;
        }
    }
}

/// Sleep for `pause` capped at the deadline; `false` once the deadline hit
async fn pause_until_deadline(pause: Duration, deadline: Instant) -> bool {
    let now = Instant::now();
    if now >= deadline {
        return false;
    }
    tokio::time::sleep(pause.min(deadline - now)).await;
    Instant::now() < deadline
}

/// Random notification generator for the demo binary
///
/// Mirrors the simulation's original workload: uniform urgency, expiry
/// offsets between -2 and +2 hours (so roughly half the generated
/// notifications are already expired), sequential payloads and a
/// 10-500 ms think time.
pub struct RandomSource {
    rng: StdRng,
    next_payload: u64,
}

impl RandomSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            next_payload: 0,
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next_payload: 0,
        }
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSource<u64> for RandomSource {
    fn next_notification(&mut self) -> Notification<u64> {
        let urgency = match self.rng.random_range(0..3) {
            0 => Urgency::Low,
            1 => Urgency::Medium,
            _ => Urgency::High,
        };
        // -2h..=+2h around now, matching the simulated workload
        let offset_hours: i64 = self.rng.random_range(-2..=2);
        let now = SystemTime::now();
        let valid_until = if offset_hours >= 0 {
            now + Duration::from_secs(offset_hours as u64 * 3600)
        } else {
            now - Duration::from_secs(offset_hours.unsigned_abs() * 3600)
        };

        let payload = self.next_payload;
        self.next_payload += 1;
        Notification::new(urgency, valid_until, payload)
    }

    fn should_push(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    fn think_time(&mut self) -> Duration {
        Duration::from_millis(self.rng.random_range(10..=500))
    }
}
