//! Internal ExpiringQueue implementation
//!
//! Fixed-capacity, priority-ordered container with lazy removal of expired
//! notifications. One coarse mutex guards the slot array; a notify handle
//! plus an atomic flag form the wake channel consumed by the analyzer
//! scheduler when a push fills the queue to capacity.

use crate::core::sync::handle_mutex_poison;
use crate::core::time::{SystemTimeProvider, TimeProvider};
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::notification::Notification;
use serde::Serialize;
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Why the analyzer scheduler woke up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WakeReason {
    /// A push filled the queue to capacity
    Full,
    /// The periodic timeout elapsed without a signal
    Periodic,
}

/// Approximate memory footprint of the queue structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    /// Number of occupied slots
    pub occupied_slots: usize,
    /// Total slot capacity
    pub capacity: usize,
    /// Size of a single slot in bytes
    pub slot_bytes: usize,
    /// Total footprint of the backing storage plus bookkeeping, in bytes
    pub total_bytes: usize,
}

/// Bounded, priority-ordered, self-expiring notification queue
///
/// Slots `[0, length)` hold all currently-tracked notifications, not
/// necessarily sorted between pushes; ordering is materialised on demand
/// during `pop` and during eviction. All public operations acquire the
/// internal lock for their full duration, which makes the operation
/// history linearizable.
pub struct ExpiringQueue<T> {
    /// Occupied slots; never grows beyond `capacity`
    slots: Mutex<Vec<Notification<T>>>,

    /// Fixed capacity chosen at construction
    capacity: usize,

    /// Wake channel raised when a push fills the queue to capacity
    full_signal: Notify,

    /// Observable "queue became full" flag, cleared by the analyzer
    full_flag: AtomicBool,

    /// Clock used for all validity checks
    clock: Arc<dyn TimeProvider>,
}

impl<T> ExpiringQueue<T> {
    /// Create an empty queue with the given fixed capacity
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, Arc::new(SystemTimeProvider))
    }

    /// Create an empty queue that evaluates validity against `clock`
    pub fn with_clock(capacity: usize, clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            slots: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
            full_signal: Notify::new(),
            full_flag: AtomicBool::new(false),
            clock,
        }
    }

    /// Fixed capacity of the queue
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current logical occupancy
    pub fn size(&self) -> QueueResult<usize> {
        Ok(self.lock_slots()?.len())
    }

    pub fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.lock_slots()?.is_empty())
    }

    pub fn is_full(&self) -> QueueResult<bool> {
        Ok(self.lock_slots()?.len() == self.capacity)
    }

    /// Push a notification, evicting expired entries when at capacity
    ///
    /// If the queue is full, expired notifications are first removed
    /// (stably, so valid entries keep their relative order). A queue that
    /// is still full afterwards rejects the push with
    /// [`QueueError::AtCapacity`]; existing entries are never overwritten.
    ///
    /// A push that brings the queue to capacity raises the wake signal
    /// before returning, so the analyzer can observe "queue became full"
    /// even if it races with further pushes and pops.
    pub fn push(&self, notification: Notification<T>) -> QueueResult<()> {
        let became_full = {
            let mut slots = self.lock_slots()?;

            if slots.len() == self.capacity {
                let now = self.clock.system_time();
                let before = slots.len();
                slots.retain(|n| n.is_valid_at(now));
                log::debug!(
                    "Evicted {} expired notifications from full queue, {} left",
                    before - slots.len(),
                    slots.len()
                );
            }

            if slots.len() == self.capacity {
                return Err(QueueError::AtCapacity {
                    capacity: self.capacity,
                });
            }

            slots.push(notification);
            slots.len() == self.capacity
        };

        if became_full {
            self.full_flag.store(true, Ordering::Release);
            self.full_signal.notify_one();
        }

        Ok(())
    }

    /// Pop the highest-urgency, earliest-inserted valid notification
    ///
    /// Expired notifications encountered while searching are physically
    /// removed even when the final result is `None`, so a pop attempt
    /// always drains stale entries. Returns `Ok(None)` once the queue is
    /// empty or every occupant has expired.
    pub fn pop(&self) -> QueueResult<Option<Notification<T>>> {
        let mut slots = self.lock_slots()?;
        let now = self.clock.system_time();

        while !slots.is_empty() {
            let index = index_of_max_priority(&slots);
            // Shifts subsequent slots left by one
            let notification = slots.remove(index);
            if notification.is_valid_at(now) {
                return Ok(Some(notification));
            }
            log::debug!("Discarded expired notification during pop");
        }

        Ok(None)
    }

    /// Block until a push fills the queue or the timeout elapses
    ///
    /// The scheduler-facing half of the wake channel. The wait is always
    /// bounded by `bounded_by`, guaranteeing forward progress even if no
    /// push ever fills the queue.
    pub async fn wait_until_full(&self, bounded_by: Duration) -> WakeReason {
        match tokio::time::timeout(bounded_by, self.full_signal.notified()).await {
            Ok(()) => WakeReason::Full,
            Err(_) => WakeReason::Periodic,
        }
    }

    /// Whether the "queue became full" flag is currently raised
    pub fn is_full_signalled(&self) -> bool {
        self.full_flag.load(Ordering::Acquire)
    }

    /// Clear the "queue became full" flag after an analysis pass
    pub fn clear_full_signal(&self) {
        self.full_flag.store(false, Ordering::Release);
    }

    /// Approximate memory footprint of the structure
    pub fn memory_stats(&self) -> QueueResult<MemoryStats> {
        let slots = self.lock_slots()?;
        let slot_bytes = mem::size_of::<Notification<T>>();

        Ok(MemoryStats {
            occupied_slots: slots.len(),
            capacity: self.capacity,
            slot_bytes,
            // Backing storage plus the occupancy counter
            total_bytes: self.capacity * slot_bytes + mem::size_of::<usize>(),
        })
    }

    fn lock_slots(&self) -> QueueResult<std::sync::MutexGuard<'_, Vec<Notification<T>>>> {
        handle_mutex_poison(self.slots.lock(), |message| QueueError::LockPoisoned {
            message,
        })
    }
}

impl<T: Clone> ExpiringQueue<T> {
    /// Snapshot-consistent copy of the current occupants
    ///
    /// Taken under the queue's lock, in slot order (not priority order).
    /// This is the narrow read-only interface the analyzer consumes; it
    /// never mutates the queue and so never triggers eviction.
    pub fn snapshot(&self) -> QueueResult<Vec<Notification<T>>> {
        Ok(self.lock_slots()?.clone())
    }
}

/// Index of the maximum-urgency occupant; ties keep the earliest insertion
fn index_of_max_priority<T>(slots: &[Notification<T>]) -> usize {
    let mut best = 0;
    for (index, notification) in slots.iter().enumerate().skip(1) {
        // Strictly greater, so equal urgencies retain push order
        if notification.urgency() > slots[best].urgency() {
            best = index;
        }
    }
    best
}
