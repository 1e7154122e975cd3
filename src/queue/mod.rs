//! Expiring Priority Notification Queue
//!
//! A bounded, priority-ordered, self-expiring queue shared by multiple
//! concurrent writers and readers. Key properties:
//!
//! - **Priority order**: `pop` returns the highest-urgency notification;
//!   equal urgencies come back in push order (stable selection).
//! - **Lazy expiry**: a notification's validity is evaluated against the
//!   clock on every check, never cached. Expired entries are reclaimed
//!   during a full-queue push (eviction) and drained during `pop`.
//! - **Capacity**: a push into a queue that is still full after eviction is
//!   rejected with [`QueueError::AtCapacity`]; existing entries are never
//!   overwritten or silently dropped.
//! - **Coarse locking**: one mutex serialises every operation, making the
//!   history of pushes, pops, evictions and analysis snapshots
//!   linearizable.
//! - **Wake channel**: a push that fills the queue to capacity raises a
//!   signal the analyzer scheduler can await with a bounded timeout.
//!
//! # Example
//!
//! ```rust
//! use notiq::queue::{ExpiringQueue, Notification, Urgency};
//! use std::time::{Duration, SystemTime};
//!
//! # fn example() -> Result<(), notiq::queue::QueueError> {
//! let queue = ExpiringQueue::new(16);
//!
//! queue.push(Notification::new(
//!     Urgency::High,
//!     SystemTime::now() + Duration::from_secs(60),
//!     "disk almost full".to_string(),
//! ))?;
//!
//! if let Some(notification) = queue.pop()? {
//!     println!("delivering: {}", notification);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod internal;
mod notification;

pub use error::{QueueError, QueueResult};
pub use internal::{ExpiringQueue, MemoryStats, WakeReason};
pub use notification::{Notification, Urgency};

#[cfg(test)]
mod tests;
