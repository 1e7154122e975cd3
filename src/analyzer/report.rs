//! Analysis report model
//!
//! One report is produced per analysis pass from a snapshot-consistent
//! read of the queue: occupancy, per-urgency distribution, memory
//! footprint and the spread between the earliest and latest expiry
//! timestamps among the currently-held notifications.

use crate::queue::{MemoryStats, Notification, Urgency, WakeReason};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::time::SystemTime;
use strum::IntoEnumIterator;

/// Count and percentage of notifications at one urgency level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrgencyShare {
    pub level: String,
    pub count: usize,
    pub percent: f64,
}

/// Spread between the earliest and latest expiry timestamps
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValiditySpread {
    /// Earliest `valid_until` among held notifications, RFC3339
    pub earliest: String,
    /// Latest `valid_until` among held notifications, RFC3339
    pub latest: String,
    pub spread_seconds: i64,
}

/// Summary statistics from one read-only analysis pass
#[derive(Debug, Clone, Serialize)]
pub struct QueueReport {
    /// 1-based number of this analysis pass
    pub launch: usize,
    /// Why the scheduler woke for this pass
    pub reason: WakeReason,
    /// When the pass ran, RFC3339
    pub generated_at: String,
    pub occupancy: usize,
    pub capacity: usize,
    /// Every urgency level is listed, including empty ones
    pub urgency_breakdown: Vec<UrgencyShare>,
    pub memory: MemoryStats,
    /// `None` when the queue is empty
    pub validity_spread: Option<ValiditySpread>,
}

impl QueueReport {
    /// Build a report from a snapshot taken under the queue's lock
    pub fn from_snapshot<T>(
        launch: usize,
        reason: WakeReason,
        snapshot: &[Notification<T>],
        capacity: usize,
        memory: MemoryStats,
    ) -> Self {
        let occupancy = snapshot.len();

        let urgency_breakdown = Urgency::iter()
            .map(|level| {
                let count = snapshot.iter().filter(|n| n.urgency() == level).count();
                let percent = if occupancy > 0 {
                    count as f64 / occupancy as f64 * 100.0
                } else {
                    0.0
                };
                UrgencyShare {
                    level: level.to_string(),
                    count,
                    percent,
                }
            })
            .collect();

        let validity_spread = match (
            snapshot.iter().map(Notification::valid_until).min(),
            snapshot.iter().map(Notification::valid_until).max(),
        ) {
            (Some(earliest), Some(latest)) => {
                let earliest: DateTime<Local> = earliest.into();
                let latest: DateTime<Local> = latest.into();
                Some(ValiditySpread {
                    earliest: earliest.to_rfc3339(),
                    latest: latest.to_rfc3339(),
                    spread_seconds: (latest - earliest).num_seconds(),
                })
            }
            _ => None,
        };

        let generated_at: DateTime<Local> = SystemTime::now().into();

        Self {
            launch,
            reason,
            generated_at: generated_at.to_rfc3339(),
            occupancy,
            capacity,
            urgency_breakdown,
            memory,
            validity_spread,
        }
    }

    /// Serialise the report as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for QueueReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Queue analysis #{} (reason: {}) at {} ===",
            self.launch, self.reason, self.generated_at
        )?;
        writeln!(f, "Occupancy: {} of {}", self.occupancy, self.capacity)?;
        writeln!(f, "Urgency distribution:")?;
        for share in &self.urgency_breakdown {
            writeln!(
                f,
                "  {}: {} ({:.1}%)",
                share.level, share.count, share.percent
            )?;
        }
        writeln!(
            f,
            "Memory footprint: {} bytes total ({} slots of {} bytes, {} occupied)",
            self.memory.total_bytes,
            self.memory.capacity,
            self.memory.slot_bytes,
            self.memory.occupied_slots
        )?;
        match &self.validity_spread {
            Some(spread) => writeln!(
                f,
                "Validity spread: {} seconds (earliest {}, latest {})",
                spread.spread_seconds, spread.earliest, spread.latest
            ),
            None => writeln!(f, "Validity spread: n/a (queue is empty)"),
        }
    }
}
