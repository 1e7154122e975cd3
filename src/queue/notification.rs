//! Notification value type
//!
//! A notification is an immutable value carrying an urgency level, an
//! absolute expiry timestamp and an opaque payload. Validity is never
//! cached: it is evaluated against "now" at the instant it is checked.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::time::SystemTime;

/// Ordinal urgency level of a notification
///
/// The declaration order defines the total order used for priority
/// selection: `Low < Medium < High`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Immutable notification value
///
/// Ordering between notifications considers urgency only; the
/// insertion-order tie-break for equal urgencies is the queue's
/// responsibility since notifications carry no insertion index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification<T> {
    urgency: Urgency,
    valid_until: SystemTime,
    payload: T,
}

impl<T> Notification<T> {
    pub fn new(urgency: Urgency, valid_until: SystemTime, payload: T) -> Self {
        Self {
            urgency,
            valid_until,
            payload,
        }
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    pub fn valid_until(&self) -> SystemTime {
        self.valid_until
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Consume the notification, yielding its payload
    pub fn into_payload(self) -> T {
        self.payload
    }

    /// Whether the notification is still valid at the given instant
    pub fn is_valid_at(&self, now: SystemTime) -> bool {
        self.valid_until >= now
    }

    /// Whether the notification is still valid right now
    ///
    /// Evaluated against the wall clock on every call, never cached.
    pub fn is_valid_now(&self) -> bool {
        self.is_valid_at(SystemTime::now())
    }
}

impl<T: fmt::Display> fmt::Display for Notification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let valid_until: DateTime<Local> = self.valid_until.into();
        write!(
            f,
            "Notification {{ urgency: {}, valid_until: {}, payload: {}, valid_now: {} }}",
            self.urgency,
            valid_until.to_rfc3339(),
            self.payload,
            self.is_valid_now()
        )
    }
}
