//! Time provider abstraction for testable time-dependent logic
//!
//! Notification validity is always evaluated lazily against "now"; routing
//! "now" through a trait lets expiry behaviour be tested deterministically.

#[cfg(test)]
use std::sync::{Arc, Mutex};
#[cfg(test)]
use std::time::Duration;
use std::time::{Instant, SystemTime};

/// Abstraction over system time for testable time-dependent logic
pub trait TimeProvider: Send + Sync {
    /// Get the current monotonic time (for measuring intervals)
    fn now(&self) -> Instant;

    /// Get the current system time (for timestamps and expiry checks)
    fn system_time(&self) -> SystemTime;
}

/// Production time provider using actual system time
#[derive(Default, Clone)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Mock time provider for deterministic testing
#[derive(Clone)]
#[cfg(test)]
pub struct MockTimeProvider {
    current_instant: Arc<Mutex<Instant>>,
    current_system_time: Arc<Mutex<SystemTime>>,
}

#[cfg(test)]
impl MockTimeProvider {
    /// Create a new mock time provider starting at the current time
    pub fn new() -> Self {
        Self {
            current_instant: Arc::new(Mutex::new(Instant::now())),
            current_system_time: Arc::new(Mutex::new(SystemTime::now())),
        }
    }

    /// Advance both monotonic and system time by the given duration
    pub fn advance_time(&self, duration: Duration) {
        {
            let mut instant = self.current_instant.lock().unwrap();
            *instant += duration;
        }
        {
            let mut system_time = self.current_system_time.lock().unwrap();
            *system_time += duration;
        }
    }

    /// Set the current system time (for expiry checks)
    pub fn set_system_time(&self, system_time: SystemTime) {
        let mut current = self.current_system_time.lock().unwrap();
        *current = system_time;
    }
}

#[cfg(test)]
impl Default for MockTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl TimeProvider for MockTimeProvider {
    fn now(&self) -> Instant {
        *self.current_instant.lock().unwrap()
    }

    fn system_time(&self) -> SystemTime {
        *self.current_system_time.lock().unwrap()
    }
}
