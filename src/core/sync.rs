//! Synchronization utilities for robust mutex handling
//!
//! Converts mutex poison errors into application-specific errors so lock
//! acquisition failures surface as recoverable results instead of panics.

use std::sync::LockResult;

/// Handle poisoned mutex cases with consistent error handling
///
/// Maps a poisoned lock result into an application error built by
/// `error_constructor`. A poisoned mutex means another thread panicked
/// while holding the lock.
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use notiq::core::sync::handle_mutex_poison;
/// use notiq::queue::QueueError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(
///     mutex.lock(),
///     |msg| QueueError::LockPoisoned { message: msg }
/// ).unwrap();
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (mutex poisoned). This indicates a panic occurred while holding a lock. PoisonError: {:?}",
            poison_err
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::thread;

    #[derive(Debug, PartialEq)]
    struct TestError {
        message: String,
    }

    #[test]
    fn test_handle_mutex_poison_success() {
        let mutex = Arc::new(Mutex::new(42));
        let result = handle_mutex_poison(mutex.lock(), |msg| TestError { message: msg });

        assert!(result.is_ok());
        assert_eq!(*result.unwrap(), 42);
    }

    #[test]
    fn test_handle_mutex_poison_with_poisoned_mutex() {
        let mutex = Arc::new(Mutex::new(42));
        let mutex_clone = Arc::clone(&mutex);

        // Poison the mutex by panicking while holding the lock
        let _ = thread::spawn(move || {
            let _guard = mutex_clone.lock().unwrap();
            panic!("Intentional panic to poison mutex");
        })
        .join();

        let result = handle_mutex_poison(mutex.lock(), |msg| TestError { message: msg });

        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(error.message.contains("mutex poisoned"));
        assert!(error.message.contains("panic occurred"));
    }
}
