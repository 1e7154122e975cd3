//! Queue Error Types

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Queue is still at capacity after eviction (capacity: {capacity})")]
    AtCapacity { capacity: usize },

    #[error("{message}")]
    LockPoisoned { message: String },
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
