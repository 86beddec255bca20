//! Queue Error Types

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("Queue is full (max size: {max_size})")]
    QueueFull { max_size: usize },

    #[error("Queue is empty")]
    QueueEmpty,

    #[error("Queue name is reserved: {name}")]
    ReservedName { name: String },

    #[error("Queue not found: {name}")]
    QueueMissing { name: String },

    #[error("Queue already exists: {name}")]
    QueueExists { name: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl QueueError {
    /// True for the transient conditions a caller is expected to retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, QueueError::QueueFull { .. } | QueueError::QueueEmpty)
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
