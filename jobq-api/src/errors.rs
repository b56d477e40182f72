//! # Queue Error Types
//!
//! Every container-level failure is reported through a return value and is
//! recoverable by the caller: a rejected enqueue hands the item back so the
//! producer can retry or drop it, and a failed dequeue says whether the queue
//! was merely empty or has been shut down.
//!
//! ## Usage Example
//!
//! ```rust
//! use jobq_api::errors::EnqueueError;
//!
//! let err = EnqueueError::Full(42);
//! assert!(err.is_full());
//! assert_eq!(err.into_inner(), 42);
//! ```

use std::fmt;

use thiserror::Error;

/// Reason an item was refused by [`BoundedQueue::enqueue`].
///
/// The rejected item travels back inside the error.
///
/// [`BoundedQueue::enqueue`]: crate::queue::BoundedQueue::enqueue
#[derive(Error, PartialEq, Eq, Clone, Copy)]
pub enum EnqueueError<T> {
    /// The queue already holds `capacity` items.
    #[error("Queue is full")]
    Full(T),

    /// The queue has been deactivated and accepts nothing further.
    #[error("Queue is inactive")]
    Inactive(T),
}

impl<T> EnqueueError<T> {
    /// Recover the item that could not be enqueued.
    pub fn into_inner(self) -> T {
        match self {
            EnqueueError::Full(item) | EnqueueError::Inactive(item) => item,
        }
    }

    /// `true` if the item was refused for lack of capacity.
    pub fn is_full(&self) -> bool {
        matches!(self, EnqueueError::Full(_))
    }

    /// `true` if the item was refused because the queue was deactivated.
    pub fn is_inactive(&self) -> bool {
        matches!(self, EnqueueError::Inactive(_))
    }
}

// Payloads are frequently not `Debug`; keep them out of the output.
impl<T> fmt::Debug for EnqueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnqueueError::Full(_) => f.write_str("Full(..)"),
            EnqueueError::Inactive(_) => f.write_str("Inactive(..)"),
        }
    }
}

/// Reason a non-blocking or timed dequeue produced no item.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum DequeueError {
    /// The queue is active but currently holds nothing.
    #[error("Queue is empty")]
    Empty,

    /// No item arrived before the deadline.
    #[error("Timed out waiting for an item")]
    Timeout,

    /// The queue has been deactivated and fully drained.
    #[error("Queue is inactive and drained")]
    Inactive,
}
