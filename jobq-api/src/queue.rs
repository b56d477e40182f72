//! # Bounded Queue Capability
//!
//! A bounded queue is a thread-safe FIFO with a fixed capacity. Producers never
//! block: a full or deactivated queue refuses the item immediately. Consumers
//! block in [`BoundedQueue::dequeue`] until an item arrives or the queue is
//! deactivated, which is the only suspension point of the contract.
//!
//! ## Shutdown Protocol
//!
//! [`BoundedQueue::deactivate`] is a one-way transition. It refuses every later
//! enqueue and wakes *all* blocked consumers. Items that were already queued are
//! still handed out; once the queue is both inactive and empty, `dequeue`
//! returns `None` and consumers are expected to exit.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{DequeueError, EnqueueError};

/// Shared handle to a queue trait object.
pub type SharedQueue<T> = Arc<dyn BoundedQueue<T>>;

/// Thread-safe bounded FIFO.
///
/// Implementors must guarantee:
/// - `0 <= len() <= capacity()` at every instant observable through the trait
/// - the capacity check and the insertion in `enqueue` form one critical section
/// - FIFO order between enqueue and dequeue
/// - `deactivate` wakes every waiter, not just one
pub trait BoundedQueue<T>: Send + Sync + fmt::Debug {
    /// Insert `item` at the tail without blocking.
    ///
    /// Wakes at most one blocked consumer on success.
    fn enqueue(&self, item: T) -> Result<(), EnqueueError<T>>;

    /// Remove the head item, blocking while the queue is active and empty.
    ///
    /// Returns `None` only when the queue is deactivated and drained.
    fn dequeue(&self) -> Option<T>;

    /// Remove the head item if one is present.
    fn try_dequeue(&self) -> Result<T, DequeueError>;

    /// Like [`dequeue`](Self::dequeue) but gives up after `timeout`.
    fn dequeue_timeout(&self, timeout: Duration) -> Result<T, DequeueError>;

    /// Remove and return every queued item in FIFO order.
    fn drain(&self) -> Vec<T>;

    /// Stop accepting items and wake all blocked consumers.
    ///
    /// Returns `true` for the call that performed the transition and `false`
    /// for every later call.
    fn deactivate(&self) -> bool;

    /// `false` once [`deactivate`](Self::deactivate) has been called.
    fn is_active(&self) -> bool;

    /// Number of queued items.
    fn len(&self) -> usize;

    /// Maximum number of items the queue will hold.
    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }
}
