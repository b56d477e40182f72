//! # Bounded Queues
//!
//! Two interchangeable implementations of [`BoundedQueue`](jobq_api::BoundedQueue):
//!
//! - [`LinkedQueue`]: growable storage that allocates as items arrive
//! - [`RingQueue`]: a preallocated ring of `capacity + 1` slots
//!
//! Both share the same synchronization shell, [`GuardedQueue`], and differ only
//! in their [`Storage`]. Pick the ring for cache-friendly, allocation-free steady
//! state; pick the linked variant when the nominal capacity is large and rarely
//! reached.

mod guarded;
mod linked;
mod ring;
mod storage;

use std::sync::Arc;

use jobq_api::SharedQueue;

pub use guarded::GuardedQueue;
pub use linked::LinkedStorage;
pub use ring::{RingStorage, MAX_RING_CAPACITY};
pub use storage::Storage;

use crate::config::QueueKind;

/// Bounded queue over growable storage.
pub type LinkedQueue<T> = GuardedQueue<LinkedStorage<T>>;

/// Bounded queue over a preallocated ring buffer.
pub type RingQueue<T> = GuardedQueue<RingStorage<T>>;

/// Build a shared queue of the requested kind.
pub fn shared_queue<T>(kind: QueueKind, capacity: usize) -> SharedQueue<T>
where
    T: Send + 'static,
{
    match kind {
        QueueKind::Linked => Arc::new(LinkedQueue::<T>::new(capacity)),
        QueueKind::Ring => Arc::new(RingQueue::<T>::new(capacity)),
    }
}
