use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use super::PoolStatus;

/// Job counters shared by a pool and its workers.
#[derive(Debug, Default)]
pub(crate) struct PoolCounters {
    pub(crate) submitted: AtomicU64,
    pub(crate) rejected: AtomicU64,
    pub(crate) completed: AtomicU64,
    pub(crate) failed: AtomicU64,
    pub(crate) panicked: AtomicU64,
    pub(crate) discarded: AtomicU64,
}

impl PoolCounters {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    fn read(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }
}

/// Point-in-time view of a pool.
///
/// Counters are read independently, so a snapshot taken while workers are busy
/// may be off by the jobs in flight. After `terminate` returns they are exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolMetrics {
    pub pool_id: Uuid,
    pub worker_count: usize,
    pub queue_len: usize,
    pub capacity: usize,
    pub status: PoolStatus,
    /// Jobs accepted by `submit`.
    pub submitted: u64,
    /// Jobs refused by `submit` (queue full or inactive).
    pub rejected: u64,
    /// Jobs whose handler returned success.
    pub completed: u64,
    /// Jobs whose handler returned an error.
    pub failed: u64,
    /// Jobs whose handler panicked.
    pub panicked: u64,
    /// Jobs dropped unstarted by a `Discard` termination.
    pub discarded: u64,
}

impl PoolMetrics {
    pub(crate) fn capture(
        pool_id: Uuid,
        worker_count: usize,
        queue_len: usize,
        capacity: usize,
        status: PoolStatus,
        counters: &PoolCounters,
    ) -> Self {
        Self {
            pool_id,
            worker_count,
            queue_len,
            capacity,
            status,
            submitted: PoolCounters::read(&counters.submitted),
            rejected: PoolCounters::read(&counters.rejected),
            completed: PoolCounters::read(&counters.completed),
            failed: PoolCounters::read(&counters.failed),
            panicked: PoolCounters::read(&counters.panicked),
            discarded: PoolCounters::read(&counters.discarded),
        }
    }

    /// Jobs a handler has finished with, whatever the outcome.
    pub fn processed(&self) -> u64 {
        self.completed + self.failed + self.panicked
    }
}
