use crate::error::PoolError;
use crate::queue::MAX_RING_CAPACITY;

/// Worker count used when none is configured.
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Queue capacity used by `PoolConfig::default()`.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Thread name prefix for worker threads.
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "jobq-worker";

// --- Configuration Enums ---

/// Backing storage for a pool's queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QueueKind {
    /// Growable storage, allocated as jobs arrive.
    #[default]
    Linked,
    /// Preallocated ring buffer of `capacity + 1` slots.
    Ring,
}

/// What happens to jobs still queued when the pool is terminated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShutdownPolicy {
    /// Workers finish every queued job before exiting.
    #[default]
    Drain,
    /// Queued jobs that no worker has started are dropped.
    Discard,
}

// --- Pool Configuration ---

/// Configuration for a `WorkerPool`.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Maximum number of jobs waiting in the queue.
    pub capacity: usize,

    /// Number of worker threads, fixed for the pool's lifetime.
    pub worker_count: usize,

    /// Storage strategy of the queue.
    pub queue_kind: QueueKind,

    /// Handling of queued jobs at termination.
    pub shutdown_policy: ShutdownPolicy,

    /// Worker threads are named `<prefix>-<index>`.
    pub thread_name_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
            worker_count: DEFAULT_WORKER_COUNT,
            queue_kind: QueueKind::default(),
            shutdown_policy: ShutdownPolicy::default(),
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
        }
    }
}

impl PoolConfig {
    /// Default configuration with the given queue capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// One worker per logical CPU.
    pub fn per_cpu(capacity: usize) -> Self {
        Self::new(capacity).with_workers(num_cpus::get())
    }

    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_queue_kind(mut self, queue_kind: QueueKind) -> Self {
        self.queue_kind = queue_kind;
        self
    }

    pub fn with_shutdown_policy(mut self, shutdown_policy: ShutdownPolicy) -> Self {
        self.shutdown_policy = shutdown_policy;
        self
    }

    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Reject configurations a pool cannot run with.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.capacity == 0 {
            return Err(PoolError::InvalidConfig(
                "queue capacity must be positive".to_string(),
            ));
        }
        if self.worker_count == 0 {
            return Err(PoolError::InvalidConfig(
                "worker count must be positive".to_string(),
            ));
        }
        if self.queue_kind == QueueKind::Ring && self.capacity > MAX_RING_CAPACITY {
            return Err(PoolError::InvalidConfig(format!(
                "ring capacity must not exceed {}",
                MAX_RING_CAPACITY
            )));
        }
        if self.thread_name_prefix.is_empty() {
            return Err(PoolError::InvalidConfig(
                "thread name prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
