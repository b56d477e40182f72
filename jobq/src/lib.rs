// jobq: bounded job queues and a fixed-size worker pool
//
// This crate provides the two queue implementations of the `jobq-api`
// `BoundedQueue` trait (linked and ring-buffer storage) and a `WorkerPool`
// whose threads drain one of them through a shared `JobHandler`.

pub mod config;
pub mod error;
pub mod logging;
pub mod pool;
pub mod queue;

// Re-export commonly used types
pub use config::{PoolConfig, QueueKind, ShutdownPolicy};
pub use error::PoolError;
pub use jobq_api::{BoundedQueue, DequeueError, EnqueueError, JobHandler, JobOutcome, SharedQueue};
pub use pool::{PoolMetrics, PoolStatus, WorkerPool};
pub use queue::{LinkedQueue, RingQueue};
