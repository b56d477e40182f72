//! Fixed-size worker pool draining a bounded queue.

pub mod metrics;
mod worker;
mod worker_pool;

pub use metrics::PoolMetrics;
pub use worker_pool::{PoolStatus, WorkerPool};
