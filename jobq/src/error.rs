use std::io;

use thiserror::Error;

/// Errors related to worker pool construction and shutdown.
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Invalid pool configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to spawn worker thread {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: io::Error,
    },
    #[error("Worker pool is already terminated")]
    AlreadyTerminated,
    #[error("Worker pool cannot be terminated from one of its own worker threads")]
    TerminateFromWorker,
    #[error("{0} worker thread(s) panicked outside job handling")]
    WorkerPanicked(usize),
}
