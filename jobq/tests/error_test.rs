// Integration tests for error types in jobq::error

use std::error::Error as _;
use std::io;

use jobq::error::PoolError;
use jobq::{DequeueError, EnqueueError};

#[test]
fn test_pool_error_display() {
    assert_eq!(
        PoolError::InvalidConfig("worker count must be positive".to_string()).to_string(),
        "Invalid pool configuration: worker count must be positive"
    );
    assert_eq!(
        PoolError::AlreadyTerminated.to_string(),
        "Worker pool is already terminated"
    );
    assert_eq!(
        PoolError::TerminateFromWorker.to_string(),
        "Worker pool cannot be terminated from one of its own worker threads"
    );
    assert_eq!(
        PoolError::WorkerPanicked(2).to_string(),
        "2 worker thread(s) panicked outside job handling"
    );
}

#[test]
fn test_spawn_error_keeps_source() {
    let err = PoolError::Spawn {
        worker: 3,
        source: io::Error::new(io::ErrorKind::OutOfMemory, "no threads left"),
    };

    assert_eq!(
        err.to_string(),
        "Failed to spawn worker thread 3: no threads left"
    );
    let source = err.source().map(|s| s.to_string());
    assert_eq!(source.as_deref(), Some("no threads left"));
}

#[test]
fn test_pool_error_into_anyhow() {
    let err: anyhow::Error = PoolError::AlreadyTerminated.into();
    assert!(err.downcast_ref::<PoolError>().is_some());
}

#[test]
fn test_queue_errors_are_reexported() {
    let refused: EnqueueError<Vec<u8>> = EnqueueError::Inactive(vec![1, 2]);
    assert_eq!(refused.to_string(), "Queue is inactive");
    assert_eq!(refused.into_inner(), vec![1, 2]);
    assert_eq!(DequeueError::Timeout.to_string(), "Timed out waiting for an item");
}
