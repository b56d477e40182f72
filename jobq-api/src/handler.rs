//! # Job Handlers
//!
//! A worker pool applies one shared handler to every job it dequeues. The pool
//! never inspects what the handler returns beyond turning it into a
//! success/failure signal for logging and metrics, so plain closures work:
//!
//! ```rust
//! use jobq_api::JobHandler;
//!
//! let double = |n: u64| n * 2 == 4;
//! assert!(double.handle(2).is_ok());
//!
//! let parse = |s: String| s.parse::<u32>();
//! assert!(parse.handle("nope".to_string()).is_err());
//! ```
//!
//! Handlers run concurrently on every worker thread, hence the `Send + Sync`
//! bound; any state they touch must carry its own synchronization.

/// Capability invoked once per job by a worker pool.
pub trait JobHandler<T>: Send + Sync {
    /// Process one job.
    fn handle(&self, job: T) -> anyhow::Result<()>;
}

impl<T, F, R> JobHandler<T> for F
where
    F: Fn(T) -> R + Send + Sync,
    R: JobOutcome,
{
    fn handle(&self, job: T) -> anyhow::Result<()> {
        (self)(job).into_result()
    }
}

/// Conversion from a handler's return value into a success/failure signal.
pub trait JobOutcome {
    fn into_result(self) -> anyhow::Result<()>;
}

impl JobOutcome for () {
    fn into_result(self) -> anyhow::Result<()> {
        Ok(())
    }
}

// A bare `bool` belongs to the caller; `false` is not a failure.
impl JobOutcome for bool {
    fn into_result(self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<U, E> JobOutcome for Result<U, E>
where
    E: Into<anyhow::Error>,
{
    fn into_result(self) -> anyhow::Result<()> {
        self.map(|_| ()).map_err(Into::into)
    }
}
