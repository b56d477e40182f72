use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use jobq_api::{EnqueueError, JobHandler, SharedQueue};
use parking_lot::Mutex;
use tracing::error;
use uuid::Uuid;

use super::metrics::{PoolCounters, PoolMetrics};
use super::worker::Worker;
use crate::config::{PoolConfig, ShutdownPolicy};
use crate::error::PoolError;
use crate::logging;
use crate::queue::shared_queue;

/// Lifecycle of a pool
///
/// `Created → Running → Terminating → Terminated`; `Terminated` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolStatus {
    /// Worker threads are being spawned
    Created = 0,

    /// Workers are draining the queue
    Running = 1,

    /// `terminate` has been called; workers are finishing up
    Terminating = 2,

    /// Every worker has been joined
    Terminated = 3,
}

impl PoolStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => PoolStatus::Created,
            1 => PoolStatus::Running,
            2 => PoolStatus::Terminating,
            _ => PoolStatus::Terminated,
        }
    }
}

/// Fixed-size pool of worker threads draining one bounded queue
///
/// The pool owns its queue and its worker threads. Producers call
/// [`submit`](Self::submit), which never blocks; every worker blocks on the
/// queue and applies the shared handler to each job it receives.
///
/// # Thread Safety
/// - `submit`, `terminate` and the queries take `&self`; wrap the pool in an
///   `Arc` to share it between producer threads
/// - the handler is invoked concurrently from every worker without any
///   serialization by the pool
///
/// # Handler Failures
/// Each job runs in isolation: an `Err` from the handler is logged at WARN and
/// counted as failed, a panic is caught, logged at ERROR and counted as
/// panicked. In both cases the worker carries on with the next job.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicU64, Ordering};
/// use std::sync::Arc;
/// use jobq::WorkerPool;
///
/// let total = Arc::new(AtomicU64::new(0));
/// let sink = total.clone();
/// let pool = WorkerPool::new(100, move |n: u64| {
///     sink.fetch_add(n, Ordering::SeqCst);
/// })
/// .unwrap();
///
/// for n in 1..=100 {
///     pool.submit(n).unwrap();
/// }
/// pool.terminate().unwrap();
/// assert_eq!(total.load(Ordering::SeqCst), 5050);
/// ```
pub struct WorkerPool<T> {
    id: Uuid,
    config: PoolConfig,
    queue: SharedQueue<T>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    status: AtomicU8,
    counters: Arc<PoolCounters>,
}

impl<T> fmt::Debug for WorkerPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("id", &self.id)
            .field("worker_count", &self.config.worker_count)
            .field("queue", &self.queue)
            .field("status", &self.status())
            .finish()
    }
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Pool of [`DEFAULT_WORKER_COUNT`](crate::config::DEFAULT_WORKER_COUNT)
    /// workers over a linked queue of the given capacity.
    pub fn new<H>(capacity: usize, handler: H) -> Result<Self, PoolError>
    where
        H: JobHandler<T> + 'static,
    {
        Self::with_config(PoolConfig::new(capacity), handler)
    }

    /// Build a pool from an explicit configuration and start its workers.
    ///
    /// If a worker thread cannot be spawned, the workers already started are
    /// shut down and joined before the error is returned.
    pub fn with_config<H>(config: PoolConfig, handler: H) -> Result<Self, PoolError>
    where
        H: JobHandler<T> + 'static,
    {
        config.validate()?;

        let id = Uuid::new_v4();
        let queue = shared_queue::<T>(config.queue_kind, config.capacity);
        let handler: Arc<dyn JobHandler<T>> = Arc::new(handler);
        let counters = Arc::new(PoolCounters::default());
        let dispatch = logging::current_subscriber();

        let pool = Self {
            id,
            workers: Mutex::new(Vec::with_capacity(config.worker_count)),
            queue,
            status: AtomicU8::new(PoolStatus::Created as u8),
            counters,
            config,
        };

        let span = crate::pool_span!(id);
        let _guard = span.enter();

        for index in 0..pool.config.worker_count {
            let worker = Worker::new(
                index,
                id,
                pool.queue.clone(),
                handler.clone(),
                pool.counters.clone(),
                dispatch.clone(),
            );
            let name = format!("{}-{}", pool.config.thread_name_prefix, index);

            match worker.spawn(name) {
                Ok(handle) => pool.workers.lock().push(handle),
                Err(source) => {
                    error!(worker = index, error = %source, "failed to spawn worker thread");
                    pool.queue.deactivate();
                    pool.join_workers(false);
                    pool.set_status(PoolStatus::Terminated);
                    return Err(PoolError::Spawn { worker: index, source });
                }
            }
        }

        pool.set_status(PoolStatus::Running);
        crate::log_lifecycle!(
            id,
            "started",
            workers = pool.config.worker_count,
            capacity = pool.config.capacity,
            queue_kind = ?pool.config.queue_kind
        );

        Ok(pool)
    }
}

impl<T> WorkerPool<T> {
    /// Queue a job without blocking.
    ///
    /// Fails with `Full` when the queue is at capacity and with `Inactive` once
    /// the pool is terminating; the job is handed back either way.
    pub fn submit(&self, job: T) -> Result<(), EnqueueError<T>> {
        match self.queue.enqueue(job) {
            Ok(()) => {
                PoolCounters::bump(&self.counters.submitted);
                Ok(())
            }
            Err(err) => {
                PoolCounters::bump(&self.counters.rejected);
                Err(err)
            }
        }
    }

    /// Stop the pool and join every worker.
    ///
    /// The first call deactivates the queue (waking every parked worker),
    /// applies the configured [`ShutdownPolicy`], joins the workers and returns
    /// `Ok(())`. Every later call returns [`PoolError::AlreadyTerminated`] and
    /// does nothing.
    ///
    /// Blocks until the workers exit. Called from one of the pool's own worker
    /// threads (that is, from inside the handler) it returns
    /// [`PoolError::TerminateFromWorker`] and leaves the pool running.
    pub fn terminate(&self) -> Result<(), PoolError> {
        if self.on_worker_thread() {
            return Err(PoolError::TerminateFromWorker);
        }
        self.shutdown(false)
    }

    /// `detach_current` leaves the calling worker's handle unjoined; that
    /// thread exits on its own once its handler returns.
    fn shutdown(&self, detach_current: bool) -> Result<(), PoolError> {
        if self
            .status
            .compare_exchange(
                PoolStatus::Running as u8,
                PoolStatus::Terminating as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_err()
        {
            return Err(PoolError::AlreadyTerminated);
        }

        let span = crate::pool_span!(self.id);
        let _guard = span.enter();
        crate::log_lifecycle!(
            self.id,
            "terminating",
            policy = ?self.config.shutdown_policy,
            queued = self.queue.len()
        );

        self.queue.deactivate();
        if self.config.shutdown_policy == ShutdownPolicy::Discard {
            let discarded = self.queue.drain().len();
            PoolCounters::add(&self.counters.discarded, discarded as u64);
        }

        let panicked_workers = self.join_workers(detach_current);
        self.set_status(PoolStatus::Terminated);

        let metrics = self.metrics();
        crate::log_lifecycle!(
            self.id,
            "terminated",
            completed = metrics.completed,
            failed = metrics.failed,
            panicked = metrics.panicked,
            discarded = metrics.discarded
        );

        if panicked_workers > 0 {
            return Err(PoolError::WorkerPanicked(panicked_workers));
        }
        Ok(())
    }

    /// Join every worker handle, returning how many threads died abnormally.
    fn join_workers(&self, detach_current: bool) -> usize {
        let handles = std::mem::take(&mut *self.workers.lock());
        let current = thread::current().id();
        let mut panicked = 0;
        for handle in handles {
            if detach_current && handle.thread().id() == current {
                continue;
            }
            let name = handle.thread().name().map(str::to_owned);
            if handle.join().is_err() {
                error!(thread = ?name, "worker thread panicked");
                panicked += 1;
            }
        }
        panicked
    }

    fn on_worker_thread(&self) -> bool {
        let current = thread::current().id();
        self.workers
            .lock()
            .iter()
            .any(|handle| handle.thread().id() == current)
    }

    fn set_status(&self, status: PoolStatus) {
        self.status.store(status as u8, Ordering::SeqCst);
    }

    pub fn status(&self) -> PoolStatus {
        PoolStatus::from_u8(self.status.load(Ordering::SeqCst))
    }

    /// `true` while the pool accepts and processes jobs.
    pub fn is_active(&self) -> bool {
        self.status() == PoolStatus::Running
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn worker_count(&self) -> usize {
        self.config.worker_count
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Jobs waiting in the queue (snapshot).
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn metrics(&self) -> PoolMetrics {
        PoolMetrics::capture(
            self.id,
            self.config.worker_count,
            self.queue.len(),
            self.queue.capacity(),
            self.status(),
            &self.counters,
        )
    }
}

impl<T> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        if !self.is_active() {
            return;
        }
        // The last owner may be a handler running on one of our own workers.
        let detach_current = self.on_worker_thread();
        if let Err(err) = self.shutdown(detach_current) {
            error!(pool = %self.id, error = %err, "termination on drop failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::config::QueueKind;

    #[test]
    fn test_status_transitions() {
        let pool = WorkerPool::new(4, |_: u8| {}).unwrap();
        assert_eq!(pool.status(), PoolStatus::Running);
        assert!(pool.is_active());

        pool.terminate().unwrap();
        assert_eq!(pool.status(), PoolStatus::Terminated);
        assert!(!pool.is_active());
    }

    #[test]
    fn test_status_round_trips_through_u8() {
        for status in [
            PoolStatus::Created,
            PoolStatus::Running,
            PoolStatus::Terminating,
            PoolStatus::Terminated,
        ] {
            assert_eq!(PoolStatus::from_u8(status as u8), status);
        }
    }

    #[test]
    fn test_invalid_config_spawns_nothing() {
        let config = PoolConfig::new(0);
        let err = WorkerPool::with_config(config, |_: u8| {}).unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfig(_)));
    }

    #[test]
    fn test_drop_joins_workers() {
        let seen = Arc::new(AtomicUsize::new(0));
        {
            let sink = seen.clone();
            let config = PoolConfig::new(16).with_workers(2).with_queue_kind(QueueKind::Ring);
            let pool = WorkerPool::with_config(config, move |_: u32| {
                sink.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
            for job in 0..16 {
                pool.submit(job).unwrap();
            }
        }
        assert_eq!(seen.load(Ordering::SeqCst), 16);
    }

    #[test]
    fn test_workers_are_named_after_prefix() {
        let pool = WorkerPool::with_config(
            PoolConfig::new(2).with_workers(2).with_thread_name_prefix("primes"),
            |_: ()| {},
        )
        .unwrap();
        let names: Vec<_> = pool
            .workers
            .lock()
            .iter()
            .map(|handle| handle.thread().name().map(str::to_owned))
            .collect();
        assert_eq!(names, vec![Some("primes-0".to_string()), Some("primes-1".to_string())]);
    }
}
