use std::any::Any;
use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use jobq_api::{JobHandler, SharedQueue};
use tracing::{debug, error};
use uuid::Uuid;

use super::metrics::PoolCounters;

/// # Worker Thread
///
/// One of the fixed set of threads owned by a `WorkerPool`.
///
/// ## Core Algorithm
/// 1. Block in `dequeue` until a job arrives or the queue is deactivated
/// 2. Run the shared handler on the job, isolating errors and panics
/// 3. Repeat until `dequeue` reports the queue inactive and drained
///
/// The worker never polls: while the queue is empty it is parked on the
/// queue's condition variable, and deactivation is what wakes it to exit.
pub(crate) struct Worker<T> {
    index: usize,
    pool_id: Uuid,
    queue: SharedQueue<T>,
    handler: Arc<dyn JobHandler<T>>,
    counters: Arc<PoolCounters>,
    dispatch: tracing::Dispatch,
}

impl<T> fmt::Debug for Worker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("index", &self.index)
            .field("pool_id", &self.pool_id)
            .finish()
    }
}

impl<T: Send + 'static> Worker<T> {
    pub(crate) fn new(
        index: usize,
        pool_id: Uuid,
        queue: SharedQueue<T>,
        handler: Arc<dyn JobHandler<T>>,
        counters: Arc<PoolCounters>,
        dispatch: tracing::Dispatch,
    ) -> Self {
        Self {
            index,
            pool_id,
            queue,
            handler,
            counters,
            dispatch,
        }
    }

    /// Start the worker loop on a named OS thread.
    pub(crate) fn spawn(self, name: String) -> io::Result<JoinHandle<()>> {
        thread::Builder::new().name(name).spawn(move || {
            let dispatch = self.dispatch.clone();
            tracing::dispatcher::with_default(&dispatch, || self.run_loop());
        })
    }

    fn run_loop(&self) {
        let span = crate::worker_span!(self.pool_id, self.index);
        let _guard = span.enter();
        debug!("worker started");

        let mut handled: u64 = 0;
        while let Some(job) = self.queue.dequeue() {
            self.process(job);
            handled += 1;
        }

        debug!(handled, "worker exiting");
    }

    fn process(&self, job: T) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.handler.handle(job)));

        match outcome {
            Ok(Ok(())) => PoolCounters::bump(&self.counters.completed),
            Ok(Err(err)) => {
                crate::log_job_failure!(self.index, err);
                PoolCounters::bump(&self.counters.failed);
            }
            Err(payload) => {
                error!(
                    worker = self.index,
                    panic = %panic_message(payload.as_ref()),
                    "job handler panicked"
                );
                PoolCounters::bump(&self.counters.panicked);
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}
