//! # Prime Counting Example
//!
//! Feeds the numbers 1..=10000 through a worker pool whose handler tests each
//! one for primality, then terminates the pool and prints what it saw.
//!
//! - Building a pool from a `PoolConfig`
//! - Handling `EnqueueError::Full` by retrying the returned job
//! - Reading `PoolMetrics` after termination
//!
//! Run with `RUST_LOG=jobq=debug` to watch workers start and exit.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use jobq::logging::{self, info};
use jobq::{EnqueueError, PoolConfig, QueueKind, WorkerPool};

const LIMIT: u64 = 10_000;

fn is_prime(n: u64) -> bool {
    n >= 2 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
}

fn main() -> anyhow::Result<()> {
    logging::init_default();

    let primes = Arc::new(AtomicUsize::new(0));
    let sink = primes.clone();

    // A deliberately small ring so producers hit backpressure.
    let config = PoolConfig::per_cpu(256)
        .with_queue_kind(QueueKind::Ring)
        .with_thread_name_prefix("prime");
    let pool = WorkerPool::with_config(config, move |n: u64| {
        if is_prime(n) {
            sink.fetch_add(1, Ordering::Relaxed);
        }
    })?;
    info!(pool = %pool.id(), workers = pool.worker_count(), "counting primes up to {}", LIMIT);

    let mut retries = 0u64;
    for n in 1..=LIMIT {
        let mut job = n;
        loop {
            match pool.submit(job) {
                Ok(()) => break,
                Err(EnqueueError::Full(back)) => {
                    retries += 1;
                    job = back;
                    thread::yield_now();
                }
                Err(err) => return Err(anyhow::anyhow!("job {} refused: {}", n, err)),
            }
        }
    }

    pool.terminate()?;
    let metrics = pool.metrics();

    println!("primes <= {}: {}", LIMIT, primes.load(Ordering::Relaxed));
    println!(
        "jobs: submitted={} completed={} failed={} panicked={} full-queue retries={}",
        metrics.submitted, metrics.completed, metrics.failed, metrics.panicked, retries
    );
    Ok(())
}
