// Integration tests for the linked-storage queue

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use jobq::{BoundedQueue, DequeueError, EnqueueError, LinkedQueue};

use test_helpers::{within_bound, LIVENESS_BOUND};

#[test]
fn test_capacity_law() {
    for capacity in [1, 2, 7, 64] {
        let queue = LinkedQueue::new(capacity);
        for n in 0..capacity {
            assert!(queue.enqueue(n).is_ok(), "enqueue {} of {}", n, capacity);
        }
        assert_eq!(queue.enqueue(capacity), Err(EnqueueError::Full(capacity)));
        assert_eq!(queue.len(), capacity);
        assert_eq!(queue.capacity(), capacity);
        assert!(queue.is_full());
    }
}

#[test]
fn test_fifo_single_producer_single_consumer() {
    let queue = Arc::new(LinkedQueue::new(16));
    let producer_queue = queue.clone();

    let producer = thread::spawn(move || {
        for n in 0..1000u32 {
            let mut job = n;
            loop {
                match producer_queue.enqueue(job) {
                    Ok(()) => break,
                    Err(EnqueueError::Full(back)) => {
                        job = back;
                        thread::yield_now();
                    }
                    Err(err) => panic!("unexpected refusal: {}", err),
                }
            }
        }
        producer_queue.deactivate();
    });

    let mut received = Vec::with_capacity(1000);
    while let Some(n) = queue.dequeue() {
        received.push(n);
    }
    producer.join().unwrap();

    assert_eq!(received, (0..1000).collect::<Vec<_>>());
}

#[test]
fn test_push_and_pop_concurrently_sums_to_5050() {
    let queue = Arc::new(LinkedQueue::new(100));
    let producer_queue = queue.clone();

    let producer = thread::spawn(move || {
        let mut failures = 0;
        for n in 1..=100u64 {
            if producer_queue.enqueue(n).is_err() {
                failures += 1;
            }
        }
        failures
    });

    let mut sum = 0;
    for _ in 0..100 {
        sum += queue.dequeue().unwrap();
    }

    assert_eq!(producer.join().unwrap(), 0);
    assert_eq!(queue.len(), 0);
    assert_eq!(sum, 5050);
}

#[test]
fn test_conservation_with_many_consumers() {
    const JOBS: u64 = 10_000;
    let queue = Arc::new(LinkedQueue::new(64));
    let total = Arc::new(AtomicUsize::new(0));

    let consumers: Vec<_> = (0..4)
        .map(|_| {
            let queue = queue.clone();
            let total = total.clone();
            thread::spawn(move || {
                while let Some(n) = queue.dequeue() {
                    total.fetch_add(n as usize, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for n in 0..JOBS {
        let mut job = n;
        while let Err(EnqueueError::Full(back)) = queue.enqueue(job) {
            job = back;
            thread::yield_now();
        }
    }
    queue.deactivate();

    for consumer in consumers {
        consumer.join().unwrap();
    }
    let expected = (JOBS * (JOBS - 1) / 2) as usize;
    assert_eq!(total.load(Ordering::SeqCst), expected);
    assert!(queue.is_empty());
}

#[test]
fn test_contended_producers_fill_exactly_to_capacity() {
    const CAPACITY: usize = 50;
    const PRODUCERS: usize = 8;
    let queue = Arc::new(LinkedQueue::new(CAPACITY));
    let start = Arc::new(Barrier::new(PRODUCERS));
    let accepted = Arc::new(AtomicUsize::new(0));

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let queue = queue.clone();
            let start = start.clone();
            let accepted = accepted.clone();
            thread::spawn(move || {
                start.wait();
                for n in 0..CAPACITY {
                    if queue.enqueue(p * CAPACITY + n).is_ok() {
                        accepted.fetch_add(1, Ordering::SeqCst);
                    }
                }
            })
        })
        .collect();

    for producer in producers {
        producer.join().unwrap();
    }
    assert_eq!(accepted.load(Ordering::SeqCst), CAPACITY);
    assert_eq!(queue.len(), CAPACITY);

    let mut items = queue.drain();
    items.sort_unstable();
    items.dedup();
    assert_eq!(items.len(), CAPACITY);
}

#[test]
fn test_blocked_dequeue_returns_after_deactivate() {
    let queue = Arc::new(LinkedQueue::<u8>::new(4));
    let waiter = queue.clone();

    let (tx, rx) = std::sync::mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(waiter.dequeue());
    });

    thread::sleep(Duration::from_millis(20));
    assert!(queue.deactivate());
    assert_eq!(rx.recv_timeout(LIVENESS_BOUND), Ok(None));
}

#[test]
fn test_deactivate_is_idempotent() {
    let queue = LinkedQueue::new(2);
    queue.enqueue('a').unwrap();

    assert!(queue.deactivate());
    assert!(!queue.deactivate());
    assert!(!queue.is_active());

    assert_eq!(queue.enqueue('b'), Err(EnqueueError::Inactive('b')));
    assert_eq!(queue.dequeue(), Some('a'));
    assert_eq!(queue.dequeue(), None);
    assert_eq!(queue.try_dequeue(), Err(DequeueError::Inactive));
}

#[test]
fn test_try_dequeue_on_empty_queue() {
    let queue = LinkedQueue::<String>::new(3);
    assert_eq!(queue.try_dequeue(), Err(DequeueError::Empty));

    queue.enqueue("job".to_string()).unwrap();
    assert_eq!(queue.try_dequeue().as_deref(), Ok("job"));
    assert!(queue.is_empty());
}

#[test]
fn test_zero_capacity_rejects_everything() {
    let queue = LinkedQueue::new(0);
    assert_eq!(queue.enqueue(1), Err(EnqueueError::Full(1)));
    assert_eq!(queue.len(), 0);
    assert!(queue.is_full());
}

#[test]
fn test_many_waiters_all_released() {
    let queue = Arc::new(LinkedQueue::<u32>::new(8));
    let waiters: Vec<_> = (0..6)
        .map(|_| {
            let queue = queue.clone();
            thread::spawn(move || queue.dequeue())
        })
        .collect();

    thread::sleep(Duration::from_millis(20));
    queue.deactivate();

    let results = within_bound(move || {
        waiters
            .into_iter()
            .map(|waiter| waiter.join().unwrap())
            .collect::<Vec<_>>()
    });
    assert_eq!(results, Some(vec![None; 6]));
}
