use std::fmt;
use std::time::{Duration, Instant};

use jobq_api::{BoundedQueue, DequeueError, EnqueueError};
use parking_lot::{Condvar, Mutex};
use tracing::trace;

use super::storage::Storage;

/// State behind the queue mutex.
struct State<S> {
    storage: S,
    active: bool,
}

/// Blocking bounded queue over any [`Storage`].
///
/// One mutex guards both the storage and the `active` flag, and one condition
/// variable is shared by every consumer. Producers never wait: the capacity
/// check and the insert happen inside the same lock scope, so concurrent
/// producers racing for the last slot see exactly one success.
///
/// Consumers wait on the predicate `!active || !empty`. Deactivation flips the
/// flag under the lock and broadcasts, so every blocked consumer re-evaluates
/// the predicate; items queued before deactivation are still handed out.
///
/// # Example
///
/// ```rust
/// use jobq::queue::RingQueue;
/// use jobq::BoundedQueue;
///
/// let queue = RingQueue::new(2);
/// queue.enqueue('a').unwrap();
/// queue.enqueue('b').unwrap();
/// assert!(queue.enqueue('c').unwrap_err().is_full());
///
/// queue.deactivate();
/// assert_eq!(queue.dequeue(), Some('a'));
/// assert_eq!(queue.dequeue(), Some('b'));
/// assert_eq!(queue.dequeue(), None);
/// ```
pub struct GuardedQueue<S> {
    state: Mutex<State<S>>,
    available: Condvar,
    capacity: usize,
}

impl<S: Storage> GuardedQueue<S> {
    /// Create an active, empty queue holding at most `capacity` items.
    ///
    /// A zero capacity is accepted and yields a queue that refuses every item.
    /// Panics if the storage cannot represent `capacity` (see
    /// [`MAX_RING_CAPACITY`](super::MAX_RING_CAPACITY)).
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(State {
                storage: S::with_capacity(capacity),
                active: true,
            }),
            available: Condvar::new(),
            capacity,
        }
    }
}

impl<S: Storage> fmt::Debug for GuardedQueue<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("GuardedQueue");
        out.field("capacity", &self.capacity);
        match self.state.try_lock() {
            Some(state) => out
                .field("len", &state.storage.len())
                .field("active", &state.active),
            None => out.field("state", &"<locked>"),
        };
        out.finish()
    }
}

impl<S: Storage> BoundedQueue<S::Item> for GuardedQueue<S> {
    fn enqueue(&self, item: S::Item) -> Result<(), EnqueueError<S::Item>> {
        let mut state = self.state.lock();
        if !state.active {
            trace!(capacity = self.capacity, "enqueue refused: queue inactive");
            return Err(EnqueueError::Inactive(item));
        }

        match state.storage.push(item) {
            Ok(()) => {
                drop(state);
                self.available.notify_one();
                Ok(())
            }
            Err(item) => {
                trace!(capacity = self.capacity, "enqueue refused: queue full");
                Err(EnqueueError::Full(item))
            }
        }
    }

    fn dequeue(&self) -> Option<S::Item> {
        let mut state = self.state.lock();
        loop {
            if let Some(item) = state.storage.pop() {
                return Some(item);
            }
            if !state.active {
                return None;
            }
            self.available.wait(&mut state);
        }
    }

    fn try_dequeue(&self) -> Result<S::Item, DequeueError> {
        let mut state = self.state.lock();
        match state.storage.pop() {
            Some(item) => Ok(item),
            None if state.active => Err(DequeueError::Empty),
            None => Err(DequeueError::Inactive),
        }
    }

    fn dequeue_timeout(&self, timeout: Duration) -> Result<S::Item, DequeueError> {
        // A deadline beyond what `Instant` can represent is no deadline at all.
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.dequeue().ok_or(DequeueError::Inactive);
        };

        let mut state = self.state.lock();
        loop {
            if let Some(item) = state.storage.pop() {
                return Ok(item);
            }
            if !state.active {
                return Err(DequeueError::Inactive);
            }
            if self.available.wait_until(&mut state, deadline).timed_out() {
                return match state.storage.pop() {
                    Some(item) => Ok(item),
                    None if state.active => Err(DequeueError::Timeout),
                    None => Err(DequeueError::Inactive),
                };
            }
        }
    }

    fn drain(&self) -> Vec<S::Item> {
        let mut state = self.state.lock();
        let mut items = Vec::with_capacity(state.storage.len());
        while let Some(item) = state.storage.pop() {
            items.push(item);
        }
        items
    }

    fn deactivate(&self) -> bool {
        let mut state = self.state.lock();
        if !state.active {
            return false;
        }
        state.active = false;
        let woken = self.available.notify_all();
        trace!(
            capacity = self.capacity,
            remaining = state.storage.len(),
            woken,
            "queue deactivated"
        );
        true
    }

    fn is_active(&self) -> bool {
        self.state.lock().active
    }

    fn len(&self) -> usize {
        self.state.lock().storage.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn is_empty(&self) -> bool {
        self.state.lock().storage.is_empty()
    }

    fn is_full(&self) -> bool {
        self.state.lock().storage.is_full()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::queue::{LinkedQueue, RingQueue};

    const LIVENESS_BOUND: Duration = Duration::from_secs(5);

    fn blocked_consumer<Q>(queue: Arc<Q>) -> mpsc::Receiver<Option<u32>>
    where
        Q: BoundedQueue<u32> + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(queue.dequeue());
        });
        rx
    }

    #[test]
    fn test_enqueue_wakes_blocked_consumer() {
        let queue = Arc::new(LinkedQueue::<u32>::new(4));
        let rx = blocked_consumer(queue.clone());

        thread::sleep(Duration::from_millis(20));
        queue.enqueue(17).unwrap();

        assert_eq!(rx.recv_timeout(LIVENESS_BOUND).unwrap(), Some(17));
    }

    #[test]
    fn test_deactivate_wakes_every_consumer() {
        let queue = Arc::new(RingQueue::<u32>::new(4));
        let receivers: Vec<_> = (0..4).map(|_| blocked_consumer(queue.clone())).collect();

        thread::sleep(Duration::from_millis(20));
        assert!(queue.deactivate());

        for rx in receivers {
            assert_eq!(rx.recv_timeout(LIVENESS_BOUND).unwrap(), None);
        }
    }

    #[test]
    fn test_deactivate_hands_out_queued_items_first() {
        let queue = LinkedQueue::new(3);
        queue.enqueue(1).unwrap();
        queue.enqueue(2).unwrap();
        queue.deactivate();

        assert!(queue.enqueue(3).unwrap_err().is_inactive());
        assert_eq!(queue.try_dequeue(), Ok(1));
        assert_eq!(queue.dequeue(), Some(2));
        assert_eq!(queue.dequeue(), None);
        assert_eq!(queue.try_dequeue(), Err(DequeueError::Inactive));
    }

    #[test]
    fn test_try_dequeue_on_empty_active_queue() {
        let queue = RingQueue::<u8>::new(1);
        assert_eq!(queue.try_dequeue(), Err(DequeueError::Empty));
    }

    #[test]
    fn test_dequeue_timeout_expires() {
        let queue = LinkedQueue::<u8>::new(1);
        let started = Instant::now();
        assert_eq!(
            queue.dequeue_timeout(Duration::from_millis(30)),
            Err(DequeueError::Timeout)
        );
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_dequeue_timeout_receives_item() {
        let queue = Arc::new(RingQueue::<u32>::new(1));
        let producer = {
            let queue = queue.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                queue.enqueue(5).unwrap();
            })
        };

        assert_eq!(queue.dequeue_timeout(LIVENESS_BOUND), Ok(5));
        producer.join().unwrap();
    }

    #[test]
    fn test_dequeue_timeout_observes_deactivation() {
        let queue = Arc::new(LinkedQueue::<u32>::new(1));
        let (tx, rx) = mpsc::channel();
        {
            let queue = queue.clone();
            thread::spawn(move || {
                let _ = tx.send(queue.dequeue_timeout(Duration::from_secs(60)));
            });
        }

        thread::sleep(Duration::from_millis(20));
        queue.deactivate();
        assert_eq!(rx.recv_timeout(LIVENESS_BOUND).unwrap(), Err(DequeueError::Inactive));
    }

    #[test]
    fn test_dequeue_timeout_with_unbounded_deadline() {
        let queue = LinkedQueue::new(1);
        queue.enqueue(3u8).unwrap();
        assert_eq!(queue.dequeue_timeout(Duration::MAX), Ok(3));
    }

    #[test]
    fn test_drain_empties_in_order() {
        let queue = RingQueue::new(5);
        for i in 0..5 {
            queue.enqueue(i).unwrap();
        }
        assert_eq!(queue.drain(), vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
        assert!(queue.is_active());
    }

    #[test]
    fn test_debug_does_not_require_debug_items() {
        struct Opaque;
        let queue = LinkedQueue::new(2);
        queue.enqueue(Opaque).ok();
        let rendered = format!("{:?}", queue);
        assert!(rendered.contains("capacity: 2"));
        assert!(rendered.contains("len: 1"));
    }
}
