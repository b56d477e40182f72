use std::fmt;

use super::storage::Storage;

/// Preallocated ring-buffer storage.
///
/// Holds `capacity + 1` slots so that "full" and "empty" can be told apart from
/// the two indices alone:
///
/// - empty: `head == tail`
/// - full: `(tail + 1) % slots == head`
///
/// The length is derived from the indices; there is no separate counter.
pub struct RingStorage<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
}

impl<T> RingStorage<T> {
    fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn advance(&self, index: usize) -> usize {
        (index + 1) % self.slot_count()
    }
}

impl<T> fmt::Debug for RingStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingStorage")
            .field("slots", &self.slot_count())
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}

/// Largest capacity a ring can hold: one slot is always kept spare.
pub const MAX_RING_CAPACITY: usize = usize::MAX - 1;

impl<T: Send> Storage for RingStorage<T> {
    type Item = T;

    /// # Panics
    ///
    /// Panics if `capacity` exceeds [`MAX_RING_CAPACITY`], since the spare slot
    /// would not be addressable.
    fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity <= MAX_RING_CAPACITY,
            "ring capacity {} exceeds the maximum of {}",
            capacity,
            MAX_RING_CAPACITY
        );
        let slots = (0..capacity + 1).map(|_| None).collect::<Vec<_>>();
        Self {
            slots: slots.into_boxed_slice(),
            head: 0,
            tail: 0,
        }
    }

    fn push(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }
        self.slots[self.tail] = Some(item);
        self.tail = self.advance(self.tail);
        Ok(())
    }

    fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.slots[self.head].take();
        self.head = self.advance(self.head);
        item
    }

    fn len(&self) -> usize {
        if self.tail >= self.head {
            self.tail - self.head
        } else {
            self.tail + self.slot_count() - self.head
        }
    }

    fn capacity(&self) -> usize {
        self.slot_count() - 1
    }

    fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    fn is_full(&self) -> bool {
        self.advance(self.tail) == self.head
    }
}
