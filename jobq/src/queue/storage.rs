/// Backing store for a [`GuardedQueue`](super::GuardedQueue).
///
/// A storage is plain single-threaded data: every method is called with the
/// queue's mutex held, so implementations need no synchronization of their own.
/// `push` must refuse the item once `len() == capacity()`.
pub trait Storage: Send {
    /// Element type held by the storage.
    type Item;

    /// Create an empty storage able to hold `capacity` items.
    fn with_capacity(capacity: usize) -> Self
    where
        Self: Sized;

    /// Append at the tail, handing the item back when full.
    fn push(&mut self, item: Self::Item) -> Result<(), Self::Item>;

    /// Remove from the head.
    fn pop(&mut self) -> Option<Self::Item>;

    fn len(&self) -> usize;

    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }
}
