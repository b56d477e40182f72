use std::collections::VecDeque;
use std::fmt;

use super::storage::Storage;

/// Growable storage for the linked queue variant.
///
/// Memory is allocated as items arrive rather than up front, so a queue with a
/// large nominal capacity costs nothing until it fills. The capacity is a
/// logical limit enforced by [`Storage::push`].
pub struct LinkedStorage<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> fmt::Debug for LinkedStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedStorage")
            .field("len", &self.items.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<T: Send> Storage for LinkedStorage<T> {
    type Item = T;

    fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            capacity,
        }
    }

    fn push(&mut self, item: T) -> Result<(), T> {
        if self.items.len() >= self.capacity {
            return Err(item);
        }
        self.items.push_back(item);
        Ok(())
    }

    fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
