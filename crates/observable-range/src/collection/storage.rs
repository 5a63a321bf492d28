//! The ordered storage an [`ObservableCollection`](super::ObservableCollection)
//! keeps its elements in.

use std::collections::VecDeque;

/// A resizable indexed sequence.
///
/// Only the primitive operations are required. The bulk helpers have default
/// implementations in terms of them; implementors with a faster native
/// equivalent should override them.
///
/// Callers guarantee indices are in bounds: `insert` accepts `0..=len`,
/// `remove` accepts `0..len`.
pub trait Storage<T> {
    /// Number of stored elements.
    fn len(&self) -> usize;

    /// Element at `index`, if any.
    fn get(&self, index: usize) -> Option<&T>;

    /// Insert `item` at `index`, shifting later elements back.
    fn insert(&mut self, index: usize, item: T);

    /// Remove and return the element at `index`.
    fn remove(&mut self, index: usize) -> T;

    /// Remove every element.
    fn clear(&mut self);

    /// Returns `true` when no elements are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert `items` so that `items[i]` ends at `index + i`.
    fn insert_many(&mut self, index: usize, items: Vec<T>) {
        for (offset, item) in items.into_iter().enumerate() {
            self.insert(index + offset, item);
        }
    }

    /// Remove `count` elements starting at `index`, returning them in order.
    fn drain_range(&mut self, index: usize, count: usize) -> Vec<T> {
        (0..count).map(|_| self.remove(index)).collect()
    }

    /// Replace element `index` with `item`, returning the previous element.
    fn replace(&mut self, index: usize, item: T) -> T {
        let old = self.remove(index);
        self.insert(index, item);
        old
    }
}

impl<T> Storage<T> for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        <[T]>::get(self, index)
    }

    fn insert(&mut self, index: usize, item: T) {
        Vec::insert(self, index, item);
    }

    fn remove(&mut self, index: usize) -> T {
        Vec::remove(self, index)
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn insert_many(&mut self, index: usize, items: Vec<T>) {
        self.splice(index..index, items);
    }

    fn drain_range(&mut self, index: usize, count: usize) -> Vec<T> {
        self.drain(index..index + count).collect()
    }

    fn replace(&mut self, index: usize, item: T) -> T {
        std::mem::replace(&mut self[index], item)
    }
}

impl<T> Storage<T> for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        VecDeque::get(self, index)
    }

    fn insert(&mut self, index: usize, item: T) {
        VecDeque::insert(self, index, item);
    }

    fn remove(&mut self, index: usize) -> T {
        match VecDeque::remove(self, index) {
            Some(item) => item,
            None => panic!("removal index (is {index}) should be < len (is {})", self.len()),
        }
    }

    fn clear(&mut self) {
        VecDeque::clear(self);
    }

    fn drain_range(&mut self, index: usize, count: usize) -> Vec<T> {
        self.drain(index..index + count).collect()
    }
}
