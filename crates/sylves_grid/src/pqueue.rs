//! A binary min-heap priority queue keyed by `f32` cost (spec component C6).
//!
//! `std::collections::BinaryHeap` is a max-heap over `Ord`, so entries are
//! wrapped the way a Dijkstra/A* implementation typically inverts ordering:
//! `OrderedFloat` gives the `f32` key total ordering, and insertion order
//! breaks ties so two equal-cost entries come back out FIFO rather than in
//! whatever order the heap's internal array happens to leave them.

use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry<T> {
    key: OrderedFloat<f32>,
    sequence: u64,
    payload: T,
}

impl<T: PartialEq> Eq for Entry<T> {}

impl<T: PartialEq> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap`, a max-heap, behaves as a min-heap; ties
        // go to the entry pushed first (smaller sequence number wins).
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<T: PartialEq> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A min-priority queue over `f32` keys, used by the pathfinding cores for
/// the open set (spec §4.6).
#[derive(Debug, Clone, Default)]
pub struct PriorityQueue<T: PartialEq> {
    heap: BinaryHeap<Entry<T>>,
    next_sequence: u64,
}

impl<T: PartialEq> PriorityQueue<T> {
    pub fn new() -> Self {
        PriorityQueue {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        PriorityQueue {
            heap: BinaryHeap::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    pub fn push(&mut self, key: f32, payload: T) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Entry {
            key: OrderedFloat(key),
            sequence,
            payload,
        });
    }

    pub fn pop(&mut self) -> Option<(f32, T)> {
        self.heap.pop().map(|entry| (entry.key.0, entry.payload))
    }

    pub fn peek_key(&self) -> Option<f32> {
        self.heap.peek().map(|entry| entry.key.0)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.next_sequence = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_ascending_key_order() {
        let mut q = PriorityQueue::new();
        q.push(5.0, "e");
        q.push(1.0, "a");
        q.push(3.0, "c");
        assert_eq!(q.pop(), Some((1.0, "a")));
        assert_eq!(q.pop(), Some((3.0, "c")));
        assert_eq!(q.pop(), Some((5.0, "e")));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn equal_keys_break_ties_in_insertion_order() {
        let mut q = PriorityQueue::new();
        q.push(1.0, "first");
        q.push(1.0, "second");
        assert_eq!(q.pop(), Some((1.0, "first")));
        assert_eq!(q.pop(), Some((1.0, "second")));
    }

    #[test]
    fn peek_key_does_not_remove() {
        let mut q = PriorityQueue::new();
        q.push(2.0, "x");
        assert_eq!(q.peek_key(), Some(2.0));
        assert_eq!(q.len(), 1);
    }
}
