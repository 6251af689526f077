use serde::Serialize;

use crate::graph::{VertexId, Weight};

/// Position of a vertex that is not in the heap
const ABSENT: usize = usize::MAX;

/// A `(priority, vertex)` pair stored in the heap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeapEntry {
    pub priority: Weight,
    pub vertex: VertexId,
}

/// Binary min-heap over vertices with O(1) lookup of a vertex's slot,
/// allowing priorities to be decreased in place.
///
/// For every vertex in the heap `heap[positions[v]].vertex == v` holds,
/// for every other vertex `positions[v] >= heap.len()`.
#[derive(Debug, Clone)]
pub struct BinaryMinHeap {
    heap: Vec<HeapEntry>,
    positions: Vec<usize>,
}

/// Get the left child index of `index`
fn get_left(index: usize) -> usize {
    2 * index + 1
}

/// Get the right child index of `index`
fn get_right(index: usize) -> usize {
    2 * index + 2
}

/// Get the parent index of `index`
fn get_parent(index: usize) -> usize {
    debug_assert!(index > 0, "the root has no parent");
    (index - 1) / 2
}

impl BinaryMinHeap {
    /// Create a new empty `BinaryMinHeap` for vertices in `[0, capacity)`
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            positions: vec![ABSENT; capacity],
        }
    }

    /// Create a heap holding every vertex `v` in `[0, priorities.len())` with
    /// priority `priorities[v]`, heapified bottom-up in linear time
    pub fn from_priorities(priorities: &[Weight]) -> Self {
        let mut heap = Self {
            heap: priorities.iter()
                .enumerate()
                .map(|(vertex, &priority)| HeapEntry { priority, vertex })
                .collect(),
            positions: (0..priorities.len()).collect(),
        };

        for index in (0..heap.heap.len() / 2).rev() {
            heap.reheap(index);
        }

        heap
    }

    /// Set `entry` at position `index`
    fn set_entry_and_pos(&mut self, entry: HeapEntry, index: usize) {
        self.heap[index] = entry;
        self.positions[entry.vertex] = index;
    }

    /// Swap positions of the entries at `parent` and `child`
    fn swap(&mut self, parent: usize, child: usize) {
        let p_entry = self.heap[parent];
        let ch_entry = self.heap[child];

        self.set_entry_and_pos(p_entry, child);
        self.set_entry_and_pos(ch_entry, parent);
    }

    /// Fixes the heap structure below `index`
    fn reheap(&mut self, index: usize) {
        let len = self.heap.len();
        let left = get_left(index);
        let right = get_right(index);

        let mut smallest;
        if left < len && self.heap[left].priority < self.heap[index].priority {
            smallest = left;
        } else {
            smallest = index;
        }
        if right < len && self.heap[right].priority < self.heap[smallest].priority {
            smallest = right;
        }

        if smallest != index {
            self.swap(index, smallest);
            self.reheap(smallest);
        }
    }

    /// Move the entry at `index` up until its parent is no longer greater
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = get_parent(index);
            if self.heap[parent].priority <= self.heap[index].priority {
                break;
            }
            self.swap(parent, index);
            index = parent;
        }
    }

    /// Push `vertex` with `priority` on the heap.
    /// `vertex` must not be in the heap yet.
    pub fn push(&mut self, vertex: VertexId, priority: Weight) {
        debug_assert!(!self.contains(vertex), "vertex {} is already in the heap", vertex);
        if self.contains(vertex) {
            self.decrease_key(vertex, priority);
            return;
        }

        if vertex >= self.positions.len() {
            self.positions.resize(vertex + 1, ABSENT);
        }

        self.heap.push(HeapEntry { priority, vertex });
        let index = self.heap.len() - 1;
        self.positions[vertex] = index;
        self.sift_up(index);
    }

    /// Pop the entry with the minimum priority from the heap.
    /// Returns `None` if the heap is empty.
    pub fn pop(&mut self) -> Option<HeapEntry> {
        let tail = self.heap.pop()?;
        self.positions[tail.vertex] = ABSENT;

        if self.heap.is_empty() {
            return Some(tail);
        }

        let min_entry = self.heap[0];
        self.positions[min_entry.vertex] = ABSENT;
        self.set_entry_and_pos(tail, 0);
        self.reheap(0);

        Some(min_entry)
    }

    /// Get the entry with the minimum priority without removing it
    pub fn peek(&self) -> Option<HeapEntry> {
        self.heap.first().copied()
    }

    /// Decrease the priority of `vertex` to `priority`.
    /// Returns `true` if the priority was changed.
    ///
    /// Calling this for a vertex that is not in the heap or with a greater priority
    /// is a bug: it panics in debug builds and leaves the heap untouched otherwise.
    pub fn decrease_key(&mut self, vertex: VertexId, priority: Weight) -> bool {
        let index = match self.position(vertex) {
            Some(index) => index,
            None => {
                debug_assert!(false, "decrease_key on vertex {} which is not in the heap", vertex);
                return false;
            }
        };

        let current = self.heap[index].priority;
        if priority > current {
            debug_assert!(false, "decrease_key on vertex {} from {} to greater priority {}",
                          vertex, current, priority);
            return false;
        }
        if priority == current {
            return false;
        }

        self.heap[index].priority = priority;
        self.sift_up(index);
        true
    }

    /// Get the heap slot of `vertex` if it is in the heap
    fn position(&self, vertex: VertexId) -> Option<usize> {
        match self.positions.get(vertex) {
            Some(&index) if index < self.heap.len() => Some(index),
            _ => None
        }
    }

    /// Get the current priority of `vertex` if it is in the heap
    pub fn priority_of(&self, vertex: VertexId) -> Option<Weight> {
        self.position(vertex).map(|index| self.heap[index].priority)
    }

    /// Returns `true` if the heap contains `vertex`
    pub fn contains(&self, vertex: VertexId) -> bool {
        self.position(vertex).is_some()
    }

    /// Returns `true` if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Get the number of entries in the heap
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check the heap order and the position map, describing the first violation found
    #[cfg(test)]
    fn check_invariants(&self) -> Result<(), String> {
        for index in 1..self.heap.len() {
            let parent = get_parent(index);
            if self.heap[parent].priority > self.heap[index].priority {
                return Err(format!("entry {:?} at {} is smaller than its parent {:?} at {}",
                                   self.heap[index], index, self.heap[parent], parent));
            }
        }
        for (index, entry) in self.heap.iter().enumerate() {
            if self.positions[entry.vertex] != index {
                return Err(format!("vertex {} is at {} but its position is {}",
                                   entry.vertex, index, self.positions[entry.vertex]));
            }
        }
        for (vertex, &index) in self.positions.iter().enumerate() {
            if index < self.heap.len() && self.heap[index].vertex != vertex {
                return Err(format!("position {} of absent vertex {} is live", index, vertex));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use crate::binary_minheap::{BinaryMinHeap, HeapEntry};

    #[test]
    fn test_empty_pop() {
        let mut heap = BinaryMinHeap::with_capacity(4);

        assert!(heap.is_empty());
        assert_eq!(heap.pop(), None);
        assert_eq!(heap.peek(), None);
        assert!(!heap.contains(0));
    }

    #[test]
    fn test_push_pop_order() {
        let mut heap = BinaryMinHeap::with_capacity(6);
        for (vertex, priority) in [(0, 7), (1, 3), (2, 9), (3, 1), (4, 3), (5, 0)] {
            heap.push(vertex, priority);
            heap.check_invariants().unwrap();
        }
        assert_eq!(heap.len(), 6);

        let mut popped = Vec::new();
        while let Some(entry) = heap.pop() {
            heap.check_invariants().unwrap();
            assert!(!heap.contains(entry.vertex), "vertex {} still in heap", entry.vertex);
            popped.push(entry.priority);
        }
        assert_eq!(popped, vec![0, 1, 3, 3, 7, 9]);
    }

    #[test]
    fn test_from_priorities() {
        let priorities = [usize::MAX, 4, usize::MAX, 0, 2, 2, usize::MAX, 1];
        let mut heap = BinaryMinHeap::from_priorities(&priorities);
        heap.check_invariants().unwrap();

        for vertex in 0..priorities.len() {
            assert_eq!(heap.priority_of(vertex), Some(priorities[vertex]));
        }
        assert_eq!(heap.pop(), Some(HeapEntry { priority: 0, vertex: 3 }));
        assert_eq!(heap.pop(), Some(HeapEntry { priority: 1, vertex: 7 }));
    }

    #[test]
    fn test_decrease_key() {
        let mut heap = BinaryMinHeap::from_priorities(&[5, 6, 7, 8, 9]);

        assert!(heap.decrease_key(4, 1));
        heap.check_invariants().unwrap();
        assert_eq!(heap.peek(), Some(HeapEntry { priority: 1, vertex: 4 }));

        assert!(heap.decrease_key(2, 3));
        heap.check_invariants().unwrap();
        assert_eq!(heap.pop(), Some(HeapEntry { priority: 1, vertex: 4 }));
        assert_eq!(heap.pop(), Some(HeapEntry { priority: 3, vertex: 2 }));
        assert_eq!(heap.pop(), Some(HeapEntry { priority: 5, vertex: 0 }));
    }

    #[test]
    fn test_decrease_key_equal_priority() {
        let mut heap = BinaryMinHeap::from_priorities(&[4, 4, 2, 4]);
        let before: Vec<_> = heap.heap.clone();

        assert!(!heap.decrease_key(1, 4));
        assert_eq!(heap.heap, before);
        heap.check_invariants().unwrap();
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "greater priority")]
    fn test_increase_key_panics_in_debug() {
        let mut heap = BinaryMinHeap::from_priorities(&[1, 2]);
        heap.decrease_key(0, 10);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_increase_key_ignored_in_release() {
        let mut heap = BinaryMinHeap::from_priorities(&[1, 2]);

        assert!(!heap.decrease_key(0, 10));
        assert!(!heap.decrease_key(7, 0));
        assert_eq!(heap.priority_of(0), Some(1));
        heap.check_invariants().unwrap();
    }

    /// Heap operation generated by proptest
    #[derive(Debug, Clone)]
    enum Op {
        Push(usize, usize),
        Pop,
        Decrease(usize, usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..32usize, 0..1000usize).prop_map(|(v, p)| Op::Push(v, p)),
            Just(Op::Pop),
            (0..32usize, 0..1000usize).prop_map(|(v, d)| Op::Decrease(v, d)),
        ]
    }

    proptest! {
        #[test]
        fn test_random_operations(ops in proptest::collection::vec(op_strategy(), 0..200)) {
            let mut heap = BinaryMinHeap::with_capacity(32);
            // Reference model of the live (priority, vertex) pairs
            let mut model: BTreeSet<(usize, usize)> = BTreeSet::new();

            for op in ops {
                match op {
                    Op::Push(vertex, priority) => {
                        if !heap.contains(vertex) {
                            heap.push(vertex, priority);
                            model.insert((priority, vertex));
                        }
                    }
                    Op::Pop => {
                        let expected_min = model.iter().next().map(|&(p, _)| p);
                        let popped = heap.pop();
                        prop_assert_eq!(popped.map(|e| e.priority), expected_min);
                        if let Some(entry) = popped {
                            prop_assert!(model.remove(&(entry.priority, entry.vertex)));
                        }
                    }
                    Op::Decrease(vertex, delta) => {
                        if let Some(current) = heap.priority_of(vertex) {
                            let target = current.saturating_sub(delta);
                            let changed = heap.decrease_key(vertex, target);
                            prop_assert_eq!(changed, target < current);
                            model.remove(&(current, vertex));
                            model.insert((target, vertex));
                        }
                    }
                }

                prop_assert_eq!(heap.len(), model.len());
                if let Err(violation) = heap.check_invariants() {
                    return Err(TestCaseError::fail(violation));
                }
            }
        }
    }
}
