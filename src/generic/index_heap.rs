/*!
A heap on some subset of elements with fixed indicies.

In other words, a heap backed by a vector with a companion vector which tracks the current location of the initial index of a heap element in the heap.

The backing vector stays constant, allowing the heap to act as a store of keys for elements which may be moved on and off the heap.

For example, [IndexHeap] is used to order [atoms](crate::structures::atom) for elimination, as atoms are associated with an index and the key of an atom (its count of occurrences) changes as clauses are added and removed, while the atom may or may not be pending elimination.

```rust
# use coprocessor::generic::index_heap::IndexHeap;
let mut heap = IndexHeap::default();

heap.add(600, 10);
heap.add(0, 70);

heap.activate(600);
heap.activate(0);

assert_eq!(heap.count(), 601);
assert_eq!(heap.value_at(5), &i64::default());

assert_eq!(heap.pop_max(), Some(0));
assert_eq!(heap.pop_max(), Some(600));

assert!(heap.pop_max().is_none());
```
*/

use std::cmp::Ordering;

/// The index heap struct.
pub struct IndexHeap<V: PartialOrd + Default> {
    values: Vec<V>,
    position_in_heap: Vec<Option<usize>>,
    heap: Vec<usize>,
    limit: usize,
}

impl<V: PartialOrd + Default> Default for IndexHeap<V> {
    fn default() -> Self {
        IndexHeap {
            values: Vec::default(),
            position_in_heap: Vec::default(),
            heap: Vec::default(),
            limit: 0,
        }
    }
}

impl<V: PartialOrd + Default> IndexHeap<V> {
    /// Index `value` with `value_index`.
    /// Returns true if `value_index` was a fresh index, false otherwise.
    ///
    /// The structure grows to the size required for `value_index` to be an index, and the value of any index added in passing is the default value.
    /// To place `value_index` on the heap [activate](IndexHeap::activate) should be called after this method.
    /// If `value_index` is already on the heap, [heapify_if_active](IndexHeap::heapify_if_active) restores the heap.
    pub fn add(&mut self, value_index: usize, value: V) -> bool {
        if self.values.len() <= value_index {
            let required = (value_index - self.values.len()) + 1;
            self.values.resize_with(self.values.len() + required, V::default);
            self.position_in_heap.resize(self.position_in_heap.len() + required, None);
            // Entries of the heap past the limit are arbitrary.
            self.heap.resize(self.heap.len() + required, usize::MAX);
            self.revalue(value_index, value);
            true
        } else {
            self.revalue(value_index, value);
            false
        }
    }

    /// Remove `value_index` from the heap, if present.
    /// Returns true if `value_index` was removed, false otherwise.
    pub fn remove(&mut self, value_index: usize) -> bool {
        if value_index >= self.position_in_heap.len() {
            return false;
        }
        unsafe {
            match self.heap_index(value_index) {
                Some(heap_index) => {
                    self.limit -= 1;
                    if heap_index == self.limit {
                        self.reposition(value_index, None);
                    } else {
                        let last = self.value_index(self.limit);
                        self.reposition(last, Some(heap_index));
                        self.heap.swap(heap_index, self.limit);
                        self.reposition(value_index, None);
                        self.heapify_down(heap_index);
                        self.heapify_up(heap_index);
                    }
                    true
                }
                None => false,
            }
        }
    }

    /// Places `value_index` on the heap.
    /// Returns true if `value_index` was not already on the heap, false otherwise.
    ///
    /// # Soundness
    /// `value_index` must have been [added](IndexHeap::add).
    pub fn activate(&mut self, value_index: usize) -> bool {
        unsafe {
            match self.heap_index(value_index) {
                None => {
                    self.reposition(value_index, Some(self.limit));
                    *self.heap.get_unchecked_mut(self.limit) = value_index;
                    self.heapify_up(self.limit);
                    self.limit += 1;
                    true
                }
                Some(heap_index) => {
                    self.heapify_up(heap_index);
                    self.heapify_down(heap_index);
                    false
                }
            }
        }
    }

    /// Whether `value_index` is on the heap.
    pub fn contains(&self, value_index: usize) -> bool {
        self.position_in_heap
            .get(value_index)
            .is_some_and(|position| position.is_some())
    }

    /// Heapify (ensure invariants of the heap are upheld) if `value_index` is active.
    pub fn heapify_if_active(&mut self, value_index: usize) {
        if value_index >= self.position_in_heap.len() {
            return;
        }
        unsafe {
            if let Some(heap_index) = self.heap_index(value_index) {
                self.heapify_down(heap_index);
                self.heapify_up(heap_index);
            }
        }
    }

    /// Pop the maximum index off the heap.
    pub fn pop_max(&mut self) -> Option<usize> {
        match self.limit {
            0 => None,
            _ => unsafe {
                let max_value_index = self.value_index(0);
                self.remove(max_value_index);
                Some(max_value_index)
            },
        }
    }

    /// Removes every index from the heap, keeping the indexed values.
    pub fn clear(&mut self) {
        for heap_index in 0..self.limit {
            let value_index = self.heap[heap_index];
            self.position_in_heap[value_index] = None;
        }
        self.limit = 0;
    }

    /// Heapify (ensure invariants of the heap are upheld) the heap.
    pub fn heapify(&mut self) {
        for heap_index in (0..self.limit / 2).rev() {
            unsafe { self.heapify_down(heap_index) }
        }
    }

    /// Return the value indexed by `value_index`.
    pub fn value_at(&self, value_index: usize) -> &V {
        &self.values[value_index]
    }

    /// Set the value of `value_index` to `value`.
    ///
    /// The heap is not restored, see [heapify_if_active](IndexHeap::heapify_if_active).
    pub fn revalue(&mut self, value_index: usize, value: V) {
        self.values[value_index] = value
    }

    /// A count of values indexed by the structure.
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// A count of indicies on the heap.
    pub fn active_count(&self) -> usize {
        self.limit
    }

    /// True if no index is on the heap, false otherwise.
    pub fn is_empty(&self) -> bool {
        self.limit == 0
    }
}

impl<V: PartialOrd + Default> IndexHeap<V> {
    /// The index of some value stored at `heap_index` on the heap.
    ///
    /// # Safety
    /// Assumes `heap_index` is some location on the heap.
    unsafe fn value_index(&self, heap_index: usize) -> usize {
        *unsafe { self.heap.get_unchecked(heap_index) }
    }

    /// Where `value_index` is stored on the heap, if present.
    ///
    /// # Safety
    /// Assumes `value_index` has been added.
    unsafe fn heap_index(&self, value_index: usize) -> Option<usize> {
        *unsafe { self.position_in_heap.get_unchecked(value_index) }
    }

    /// Updates the position in the heap of `value_index` to `heap_index`.
    ///
    /// # Safety
    /// Assumes `value_index` has been added.
    unsafe fn reposition(&mut self, value_index: usize, heap_index: Option<usize>) {
        *unsafe { self.position_in_heap.get_unchecked_mut(value_index) } = heap_index;
    }

    /// The value at some location on the heap.
    ///
    /// # Safety
    /// Assumes `heap_index` is some location on the heap.
    unsafe fn heap_value(&self, heap_index: usize) -> &V {
        unsafe { self.values.get_unchecked(self.value_index(heap_index)) }
    }

    /// Swaps two locations on the heap, and the record of where the indicies at those locations are stored.
    ///
    /// # Safety
    /// Assumes both `a` and `b` are locations on the heap.
    unsafe fn swap_heap_indicies(&mut self, a: usize, b: usize) {
        let (value_a, value_b) = unsafe { (self.value_index(a), self.value_index(b)) };
        self.position_in_heap.swap(value_a, value_b);
        self.heap.swap(a, b);
    }

    /// Shuffles the index down into the heap, if required.
    ///
    /// For any trio of an index and its children the larger child, if larger than the index, is swapped with the index.
    unsafe fn heapify_down(&mut self, mut heap_index: usize) {
        loop {
            let left_index = (2 * heap_index) + 1;
            if left_index >= self.limit {
                break;
            }
            let right_index = left_index + 1;

            let mut update_index = heap_index;
            unsafe {
                if self.heap_value(left_index) > self.heap_value(update_index) {
                    update_index = left_index;
                }
                if right_index < self.limit
                    && self.heap_value(right_index) > self.heap_value(update_index)
                {
                    update_index = right_index;
                }
            }

            if update_index == heap_index {
                break;
            }
            unsafe { self.swap_heap_indicies(heap_index, update_index) };
            heap_index = update_index;
        }
    }

    /// Shuffles the index up from the heap, if required.
    ///
    /// Swaps the index with it's parent in the heap, if the parent is smaller.
    unsafe fn heapify_up(&mut self, mut heap_index: usize) {
        while heap_index > 0 {
            let parent_index = (heap_index - 1) / 2;
            match unsafe {
                self.heap_value(parent_index)
                    .partial_cmp(self.heap_value(heap_index))
            } {
                Some(Ordering::Less) => {
                    unsafe { self.swap_heap_indicies(heap_index, parent_index) };
                    heap_index = parent_index;
                }
                _ => break,
            }
        }
    }
}
