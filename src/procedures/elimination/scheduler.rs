//! The order in which atoms are taken for elimination.
//!
//! For the [minimum](HeapOrder::Minimum) and [maximum](HeapOrder::Maximum) orders atoms are kept on an [IndexHeap], keyed by their count of occurrences.
//! As the heap is a max-heap, the key for the minimum order is the negated count.
//!
//! For the [random](HeapOrder::Random) order atoms are kept on a plain queue, and each call to [next](VariableScheduler::next) removes some atom chosen by the [generator](MinimalPCG32) of the scheduler.

use rand::Rng;

use crate::{
    config::elimination::HeapOrder,
    db::formula::FormulaDB,
    generic::{index_heap::IndexHeap, minimal_pcg::MinimalPCG32},
    structures::atom::Atom,
};

/// A queue of atoms pending elimination.
pub struct VariableScheduler {
    order: HeapOrder,
    heap: IndexHeap<i64>,
    queue: Vec<Atom>,
    queued: Vec<bool>,
    rng: MinimalPCG32,
}

impl VariableScheduler {
    pub fn new(order: HeapOrder, seed: u64) -> Self {
        VariableScheduler {
            order,
            heap: IndexHeap::default(),
            queue: Vec::default(),
            queued: Vec::default(),
            rng: MinimalPCG32::from_u64(seed),
        }
    }

    fn key(&self, occurrences: usize) -> i64 {
        let occurrences = occurrences as i64;
        match self.order {
            HeapOrder::Minimum => -occurrences,
            HeapOrder::Maximum | HeapOrder::Random => occurrences,
        }
    }

    /// Places `atom` on the queue, if not already present.
    pub fn push(&mut self, atom: Atom, occurrences: usize) {
        match self.order {
            HeapOrder::Random => {
                let index = atom as usize;
                if self.queued.len() <= index {
                    self.queued.resize(index + 1, false);
                }
                if !self.queued[index] {
                    self.queued[index] = true;
                    self.queue.push(atom);
                }
            }

            HeapOrder::Minimum | HeapOrder::Maximum => {
                let key = self.key(occurrences);
                self.heap.add(atom as usize, key);
                self.heap.activate(atom as usize);
            }
        }
    }

    /// Rekeys `atom` with a revised count of occurrences, if the atom is queued.
    pub fn update(&mut self, atom: Atom, occurrences: usize) {
        if self.order == HeapOrder::Random || !self.heap.contains(atom as usize) {
            return;
        }
        let key = self.key(occurrences);
        self.heap.revalue(atom as usize, key);
        self.heap.heapify_if_active(atom as usize);
    }

    /// Whether some atom is queued.
    pub fn has_work(&self) -> bool {
        match self.order {
            HeapOrder::Random => !self.queue.is_empty(),
            HeapOrder::Minimum | HeapOrder::Maximum => !self.heap.is_empty(),
        }
    }

    /// A count of queued atoms.
    pub fn len(&self) -> usize {
        match self.order {
            HeapOrder::Random => self.queue.len(),
            HeapOrder::Minimum | HeapOrder::Maximum => self.heap.active_count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.has_work()
    }

    /// Removes the next atom from the queue.
    pub fn next(&mut self) -> Option<Atom> {
        match self.order {
            HeapOrder::Random => {
                if self.queue.is_empty() {
                    return None;
                }
                let index = self.rng.random_range(0..self.queue.len());
                let atom = self.queue.swap_remove(index);
                self.queued[atom as usize] = false;
                Some(atom)
            }

            HeapOrder::Minimum | HeapOrder::Maximum => {
                self.heap.pop_max().map(|index| index as Atom)
            }
        }
    }

    /// Empties the queue.
    pub fn clear(&mut self) {
        self.heap.clear();
        for atom in self.queue.drain(..) {
            self.queued[atom as usize] = false;
        }
    }

    /// Replaces the queue with every atom of `atoms` which has neither a value nor been eliminated.
    pub fn rebuild(&mut self, atoms: &[Atom], formula: &FormulaDB) {
        self.clear();
        for atom in atoms {
            if formula.is_eliminated(*atom) || formula.value_of(*atom).is_some() {
                continue;
            }
            self.push(*atom, formula.atom_occurrences(*atom));
        }
    }
}

#[cfg(test)]
mod scheduler_tests {
    use super::*;

    #[test]
    fn minimum_first() {
        let mut scheduler = VariableScheduler::new(HeapOrder::Minimum, 0);
        scheduler.push(0, 5);
        scheduler.push(1, 2);
        scheduler.push(2, 9);
        scheduler.update(2, 1);

        assert_eq!(scheduler.len(), 3);
        assert_eq!(scheduler.next(), Some(2));
        assert_eq!(scheduler.next(), Some(1));
        assert_eq!(scheduler.next(), Some(0));
        assert_eq!(scheduler.next(), None);
    }

    #[test]
    fn maximum_first() {
        let mut scheduler = VariableScheduler::new(HeapOrder::Maximum, 0);
        scheduler.push(0, 5);
        scheduler.push(1, 2);
        scheduler.push(2, 9);

        assert_eq!(scheduler.next(), Some(2));
        assert_eq!(scheduler.next(), Some(0));
        assert_eq!(scheduler.next(), Some(1));
    }

    #[test]
    fn random_takes_each_once() {
        let mut scheduler = VariableScheduler::new(HeapOrder::Random, 7);
        for atom in 0..16 {
            scheduler.push(atom, 1);
            scheduler.push(atom, 1);
        }
        assert_eq!(scheduler.len(), 16);

        let mut taken = Vec::default();
        while let Some(atom) = scheduler.next() {
            taken.push(atom);
        }
        taken.sort();
        assert_eq!(taken, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn clear_allows_requeue() {
        let mut scheduler = VariableScheduler::new(HeapOrder::Random, 7);
        scheduler.push(3, 1);
        scheduler.clear();
        assert!(!scheduler.has_work());
        scheduler.push(3, 1);
        assert_eq!(scheduler.next(), Some(3));
    }
}
