//! Locks for the parallel variant of elimination.
//!
//! - [SpinLock] is a busy-waiting lock, backing off with [Backoff] while waiting.
//!   Spin locks guard each atom, each clause, each occurrence list, and the shared data and queues.
//! - [NeighborhoodLock] holds the locks of a set of atoms, acquired in ascending order of atom and released in descending order.
//!
//! The arena itself is guarded by a [ShardedLock](crossbeam::sync::ShardedLock), see [shared](super::shared).

use std::{
    cell::UnsafeCell,
    ops::{Deref, DerefMut},
    sync::atomic::{AtomicBool, Ordering},
};

use crossbeam::utils::Backoff;

use crate::structures::atom::Atom;

/// A busy-waiting lock.
pub struct SpinLock<T> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
}

// Safety: access to the data is only through a guard, and at most one guard exists at any time.
unsafe impl<T: Send> Sync for SpinLock<T> {}
unsafe impl<T: Send> Send for SpinLock<T> {}

impl<T> SpinLock<T> {
    pub fn new(data: T) -> Self {
        SpinLock {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(data),
        }
    }

    /// Waits until the lock is free, then takes the lock.
    pub fn lock(&self) -> SpinGuard<'_, T> {
        let backoff = Backoff::new();
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            backoff.snooze();
        }
        SpinGuard { lock: self }
    }

    /// Takes the lock if the lock is free.
    pub fn try_lock(&self) -> Option<SpinGuard<'_, T>> {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| SpinGuard { lock: self })
    }

    /// The data, as exclusive access to the lock ensures no guard exists.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: Default> Default for SpinLock<T> {
    fn default() -> Self {
        SpinLock::new(T::default())
    }
}

/// Access to the data of a [SpinLock], releasing the lock when dropped.
pub struct SpinGuard<'l, T> {
    lock: &'l SpinLock<T>,
}

impl<T> Deref for SpinGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        // Safety: the guard holds the lock.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for SpinGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // Safety: the guard holds the lock.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for SpinGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
    }
}

/// The locks of a set of atoms.
pub struct NeighborhoodLock<'l> {
    guards: Vec<SpinGuard<'l, ()>>,
}

impl<'l> NeighborhoodLock<'l> {
    /// Takes the lock of each atom in `atoms`, which must be sorted and free of duplicates.
    pub fn acquire(locks: &'l [SpinLock<()>], atoms: &[Atom]) -> Self {
        debug_assert!(atoms.windows(2).all(|pair| pair[0] < pair[1]));
        let guards = atoms
            .iter()
            .map(|atom| locks[*atom as usize].lock())
            .collect();
        NeighborhoodLock { guards }
    }

    /// A count of locks held.
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl Drop for NeighborhoodLock<'_> {
    fn drop(&mut self) {
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }
}
