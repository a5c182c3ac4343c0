/*!
The formula and arena, as shared between parallel workers.

A [SharedFormula] is built by moving the parts of a [FormulaDB] and [ClauseArena] into thread-safe structures, and is [restored](SharedFormula::restore) once every worker has finished.

- The [SharedArena] is guarded by a readers–writer lock.
  Workers inspect and revise clauses under the read lock, with each clause body and occurrence list under a [SpinLock] and flags and counts as atomics.
  The write lock is taken only to [reserve](SharedFormula::reserve) slots for new clauses, as this may move the clauses of the arena.
- The assignment, the extension log, the clause lists, and the delete timer form the [SharedData], under a single spin lock which is taken only while holding the read lock.
- Each atom has a lock, a flag noting elimination, and a stamp noting the last step at which a worker added a clause over the neighborhood of the atom.
*/

use std::{
    ops::Range,
    sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering},
};

use crossbeam::sync::{ShardedLock, ShardedLockReadGuard};

use crate::{
    db::{
        arena::{ClauseArena, StoredClause},
        formula::{
            assignment::{Assignment, EnqueueResult},
            extension::ExtensionLog,
            FormulaDB,
        },
        ArenaIndex, ClauseKey,
    },
    misc::log::targets,
    parallel::locks::{SpinGuard, SpinLock},
    structures::{
        atom::Atom,
        clause::CClause,
        literal::{CLiteral, Literal},
    },
    types::err::{self},
};

/// A clause of the shared arena.
pub struct SharedClause {
    deleted: AtomicBool,
    learnt: AtomicBool,
    body: SpinLock<CClause>,
}

impl SharedClause {
    fn new(literals: CClause, learnt: bool, deleted: bool) -> Self {
        SharedClause {
            deleted: AtomicBool::new(deleted),
            learnt: AtomicBool::new(learnt),
            body: SpinLock::new(literals),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted.load(Ordering::Acquire)
    }

    /// Marks the clause as deleted, returning true if the clause was live.
    pub fn try_delete(&self) -> bool {
        !self.deleted.swap(true, Ordering::AcqRel)
    }

    pub fn is_learnt(&self) -> bool {
        self.learnt.load(Ordering::Acquire)
    }

    fn set_learnt(&self, learnt: bool) {
        self.learnt.store(learnt, Ordering::Release)
    }

    /// The literals of the clause.
    pub fn body(&self) -> SpinGuard<'_, CClause> {
        self.body.lock()
    }
}

/// Clauses, occurrence lists, and counts.
pub struct SharedArena {
    pub(crate) clauses: Vec<SharedClause>,
    pub(crate) occurrences: Vec<SpinLock<Vec<ClauseKey>>>,
    pub(crate) counts: Vec<AtomicI32>,
}

impl SharedArena {
    pub fn clause(&self, key: ClauseKey) -> &SharedClause {
        &self.clauses[key.index()]
    }

    /// The occurrence list of `literal`.
    pub fn list(&self, literal: CLiteral) -> SpinGuard<'_, Vec<ClauseKey>> {
        self.occurrences[literal.index()].lock()
    }

    /// The count of live clauses containing `literal`.
    pub fn count(&self, literal: CLiteral) -> i32 {
        self.counts[literal.index()].load(Ordering::Acquire)
    }
}

/// Parts of the formula guarded by the data lock.
pub struct SharedData {
    pub(crate) assignment: Assignment,
    pub(crate) extension: ExtensionLog,
    pub(crate) clauses: Vec<ClauseKey>,
    pub(crate) learnts: Vec<ClauseKey>,
    pub(crate) delete_timer: Vec<u32>,
    pub(crate) timer: u32,
    pub(crate) step: u32,
}

/// The formula, shared between workers.
pub struct SharedFormula {
    pub(crate) arena: ShardedLock<SharedArena>,
    pub(crate) data: SpinLock<SharedData>,
    reservation: SpinLock<()>,

    pub(crate) atom_locks: Vec<SpinLock<()>>,
    pub(crate) last_touched: Vec<AtomicU32>,
    pub(crate) eliminated: Vec<AtomicBool>,

    pub(crate) subsumption_queue: SpinLock<Vec<ClauseKey>>,
    pub(crate) strengthening_queue: SpinLock<Vec<ClauseKey>>,

    ok: AtomicBool,
}

impl SharedFormula {
    /// Moves the contents of `formula` and `arena` into a shared formula.
    pub fn new(formula: &mut FormulaDB, arena: &mut ClauseArena) -> Self {
        let clauses = std::mem::take(arena)
            .into_clauses()
            .into_iter()
            .map(|clause| {
                let (literals, learnt, deleted) = clause.into_parts();
                SharedClause::new(literals, learnt, deleted)
            })
            .collect();

        let shared_arena = SharedArena {
            clauses,
            occurrences: std::mem::take(&mut formula.occurrences)
                .into_iter()
                .map(SpinLock::new)
                .collect(),
            counts: std::mem::take(&mut formula.literal_counts)
                .into_iter()
                .map(AtomicI32::new)
                .collect(),
        };

        let data = SharedData {
            assignment: std::mem::take(&mut formula.assignment),
            extension: std::mem::take(&mut formula.extension),
            clauses: std::mem::take(&mut formula.clauses),
            learnts: std::mem::take(&mut formula.learnts),
            delete_timer: std::mem::take(&mut formula.delete_timer),
            timer: formula.timer,
            step: 0,
        };

        let atom_count = formula.atom_count();
        SharedFormula {
            arena: ShardedLock::new(shared_arena),
            data: SpinLock::new(data),
            reservation: SpinLock::new(()),
            atom_locks: (0..atom_count).map(|_| SpinLock::new(())).collect(),
            last_touched: (0..atom_count).map(|_| AtomicU32::new(0)).collect(),
            eliminated: std::mem::take(&mut formula.eliminated)
                .into_iter()
                .map(AtomicBool::new)
                .collect(),
            subsumption_queue: SpinLock::default(),
            strengthening_queue: SpinLock::default(),
            ok: AtomicBool::new(formula.ok),
        }
    }

    /// Moves the contents of the shared formula back to `formula` and `arena`.
    ///
    /// Returns the keys of clauses queued for subsumption and strengthening.
    pub fn restore(self, formula: &mut FormulaDB, arena: &mut ClauseArena) -> (Vec<ClauseKey>, Vec<ClauseKey>) {
        let shared_arena = self
            .arena
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let clauses = shared_arena
            .clauses
            .into_iter()
            .map(|clause| {
                let mut stored = StoredClause::new(clause.body.into_inner(), clause.learnt.into_inner());
                if clause.deleted.into_inner() {
                    stored.set_deleted();
                }
                stored
            })
            .collect();
        *arena = ClauseArena::from_clauses(clauses);

        formula.occurrences = shared_arena
            .occurrences
            .into_iter()
            .map(SpinLock::into_inner)
            .collect();
        formula.literal_counts = shared_arena
            .counts
            .into_iter()
            .map(AtomicI32::into_inner)
            .collect();

        let data = self.data.into_inner();
        formula.assignment = data.assignment;
        formula.extension = data.extension;
        formula.clauses = data.clauses;
        formula.learnts = data.learnts;
        formula.delete_timer = data.delete_timer;
        formula.timer = data.timer;

        formula.eliminated = self
            .eliminated
            .into_iter()
            .map(AtomicBool::into_inner)
            .collect();
        formula.ok = formula.ok && self.ok.into_inner();

        (
            self.subsumption_queue.into_inner(),
            self.strengthening_queue.into_inner(),
        )
    }

    /// Takes the read lock on the arena.
    pub fn read(&self) -> Result<ShardedLockReadGuard<'_, SharedArena>, err::ParallelError> {
        self.arena.read().map_err(|_| err::ParallelError::PoisonedLock)
    }

    /// Appends `count` (deleted) slots to the arena, to be [filled](SharedFormula::fill) by the caller.
    ///
    /// Must not be called while holding the read lock.
    pub fn reserve(&self, count: usize) -> Result<Range<usize>, err::PreprocessingError> {
        let _reservation = self.reservation.lock();
        let mut arena = self
            .arena
            .write()
            .map_err(|_| err::ParallelError::PoisonedLock)?;

        let start = arena.clauses.len();
        let end = start + count;
        if ArenaIndex::try_from(end).map_or(true, |end| end == ArenaIndex::MAX) {
            log::error!(target: targets::PARALLEL, "Arena exhausted");
            return Err(err::ClauseArenaError::StorageExhausted.into());
        }
        arena
            .clauses
            .extend((0..count).map(|_| SharedClause::new(CClause::default(), false, true)));
        log::trace!(target: targets::PARALLEL, "Reserved {count} slots from {start}");
        Ok(start..end)
    }

    /// Stores `literals` in the reserved slot at `key`, and indexes the clause.
    pub fn fill(&self, arena: &SharedArena, key: ClauseKey, literals: CClause, learnt: bool) {
        let clause = arena.clause(key);
        for literal in &literals {
            arena.list(*literal).push(key);
            arena.counts[literal.index()].fetch_add(1, Ordering::AcqRel);
        }
        *clause.body() = literals;
        clause.set_learnt(learnt);
        clause.deleted.store(false, Ordering::Release);

        let mut data = self.data.lock();
        match learnt {
            true => data.learnts.push(key),
            false => data.clauses.push(key),
        }
    }

    /// Deletes the clause at `key`, if live, recording the clause on the extension log on `pivot` if original and some pivot is given.
    ///
    /// `buffer` is used to hold a copy of the clause.
    /// Returns true if the clause was live.
    pub fn remove_clause(
        &self,
        arena: &SharedArena,
        key: ClauseKey,
        pivot: Option<CLiteral>,
        buffer: &mut CClause,
    ) -> bool {
        let clause = arena.clause(key);
        if !clause.try_delete() {
            return false;
        }
        buffer.clear();
        buffer.extend_from_slice(&clause.body());
        let learnt = clause.is_learnt();

        for literal in buffer.iter() {
            arena.counts[literal.index()].fetch_sub(1, Ordering::AcqRel);
        }

        let mut data = self.data.lock();
        let timer = data.timer;
        for literal in buffer.iter() {
            data.delete_timer[literal.atom() as usize] = timer;
        }
        if let (Some(pivot), false) = (pivot, learnt) {
            data.extension.push(buffer, pivot);
        }
        true
    }

    /// Notes `literal` was removed from the clause at `key`.
    pub fn removed_literal(&self, arena: &SharedArena, key: ClauseKey, literal: CLiteral) {
        {
            let mut list = arena.list(literal);
            if let Some(position) = list.iter().position(|other| *other == key) {
                list.swap_remove(position);
            }
        }
        arena.counts[literal.index()].fetch_sub(1, Ordering::AcqRel);
        let mut data = self.data.lock();
        let timer = data.timer;
        data.delete_timer[literal.atom() as usize] = timer;
    }

    /// Marks the clause at `key` as original, if learnt.
    pub fn promote_clause(&self, arena: &SharedArena, key: ClauseKey) {
        if arena.clause(key).learnt.swap(false, Ordering::AcqRel) {
            self.data.lock().clauses.push(key);
        }
    }

    /// Assigns `literal`, failing the formula on a conflict.
    pub fn enqueue(&self, literal: CLiteral) -> EnqueueResult {
        let result = self.data.lock().assignment.enqueue(literal);
        if result == EnqueueResult::Conflict {
            log::debug!(target: targets::PARALLEL, "Conflict enqueueing {literal}");
            self.set_failed();
        }
        result
    }

    /// The value of `atom`, if any.
    pub fn value_of(&self, atom: Atom) -> Option<bool> {
        self.data.lock().assignment.value_of(atom)
    }

    /// Stamps each atom of `atoms` with a fresh step.
    pub fn touch_neighborhood(&self, atoms: &[Atom]) {
        let step = {
            let mut data = self.data.lock();
            data.step += 1;
            data.step
        };
        for atom in atoms {
            self.last_touched[*atom as usize].store(step, Ordering::Release);
        }
    }

    /// The last step at which the neighborhood of `atom` was touched.
    pub fn stamp(&self, atom: Atom) -> u32 {
        self.last_touched[atom as usize].load(Ordering::Acquire)
    }

    pub fn set_eliminated(&self, atom: Atom) {
        self.eliminated[atom as usize].store(true, Ordering::Release)
    }

    pub fn is_eliminated(&self, atom: Atom) -> bool {
        self.eliminated[atom as usize].load(Ordering::Acquire)
    }

    /// Queues `key` for subsumption and strengthening after the workers have finished.
    pub fn queue(&self, key: ClauseKey) {
        self.subsumption_queue.lock().push(key);
        self.strengthening_queue.lock().push(key);
    }

    pub fn set_failed(&self) {
        self.ok.store(false, Ordering::Release)
    }

    pub fn ok(&self) -> bool {
        self.ok.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod shared_tests {
    use super::*;

    #[test]
    fn round_trip_keeps_the_formula() {
        let mut formula = FormulaDB::new();
        let mut arena = ClauseArena::default();
        formula.ensure_atom(2);
        let p = CLiteral::new(1, true);
        let q = CLiteral::new(2, false);
        let key = arena.allocate(vec![p, q], false).unwrap();
        formula.add_clause(key, &arena);

        let shared = SharedFormula::new(&mut formula, &mut arena);
        assert!(arena.is_empty());
        {
            let slots = shared.reserve(1).unwrap();
            let reserved = ClauseKey(slots.start as ArenaIndex);
            let read = shared.read().unwrap();
            shared.fill(&read, reserved, vec![-p, q], true);
            assert_eq!(read.count(q), 2);

            let mut buffer = CClause::default();
            assert!(shared.remove_clause(&read, key, Some(p), &mut buffer));
            assert!(!shared.remove_clause(&read, key, Some(p), &mut buffer));
            assert_eq!(read.count(p), 0);
        }
        shared.restore(&mut formula, &mut arena);

        assert_eq!(arena.len(), 2);
        assert!(arena[key].is_deleted());
        assert!(arena[ClauseKey(1)].is_learnt());
        assert_eq!(formula.count(q), 1);
        assert_eq!(formula.extension().len(), 1);
        assert_eq!(formula.learnt_keys(), &[ClauseKey(1)]);
    }
}
