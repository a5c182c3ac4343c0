/*!
A parallel elimination worker.

Each worker repeatedly pops an atom from the shared scheduler and, for the atom *v*:

1. Under the lock of *v* and the read lock, collects the *neighborhood* of *v* (every atom of some live clause containing *v* or -*v*) and reads the stamp of *v*.
2. Releases both locks, then takes the lock of every atom in the neighborhood in ascending order, and the read lock.
3. If the stamp of *v* has changed some other worker added clauses over *v* in the meantime, so every lock is released and the worker retries from (1).
4. Copies the clauses of *v* and [decides](crate::procedures::elimination::AtomWorker::decide) on *v*, as in the sequential variant.
5. Applies the decision.
   On elimination, the read lock is released while slots for the resolvents are [reserved](SharedFormula::reserve), and retaken to fill the slots.
6. Stamps every atom of the neighborhood, and [subsumes and strengthens](super::subsumption) with the resolvents.

Locks are released in descending order, on every path out of the worker.
*/

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    config::elimination::EliminationConfig,
    db::{formula::assignment::EnqueueResult, ArenaIndex, ClauseKey},
    misc::log::targets,
    parallel::{
        locks::{NeighborhoodLock, SpinLock},
        shared::{SharedArena, SharedFormula},
    },
    procedures::elimination::{scheduler::VariableScheduler, AtomWorker, Decision, EliminationStats},
    structures::{
        atom::Atom,
        clause::CClause,
        literal::{CLiteral, Literal},
    },
    types::err::{self},
};

/// A worker, with buffers.
pub struct ParallelWorker<'s> {
    pub(super) shared: &'s SharedFormula,
    heap: &'s SpinLock<VariableScheduler>,
    config: &'s EliminationConfig,
    steps: &'s AtomicUsize,

    pub(super) worker: AtomWorker,
    neighborhood: Vec<Atom>,
    pub(super) candidates: Vec<ClauseKey>,
    pub(super) added: Vec<ClauseKey>,
    pub(super) resolvent: CClause,
    pub(super) buffer: CClause,
}

impl<'s> ParallelWorker<'s> {
    pub fn new(
        shared: &'s SharedFormula,
        heap: &'s SpinLock<VariableScheduler>,
        config: &'s EliminationConfig,
        steps: &'s AtomicUsize,
    ) -> Self {
        ParallelWorker {
            shared,
            heap,
            config,
            steps,
            worker: AtomWorker::default(),
            neighborhood: Vec::default(),
            candidates: Vec::default(),
            added: Vec::default(),
            resolvent: CClause::default(),
            buffer: CClause::default(),
        }
    }

    /// Eliminates atoms until the scheduler is empty, the step limit is reached, or the formula is found to be unsatisfiable.
    pub fn run(mut self) -> Result<EliminationStats, err::PreprocessingError> {
        loop {
            if !self.shared.ok() {
                break;
            }
            if self.steps.load(Ordering::Relaxed) >= self.config.step_limit.value {
                break;
            }
            let next = self.heap.lock().next();
            let Some(atom) = next else {
                break;
            };

            if let Err(e) = self.eliminate(atom) {
                if e == err::PreprocessingError::Unsatisfiable {
                    self.shared.set_failed();
                }
                log::debug!(target: targets::PARALLEL, "Worker stopped on {atom}: {e:?}");
                return Err(e);
            }
        }
        Ok(self.worker.stats)
    }

    /// Collects every atom of some live clause containing a literal of `atom`, sorted.
    fn collect_neighborhood(&mut self, atom: Atom, arena: &SharedArena) {
        self.neighborhood.clear();
        self.neighborhood.push(atom);
        for polarity in [true, false] {
            self.candidates.clear();
            self.candidates
                .extend_from_slice(&arena.list(CLiteral::new(atom, polarity)));
            for key in &self.candidates {
                let clause = arena.clause(*key);
                if clause.is_deleted() {
                    continue;
                }
                self.neighborhood
                    .extend(clause.body().iter().map(|literal| literal.atom()));
            }
        }
        self.neighborhood.sort_unstable();
        self.neighborhood.dedup();
    }

    /// Copies the live clauses of `atom`.
    fn collect_occurrences(&mut self, atom: Atom, arena: &SharedArena) {
        self.worker.occurrences.clear();
        for polarity in [true, false] {
            let literal = CLiteral::new(atom, polarity);
            self.candidates.clear();
            self.candidates.extend_from_slice(&arena.list(literal));
            for key in &self.candidates {
                let clause = arena.clause(*key);
                if clause.is_deleted() {
                    continue;
                }
                let body = clause.body();
                if body.binary_search(&literal).is_err() {
                    continue;
                }
                self.worker
                    .occurrences
                    .push(polarity, *key, clause.is_learnt(), &body);
            }
        }
    }

    fn eliminate(&mut self, atom: Atom) -> Result<(), err::PreprocessingError> {
        let shared = self.shared;

        let (neighborhood, mut arena) = loop {
            if !shared.ok() || shared.is_eliminated(atom) {
                return Ok(());
            }

            let stamp = {
                let _atom_lock = shared.atom_locks[atom as usize].lock();
                let arena = shared.read()?;
                if shared.value_of(atom).is_some() {
                    return Ok(());
                }
                let stamp = shared.stamp(atom);
                self.collect_neighborhood(atom, &arena);
                stamp
            };

            let neighborhood = NeighborhoodLock::acquire(&shared.atom_locks, &self.neighborhood);
            let arena = shared.read()?;
            if shared.stamp(atom) != stamp {
                self.worker.stats.retries += 1;
                drop(arena);
                drop(neighborhood);
                continue;
            }
            break (neighborhood, arena);
        };

        if !shared.ok() || shared.is_eliminated(atom) || shared.value_of(atom).is_some() {
            return Ok(());
        }

        self.collect_occurrences(atom, &arena);
        let steps = self.worker.stats.anticipation_steps;
        let decision = self.worker.decide(atom, self.config)?;
        self.steps
            .fetch_add(self.worker.stats.anticipation_steps - steps, Ordering::Relaxed);

        match decision {
            Decision::Skip => return Ok(()),

            Decision::Pure(literal) => {
                self.worker.stats.pure += 1;
                return match shared.enqueue(literal) {
                    EnqueueResult::Conflict => Err(err::PreprocessingError::Unsatisfiable),
                    EnqueueResult::Queued | EnqueueResult::AlreadySet => Ok(()),
                };
            }

            Decision::Keep | Decision::Eliminate => {}
        }

        for unit in self.worker.units.drain(..) {
            match shared.enqueue(unit) {
                EnqueueResult::Conflict => return Err(err::PreprocessingError::Unsatisfiable),
                EnqueueResult::Queued => self.worker.stats.units += 1,
                EnqueueResult::AlreadySet => {}
            }
        }

        let mut touched = false;
        for (key, pivot) in self.worker.blocked.drain(..) {
            if shared.remove_clause(&arena, key, Some(pivot), &mut self.buffer) {
                self.worker.stats.blocked_clauses += 1;
                self.worker.stats.blocked_literals += self.buffer.len();
                touched = true;
            }
        }

        if decision == Decision::Keep {
            if touched {
                shared.touch_neighborhood(&self.neighborhood);
            }
            return Ok(());
        }

        drop(arena);
        let slots = shared.reserve(self.worker.resolvents.len())?;
        arena = shared.read()?;
        if !shared.ok() {
            return Ok(());
        }

        self.added.clear();
        for (index, resolvent) in slots.zip(self.worker.resolvents.drain(..)) {
            let key = ClauseKey(index as ArenaIndex);
            shared.fill(&arena, key, resolvent.literals, resolvent.learnt);
            self.added.push(key);
            self.worker.stats.resolvents += 1;
        }

        for polarity in [true, false] {
            let pivot = CLiteral::new(atom, polarity);
            for occurrence in self.worker.occurrences.side(polarity) {
                if shared.remove_clause(&arena, occurrence.key, Some(pivot), &mut self.buffer) {
                    self.worker.stats.removed_clauses += 1;
                }
            }
        }

        shared.set_eliminated(atom);
        self.worker.stats.eliminated += 1;
        shared.touch_neighborhood(&self.neighborhood);
        log::trace!(target: targets::PARALLEL, "Eliminated {atom} with {} locks", neighborhood.len());

        self.subsume_resolvents(&arena)
    }
}
