//! Subsumption and strengthening with the resolvents of a parallel worker.
//!
//! Each resolvent *R* is checked against the clauses sharing a literal with *R*, as in the [sequential](crate::procedures::subsumption) procedure, though only a single pass is made.
//! Every resolvent which survives, and every clause strengthened, is placed on the shared queues to be run to a fixed point once the workers have finished.
//!
//! The resolvent is held in the neighborhood of the worker, and so is not revised by any other worker.
//! Other clauses may be, and so the check that *R* strengthens a clause and the removal of the literal are made under the lock of the clause.

use crate::{
    db::{formula::assignment::EnqueueResult, ClauseKey},
    misc::log::targets,
    parallel::{shared::SharedArena, worker::ParallelWorker},
    structures::clause::Clause,
    types::err::{self},
};

impl ParallelWorker<'_> {
    /// Subsumes and strengthens with each resolvent added by the worker.
    pub(super) fn subsume_resolvents(&mut self, arena: &SharedArena) -> Result<(), err::PreprocessingError> {
        for index in 0..self.added.len() {
            let key = self.added[index];
            let clause = arena.clause(key);
            if clause.is_deleted() {
                continue;
            }
            self.resolvent.clear();
            self.resolvent.extend_from_slice(&clause.body());

            self.subsume_with(key, arena);
            if clause.is_deleted() {
                continue;
            }
            self.strengthen_with(key, arena)?;
            self.shared.queue(key);
        }
        Ok(())
    }

    /// Deletes every clause subsumed by the resolvent at `key`, or the resolvent if it duplicates an earlier clause.
    fn subsume_with(&mut self, key: ClauseKey, arena: &SharedArena) {
        let anchor = match self
            .resolvent
            .iter()
            .min_by_key(|literal| arena.count(**literal))
        {
            Some(literal) => *literal,
            None => return,
        };

        self.candidates.clear();
        self.candidates.extend_from_slice(&arena.list(anchor));

        for index in 0..self.candidates.len() {
            let other = self.candidates[index];
            let other_clause = arena.clause(other);
            if other == key || other_clause.is_deleted() {
                continue;
            }

            let (subsumes, other_size) = {
                let body = other_clause.body();
                (self.resolvent.ordered_subsumes(&body), body.len())
            };
            if !subsumes {
                continue;
            }

            if other_size == self.resolvent.len() && other < key {
                if !arena.clause(key).is_learnt() {
                    self.shared.promote_clause(arena, other);
                }
                if self.shared.remove_clause(arena, key, None, &mut self.buffer) {
                    log::trace!(target: targets::PARALLEL, "{key} duplicates {other}");
                    self.worker.stats.subsumed += 1;
                }
                return;
            }

            if !other_clause.is_learnt() {
                self.shared.promote_clause(arena, key);
            }
            if self.shared.remove_clause(arena, other, None, &mut self.buffer) {
                log::trace!(target: targets::PARALLEL, "{key} subsumes {other}");
                self.worker.stats.subsumed += 1;
            }
        }
    }

    /// Strengthens every clause which may be strengthened by the resolvent at `key`.
    fn strengthen_with(&mut self, key: ClauseKey, arena: &SharedArena) -> Result<(), err::PreprocessingError> {
        for position in 0..self.resolvent.len() {
            let literal = self.resolvent[position];

            self.candidates.clear();
            self.candidates.extend_from_slice(&arena.list(-literal));

            for index in 0..self.candidates.len() {
                let other = self.candidates[index];
                let other_clause = arena.clause(other);
                if other == key || other_clause.is_deleted() {
                    continue;
                }

                let size = {
                    let mut body = other_clause.body();
                    if other_clause.is_deleted() {
                        continue;
                    }
                    match self.resolvent.strengthening_literal(&body) {
                        Some(removed) if removed == -literal => {}
                        _ => continue,
                    }
                    match body.binary_search(&-literal) {
                        Ok(position) => {
                            body.remove(position);
                        }
                        Err(_) => continue,
                    }
                    body.len()
                };

                log::trace!(target: targets::PARALLEL, "{key} strengthens {other} by {}", -literal);
                self.shared.removed_literal(arena, other, -literal);
                self.worker.stats.strengthened += 1;

                match size {
                    0 => {
                        self.shared.set_failed();
                        return Err(err::PreprocessingError::Unsatisfiable);
                    }

                    1 => {
                        let unit = other_clause.body()[0];
                        if self.shared.remove_clause(arena, other, None, &mut self.buffer) {
                            self.worker.stats.units += 1;
                            if self.shared.enqueue(unit) == EnqueueResult::Conflict {
                                return Err(err::PreprocessingError::Unsatisfiable);
                            }
                        }
                    }

                    _ => self.shared.queue(other),
                }
            }
        }
        Ok(())
    }
}
