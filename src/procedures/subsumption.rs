/*!
Subsumption and strengthening (self-subsuming resolution).

# Overview

Two queues of clause keys are kept:
- The subsumption queue, of clauses which may subsume some other clause.
- The strengthening queue, of clauses which may strengthen some other clause.

A clause is placed on each queue at most once, as noted by flags on the [stored clause](crate::db::arena::StoredClause).

[subsume_strengthen](Subsumption::subsume_strengthen) drains both queues to a fixed point:

- A clause *C* **subsumes** a clause *D* if every literal of *C* is a literal of *D*, in which case *D* is deleted.
  Candidates for *D* are found through the occurrence list of the literal of *C* with the fewest occurrences.
- A clause *S* **strengthens** a clause *O* if for some literal *l* of *S*, -*l* is a literal of *O* and every other literal of *S* is a literal of *O*.
  In this case -*l* is removed from *O*, as the resolvent of *S* and *O* on *l* subsumes *O*.
  Candidates for *O* are found through the occurrence lists of -*l*, for each *l* in *S*.

A strengthened clause may subsume or strengthen further clauses, and so is placed back on both queues.
If strengthening leaves a unit, the unit is enqueued on the assignment and the clause deleted.

# Learnt clauses

When a learnt clause subsumes an original clause the learnt clause takes the place of the original clause, and so is marked as original.

For clauses of equal size (i.e. duplicates) the clause with the larger key is deleted, and the survivor is marked as original if either clause was.
*/

use std::collections::VecDeque;

use crate::{
    config::subsumption::SubsumptionConfig,
    db::{
        arena::ClauseArena,
        formula::{assignment::EnqueueResult, FormulaDB},
        ClauseKey,
    },
    misc::log::targets,
    procedures::Technique,
    structures::{
        clause::Clause,
        literal::CLiteral,
    },
    types::err::{self},
};

/// Counts for subsumption.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubsumptionStats {
    /// Clauses deleted as subsumed.
    pub subsumed: usize,

    /// Literals removed by strengthening.
    pub strengthened: usize,

    /// Units found by strengthening.
    pub units: usize,

    /// Clause comparisons.
    pub steps: usize,
}

impl std::ops::AddAssign for SubsumptionStats {
    fn add_assign(&mut self, other: Self) {
        self.subsumed += other.subsumed;
        self.strengthened += other.strengthened;
        self.units += other.units;
        self.steps += other.steps;
    }
}

/// Subsumption and strengthening.
pub struct Subsumption {
    config: SubsumptionConfig,

    subsumption_queue: VecDeque<ClauseKey>,
    strengthening_queue: VecDeque<ClauseKey>,

    candidates: Vec<ClauseKey>,

    /// Counts for subsumption.
    pub stats: SubsumptionStats,
}

impl Subsumption {
    pub fn new(config: &SubsumptionConfig) -> Self {
        Subsumption {
            config: config.clone(),
            subsumption_queue: VecDeque::default(),
            strengthening_queue: VecDeque::default(),
            candidates: Vec::default(),
            stats: SubsumptionStats::default(),
        }
    }

    /// Whether some clause is queued.
    pub fn has_work(&self) -> bool {
        !self.subsumption_queue.is_empty() || !self.strengthening_queue.is_empty()
    }

    /// Queues every live clause.
    pub fn accept_all(&mut self, arena: &mut ClauseArena) {
        let keys = arena.live().map(|(key, _)| key).collect::<Vec<_>>();
        for key in keys {
            self.accept_clause(key, arena);
        }
    }

    /// Drains both queues to a fixed point, or until the step limit is reached.
    ///
    /// Returns an error if the formula is found to be unsatisfiable.
    pub fn subsume_strengthen(
        &mut self,
        formula: &mut FormulaDB,
        arena: &mut ClauseArena,
    ) -> Result<(), err::PreprocessingError> {
        while self.has_work() {
            if !formula.ok() {
                self.abandon(arena);
                return Err(err::PreprocessingError::Unsatisfiable);
            }
            if self.stats.steps >= self.config.step_limit.value {
                log::info!(target: targets::SUBSUMPTION, "Step limit reached");
                self.abandon(arena);
                break;
            }

            self.full_subsumption(formula, arena);

            match self.config.strengthen.value {
                true => {
                    if let Err(e) = self.full_strengthening(formula, arena) {
                        self.abandon(arena);
                        return Err(e);
                    }
                }
                false => {
                    while let Some(key) = self.strengthening_queue.pop_front() {
                        arena[key].set_can_strengthen(false);
                    }
                }
            }
        }

        log::debug!(target: targets::SUBSUMPTION, "Fixed point: {:?}", self.stats);
        Ok(())
    }

    /// Empties both queues.
    fn abandon(&mut self, arena: &mut ClauseArena) {
        while let Some(key) = self.subsumption_queue.pop_front() {
            arena[key].set_can_subsume(false);
        }
        while let Some(key) = self.strengthening_queue.pop_front() {
            arena[key].set_can_strengthen(false);
        }
    }

    fn full_subsumption(&mut self, formula: &mut FormulaDB, arena: &mut ClauseArena) {
        while let Some(key) = self.subsumption_queue.pop_front() {
            arena[key].set_can_subsume(false);
            if arena[key].is_deleted() {
                continue;
            }
            if self.stats.steps >= self.config.step_limit.value {
                return;
            }
            self.subsume_with(key, formula, arena);
        }
    }

    /// Deletes every clause subsumed by the clause at `key`.
    fn subsume_with(&mut self, key: ClauseKey, formula: &mut FormulaDB, arena: &mut ClauseArena) {
        let anchor = match arena[key]
            .iter()
            .min_by_key(|literal| formula.list(**literal).len())
        {
            Some(literal) => *literal,
            None => return,
        };

        self.candidates.clear();
        self.candidates.extend_from_slice(formula.list(anchor));

        for index in 0..self.candidates.len() {
            let other = self.candidates[index];
            if other == key || arena[other].is_deleted() {
                continue;
            }
            self.stats.steps += 1;

            let (clause, other_clause) = (&arena[key], &arena[other]);
            if clause.len() > other_clause.len() || !clause.ordered_subsumes(other_clause) {
                continue;
            }

            if clause.len() == other_clause.len() && other < key {
                log::trace!(target: targets::SUBSUMPTION, "{key} duplicates {other}");
                self.delete_subsumed(key, other, formula, arena);
                return;
            }

            log::trace!(target: targets::SUBSUMPTION, "{key} subsumes {other}");
            self.delete_subsumed(other, key, formula, arena);
        }
    }

    fn delete_subsumed(
        &mut self,
        deleted: ClauseKey,
        survivor: ClauseKey,
        formula: &mut FormulaDB,
        arena: &mut ClauseArena,
    ) {
        if !arena[deleted].is_learnt() && arena[survivor].is_learnt() {
            arena[survivor].set_learnt(false);
            formula.promoted_clause(survivor);
        }
        arena[deleted].set_deleted();
        formula.removed_clause(deleted, arena);
        self.stats.subsumed += 1;
    }

    fn full_strengthening(
        &mut self,
        formula: &mut FormulaDB,
        arena: &mut ClauseArena,
    ) -> Result<(), err::PreprocessingError> {
        while let Some(key) = self.strengthening_queue.pop_front() {
            arena[key].set_can_strengthen(false);
            if arena[key].is_deleted() {
                continue;
            }
            if self.stats.steps >= self.config.step_limit.value {
                return Ok(());
            }
            self.strengthen_with(key, formula, arena)?;
        }
        Ok(())
    }

    /// Strengthens every clause which may be strengthened by the clause at `key`.
    fn strengthen_with(
        &mut self,
        key: ClauseKey,
        formula: &mut FormulaDB,
        arena: &mut ClauseArena,
    ) -> Result<(), err::PreprocessingError> {
        for position in 0..arena[key].len() {
            let literal = arena[key][position];

            self.candidates.clear();
            self.candidates.extend_from_slice(formula.list(-literal));

            for index in 0..self.candidates.len() {
                let other = self.candidates[index];
                if other == key || arena[other].is_deleted() {
                    continue;
                }
                self.stats.steps += 1;

                let (clause, other_clause) = (&arena[key], &arena[other]);
                if clause.len() > other_clause.len() {
                    continue;
                }
                match clause.strengthening_literal(other_clause) {
                    Some(removed) if removed == -literal => {
                        log::trace!(target: targets::SUBSUMPTION, "{key} strengthens {other} by {removed}");
                        self.strengthen_clause(other, removed, formula, arena)?;
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Removes `literal` from the clause at `key`.
    fn strengthen_clause(
        &mut self,
        key: ClauseKey,
        literal: CLiteral,
        formula: &mut FormulaDB,
        arena: &mut ClauseArena,
    ) -> Result<(), err::PreprocessingError> {
        let size = arena[key].strengthen(literal)?;
        formula.removed_literal(key, literal);
        self.stats.strengthened += 1;

        match size {
            0 => {
                formula.set_failed();
                Err(err::PreprocessingError::Unsatisfiable)
            }

            1 => {
                let unit = arena[key][0];
                arena[key].set_deleted();
                formula.removed_clause(key, arena);
                self.stats.units += 1;
                match formula.enqueue(unit) {
                    EnqueueResult::Conflict => Err(err::PreprocessingError::Unsatisfiable),
                    EnqueueResult::Queued | EnqueueResult::AlreadySet => Ok(()),
                }
            }

            _ => {
                self.accept_clause(key, arena);
                Ok(())
            }
        }
    }
}

impl Technique for Subsumption {
    fn accept_clause(&mut self, key: ClauseKey, arena: &mut ClauseArena) {
        let clause = &mut arena[key];
        if clause.is_deleted() {
            return;
        }
        if !clause.can_subsume() {
            clause.set_can_subsume(true);
            self.subsumption_queue.push_back(key);
        }
        if !clause.can_strengthen() {
            clause.set_can_strengthen(true);
            self.strengthening_queue.push_back(key);
        }
    }

    fn run_to_fixpoint(
        &mut self,
        formula: &mut FormulaDB,
        arena: &mut ClauseArena,
    ) -> Result<(), err::PreprocessingError> {
        self.subsume_strengthen(formula, arena)
    }
}
