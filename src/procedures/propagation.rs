/*!
Unit propagation over occurrence lists.

# Overview
Propagation drains the queue of assigned literals from the [assignment](crate::db::formula::assignment).
For each assigned literal *l*:
- Every live clause containing *l* is satisfied, and so deleted.
- Every live clause containing -*l* loses -*l*.
  + If the clause becomes a unit, the unit is enqueued and the clause deleted.
  + If the clause becomes empty, the formula is unsatisfiable.

After propagating *l* neither *l* nor -*l* occurs in a live clause, and so both occurrence lists are cleared.

As all assignments are top-level consequences, clauses are deleted outright and nothing is added to the extension log.
*/

use crate::{
    db::{
        arena::ClauseArena,
        formula::{assignment::EnqueueResult, FormulaDB},
    },
    misc::log::targets,
    structures::literal::CLiteral,
    types::err::{self},
};

/// Unit propagation.
#[derive(Default)]
pub struct Propagation {
    /// A count of clauses deleted as satisfied.
    pub satisfied: usize,

    /// A count of literals removed from clauses.
    pub removed_literals: usize,
}

impl Propagation {
    /// Propagates every queued literal.
    ///
    /// On a conflict the formula is marked as unsatisfiable and the literal whose propagation led to the conflict is returned.
    pub fn propagate(
        &mut self,
        formula: &mut FormulaDB,
        arena: &mut ClauseArena,
    ) -> Result<(), err::PropagationError> {
        if !formula.ok() {
            return Err(err::PropagationError::FailedFormula);
        }
        while let Some(literal) = formula.assignment.next_to_propagate() {
            self.satisfy(literal, formula, arena);
            self.falsify(-literal, formula, arena)?;
        }
        Ok(())
    }

    fn satisfy(&mut self, literal: CLiteral, formula: &mut FormulaDB, arena: &mut ClauseArena) {
        let satisfied = std::mem::take(formula.list_mut(literal));
        for key in satisfied {
            if arena[key].is_deleted() {
                continue;
            }
            arena[key].set_deleted();
            formula.removed_clause(key, arena);
            self.satisfied += 1;
        }
    }

    fn falsify(
        &mut self,
        literal: CLiteral,
        formula: &mut FormulaDB,
        arena: &mut ClauseArena,
    ) -> Result<(), err::PropagationError> {
        let falsified = std::mem::take(formula.list_mut(literal));
        for key in falsified {
            if arena[key].is_deleted() || arena[key].binary_search(&literal).is_err() {
                continue;
            }
            let size = match arena[key].strengthen(literal) {
                Ok(size) => size,
                Err(_) => continue,
            };
            formula.removed_literal(key, literal);
            self.removed_literals += 1;

            match size {
                0 => {
                    log::debug!(target: targets::PROPAGATION, "{key} falsified by {}", -literal);
                    formula.set_failed();
                    return Err(err::PropagationError::Conflict(-literal));
                }

                1 => {
                    let unit = arena[key][0];
                    arena[key].set_deleted();
                    formula.removed_clause(key, arena);
                    if formula.enqueue(unit) == EnqueueResult::Conflict {
                        return Err(err::PropagationError::Conflict(unit));
                    }
                }

                _ => {}
            }
        }
        Ok(())
    }
}
