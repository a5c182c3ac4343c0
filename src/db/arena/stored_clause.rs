//! A struct holding a [clause](Clause) and associated metadata.
//!
//! A [StoredClause] contains:
//! - The literals of the clause, sorted and free of duplicates.
//! - Whether the clause is learnt, i.e. derived and redundant with respect to the original clauses.
//! - Whether the clause has been deleted.
//! - Whether the clause is pending on the subsumption or strengthening queue.
//!
//! Deleted clauses keep their literals until the arena is [compacted](super::ClauseArena::compact), so stale keys may still be inspected.

use std::ops::Deref;

use crate::{
    misc::log::targets,
    structures::{
        clause::{CClause, Clause},
        literal::CLiteral,
    },
    types::err::{self},
};

/// A clause together with some metadata.
#[derive(Clone, Debug)]
pub struct StoredClause {
    literals: CClause,
    learnt: bool,
    deleted: bool,
    can_subsume: bool,
    can_strengthen: bool,
}

impl StoredClause {
    /// A fresh (live) clause.
    ///
    /// The literals are expected to be sorted and free of duplicates.
    pub fn new(literals: CClause, learnt: bool) -> Self {
        debug_assert!(literals.windows(2).all(|pair| pair[0] < pair[1]));
        StoredClause {
            literals,
            learnt,
            deleted: false,
            can_subsume: false,
            can_strengthen: false,
        }
    }

    /// Whether the clause has been deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Marks the clause as deleted.
    pub fn set_deleted(&mut self) {
        self.deleted = true;
    }

    /// Whether the clause is learnt.
    pub fn is_learnt(&self) -> bool {
        self.learnt
    }

    /// Sets whether the clause is learnt.
    pub fn set_learnt(&mut self, learnt: bool) {
        self.learnt = learnt;
    }

    pub fn can_subsume(&self) -> bool {
        self.can_subsume
    }

    pub fn set_can_subsume(&mut self, value: bool) {
        self.can_subsume = value;
    }

    pub fn can_strengthen(&self) -> bool {
        self.can_strengthen
    }

    pub fn set_can_strengthen(&mut self, value: bool) {
        self.can_strengthen = value;
    }

    /// Removes `literal` from the clause, preserving the order of the remaining literals.
    ///
    /// Returns the size of the clause after removal, or an error if the literal was not found.
    pub fn strengthen(&mut self, literal: CLiteral) -> Result<usize, err::ClauseArenaError> {
        match self.literals.binary_search(&literal) {
            Ok(position) => {
                self.literals.remove(position);
                Ok(self.literals.len())
            }
            Err(_) => {
                log::error!(target: targets::CLAUSE_ARENA, "Literal {literal} missing from {}", self.literals.as_dimacs(false));
                Err(err::ClauseArenaError::NoPivot)
            }
        }
    }

    /// The literals of the clause.
    pub fn literals(&self) -> &[CLiteral] {
        &self.literals
    }

    pub(crate) fn into_parts(self) -> (CClause, bool, bool) {
        (self.literals, self.learnt, self.deleted)
    }
}

impl Deref for StoredClause {
    type Target = [CLiteral];

    fn deref(&self) -> &Self::Target {
        &self.literals
    }
}
