//! Tools for building a session.

use std::io::BufRead;

use crate::{
    context::{ContextState, Coprocessor},
    db::formula::assignment::EnqueueResult,
    misc::log::targets,
    structures::{
        atom::{Atom, ATOM_MAX},
        clause::{normalise, CClause, Clause},
        literal::{CLiteral, Literal},
    },
    types::err::{self},
};

/// Ok results of adding a clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClauseOk {
    /// The clause was stored.
    Added,

    /// The clause was a unit, and was added to the assignment.
    Unit,

    /// The clause contains some literal and its negation, and so was skipped.
    Tautology,

    /// The clause is satisfied by the assignment, and so was skipped.
    Satisfied,
}

/// Methods for building a session.
impl Coprocessor {
    /// Returns a fresh atom.
    pub fn fresh_atom(&mut self) -> Result<Atom, err::FormulaError> {
        let atom = match self.formula.atom_count().try_into() {
            Ok(atom) if atom <= ATOM_MAX => atom,
            _ => {
                log::error!(target: targets::PREPROCESSING, "Atoms exhausted");
                return Err(err::FormulaError::AtomsExhausted);
            }
        };
        self.formula.ensure_atom(atom);
        Ok(atom)
    }

    /// Returns the positive literal of a fresh atom.
    pub fn fresh_literal(&mut self) -> Result<CLiteral, err::FormulaError> {
        Ok(CLiteral::new(self.fresh_atom()?, true))
    }

    /// Returns the positive literals of `count` fresh atoms.
    pub fn fresh_literals(&mut self, count: usize) -> Result<Vec<CLiteral>, err::FormulaError> {
        (0..count).map(|_| self.fresh_literal()).collect()
    }

    /// Adds an (original) clause to the session.
    ///
    /// The literals of the clause are sorted and deduplicated, and literals false on the assignment are dropped.
    /// Atoms of the clause which are not yet part of the formula are added.
    ///
    /// An empty clause, or a unit which conflicts with the assignment, marks the formula as unsatisfiable.
    ///
    /// ```rust
    /// # use coprocessor::builder::ClauseOk;
    /// # use coprocessor::context::Coprocessor;
    /// # use coprocessor::config::Config;
    /// # use coprocessor::reports::Report;
    /// # use coprocessor::structures::literal::{CLiteral, Literal};
    /// let mut the_coprocessor = Coprocessor::from_config(Config::default());
    /// let p = CLiteral::new(0, true);
    /// let q = CLiteral::new(1, false);
    ///
    /// assert_eq!(the_coprocessor.add_clause(vec![p, q]), Ok(ClauseOk::Added));
    /// assert_eq!(the_coprocessor.add_clause(vec![p, -p]), Ok(ClauseOk::Tautology));
    /// assert_eq!(the_coprocessor.add_clause(-p), Ok(ClauseOk::Unit));
    ///
    /// assert_eq!(the_coprocessor.preprocess(), Ok(Report::Satisfiable));
    /// assert_eq!(the_coprocessor.value_of(1), Some(false));
    /// ```
    pub fn add_clause(&mut self, clause: impl Into<CClause>) -> Result<ClauseOk, err::ErrorKind> {
        self.store_clause(clause.into(), false)
    }

    /// Adds a learnt clause to the session.
    ///
    /// A learnt clause is expected to be a consequence of the original clauses.
    /// Learnt clauses are resolved on only as configured, and are not required to hold when extending a model.
    pub fn add_learnt_clause(
        &mut self,
        clause: impl Into<CClause>,
    ) -> Result<ClauseOk, err::ErrorKind> {
        self.store_clause(clause.into(), true)
    }

    /// Adds the clauses of a formula in DIMACS form to the session.
    ///
    /// The DIMACS variable *n* is the atom *n - 1*.
    /// A problem line is optional, though if present the atom count is used to ensure atoms.
    ///
    /// ```rust
    /// # use coprocessor::context::Coprocessor;
    /// # use coprocessor::config::Config;
    /// # use coprocessor::reports::Report;
    /// let mut the_coprocessor = Coprocessor::from_config(Config::default());
    ///
    /// let dimacs = b"
    /// p cnf 2 4
    ///  1  2 0
    /// -1  2 0
    /// -1 -2 0
    ///  1 -2 0
    /// ";
    ///
    /// assert!(the_coprocessor.read_dimacs(dimacs.as_slice()).is_ok());
    /// assert_eq!(the_coprocessor.preprocess(), Ok(Report::Unsatisfiable));
    /// ```
    pub fn read_dimacs(&mut self, mut reader: impl BufRead) -> Result<(), err::ErrorKind> {
        let mut buffer = String::with_capacity(1024);
        let mut clause_buffer: CClause = Vec::default();
        let mut line_counter = 0;

        loop {
            buffer.clear();
            match reader.read_line(&mut buffer) {
                Ok(0) => break,
                Ok(_) => line_counter += 1,
                Err(_) => return Err(err::ErrorKind::from(err::ParseError::Line(line_counter))),
            }

            match buffer.trim_start().chars().next() {
                None | Some('c') => continue,
                Some('%') => break,

                Some('p') => {
                    let atom_count = buffer
                        .split_whitespace()
                        .nth(2)
                        .and_then(|count| count.parse::<Atom>().ok())
                        .ok_or(err::ParseError::ProblemSpecification)?;
                    if atom_count > 0 {
                        if atom_count > ATOM_MAX {
                            return Err(err::ErrorKind::from(err::FormulaError::AtomsExhausted));
                        }
                        self.formula.ensure_atom(atom_count - 1);
                    }
                }

                Some(_) => {
                    for item in buffer.split_whitespace() {
                        let value = item
                            .parse::<i64>()
                            .map_err(|_| err::ParseError::Line(line_counter))?;
                        match value {
                            0 => {
                                self.add_clause(std::mem::take(&mut clause_buffer))?;
                            }
                            _ => {
                                let atom = Atom::try_from(value.unsigned_abs() - 1)
                                    .map_err(|_| err::FormulaError::AtomsExhausted)?;
                                clause_buffer.push(CLiteral::new(atom, value.is_positive()));
                            }
                        }
                    }
                }
            }
        }

        if !clause_buffer.is_empty() {
            self.add_clause(clause_buffer)?;
        }

        log::info!(
            target: targets::PREPROCESSING,
            "Read {} atoms and {} clauses",
            self.formula.atom_count(),
            self.clause_count()
        );
        Ok(())
    }

    fn store_clause(&mut self, mut clause: CClause, learnt: bool) -> Result<ClauseOk, err::ErrorKind> {
        self.state = ContextState::Input;

        if normalise(&mut clause) {
            return Ok(ClauseOk::Tautology);
        }

        for literal in &clause {
            if literal.atom() > ATOM_MAX {
                return Err(err::ErrorKind::from(err::FormulaError::AtomsExhausted));
            }
            self.formula.ensure_atom(literal.atom());
            if self.formula.is_eliminated(literal.atom()) {
                log::error!(target: targets::PREPROCESSING, "Clause over eliminated atom: {literal}");
                return Err(err::ErrorKind::from(err::FormulaError::EliminatedAtom));
            }
        }

        let assignment = self.formula.assignment();
        if clause
            .iter()
            .any(|literal| assignment.literal_value(*literal) == Some(true))
        {
            return Ok(ClauseOk::Satisfied);
        }
        clause.retain(|literal| assignment.literal_value(*literal).is_none());

        match clause[..] {
            [] => {
                log::info!(target: targets::PREPROCESSING, "Empty clause added");
                self.formula.set_failed();
                Ok(ClauseOk::Added)
            }

            [literal] => {
                if self.formula.enqueue(literal) == EnqueueResult::Conflict {
                    log::info!(target: targets::PREPROCESSING, "Conflicting unit added: {literal}");
                }
                Ok(ClauseOk::Unit)
            }

            [..] => {
                log::trace!(target: targets::PREPROCESSING, "Clause added: {}", clause.as_dimacs(false));
                let key = self.arena.allocate(clause, learnt)?;
                self.formula.add_clause(key, &self.arena);
                Ok(ClauseOk::Added)
            }
        }
    }
}

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn fresh_atoms_count_up() {
        let mut the_coprocessor = Coprocessor::from_config(Config::default());
        assert_eq!(the_coprocessor.fresh_atom(), Ok(0));
        assert_eq!(the_coprocessor.fresh_atom(), Ok(1));
        let literals = the_coprocessor.fresh_literals(3).unwrap();
        assert_eq!(literals.iter().map(|l| l.atom()).collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(the_coprocessor.formula.atom_count(), 5);
    }

    #[test]
    fn false_literals_are_dropped() {
        let mut the_coprocessor = Coprocessor::from_config(Config::default());
        let p = CLiteral::new(0, true);
        let q = CLiteral::new(1, true);
        let r = CLiteral::new(2, true);

        assert_eq!(the_coprocessor.add_clause(-p), Ok(ClauseOk::Unit));
        assert_eq!(the_coprocessor.add_clause(vec![-p, q]), Ok(ClauseOk::Satisfied));
        assert_eq!(the_coprocessor.add_clause(vec![p, q, r]), Ok(ClauseOk::Added));
        assert_eq!(the_coprocessor.live_clauses().next(), Some([q, r].as_slice()));

        assert_eq!(the_coprocessor.add_clause(vec![p, -q]), Ok(ClauseOk::Unit));
        assert_eq!(the_coprocessor.value_of(1), Some(false));
    }

    #[test]
    fn dimacs_atoms_are_offset() {
        let mut the_coprocessor = Coprocessor::from_config(Config::default());
        let dimacs = b"c a comment\np cnf 3 2\n1 -3 0\n2\n3 0\n";
        assert_eq!(the_coprocessor.read_dimacs(dimacs.as_slice()), Ok(()));
        assert_eq!(the_coprocessor.formula.atom_count(), 3);

        let clauses = the_coprocessor.live_clauses().map(|c| c.as_dimacs(false)).collect::<Vec<_>>();
        assert_eq!(clauses, vec!["0 -2", "1 2"]);
    }

    #[test]
    fn dimacs_rejects_junk() {
        let mut the_coprocessor = Coprocessor::from_config(Config::default());
        assert_eq!(
            the_coprocessor.read_dimacs(b"1 x 0\n".as_slice()),
            Err(err::ErrorKind::Parse(err::ParseError::Line(1)))
        );
    }

    #[test]
    fn empty_clause_fails_the_formula() {
        let mut the_coprocessor = Coprocessor::from_config(Config::default());
        assert_eq!(the_coprocessor.add_clause(Vec::new()), Ok(ClauseOk::Added));
        assert!(!the_coprocessor.formula.ok());
    }
}
