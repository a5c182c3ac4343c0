/*!
The context of a preprocessing session: to which clauses are added, and within which preprocessing takes place.

# Example
```rust
# use coprocessor::context::Coprocessor;
# use coprocessor::config::Config;
# use coprocessor::reports::Report;
# use coprocessor::structures::literal::{CLiteral, Literal};
let mut the_coprocessor = Coprocessor::from_config(Config::default());

let p = the_coprocessor.fresh_literal().unwrap();
let q = the_coprocessor.fresh_literal().unwrap();
let r = the_coprocessor.fresh_literal().unwrap();

// p ∨ q, ¬p ∨ r, and ¬q ∨ r.
assert!(the_coprocessor.add_clause(vec![p, q]).is_ok());
assert!(the_coprocessor.add_clause(vec![-p, r]).is_ok());
assert!(the_coprocessor.add_clause(vec![-q, r]).is_ok());

assert_eq!(the_coprocessor.preprocess(), Ok(Report::Satisfiable));
assert_eq!(the_coprocessor.clause_count(), 0);

// Any assignment to the (empty) reduced formula extends to a model of the input.
let model = the_coprocessor.extend_model(&[]);
assert!(model[r.atom() as usize]);
assert!(model[p.atom() as usize] || model[q.atom() as usize]);
```
*/

mod counters;
pub use counters::Counters;

use std::time::Instant;

use crate::{
    config::Config,
    db::{arena::ClauseArena, formula::FormulaDB},
    misc::log::targets,
    procedures::{
        elimination::BoundedVariableElimination, propagation::Propagation,
        subsumption::Subsumption,
    },
    reports::Report,
    structures::{atom::Atom, literal::CLiteral},
    types::err::{self, ErrorKind},
};

/// The state of a context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextState {
    /// The context allows input, and has not been preprocessed since the last input.
    Input,

    /// Preprocessing removed every clause.
    Satisfiable,

    /// The formula is unsatisfiable.
    Unsatisfiable,

    /// Preprocessing finished, and some clauses remain.
    Unknown,
}

/// A preprocessing session.
pub struct Coprocessor {
    /// The configuration of the session.
    pub config: Config,

    /// Counters related to the session.
    pub counters: Counters,

    /// The formula, as an index over the arena.
    pub formula: FormulaDB,

    /// The clauses of the formula.
    pub arena: ClauseArena,

    /// The state of the session.
    pub state: ContextState,

    pub(crate) propagation: Propagation,
    pub(crate) subsumption: Subsumption,
    pub(crate) elimination: BoundedVariableElimination,
}

impl Coprocessor {
    /// A fresh session, configured by `config`.
    pub fn from_config(config: Config) -> Self {
        Coprocessor {
            counters: Counters::default(),
            formula: FormulaDB::new(),
            arena: ClauseArena::default(),
            state: ContextState::Input,

            propagation: Propagation::default(),
            subsumption: Subsumption::new(&config.subsume),
            elimination: BoundedVariableElimination::new(&config),

            config,
        }
    }

    /// Preprocesses the formula.
    ///
    /// Propagation is followed by subsumption and strengthening (if configured), and then by elimination (if configured).
    /// Elimination is sequential with zero threads, and is otherwise parallel.
    ///
    /// An unsatisfiable formula is noted in the report.
    /// Errors are returned only on failure of some part of the session.
    pub fn preprocess(&mut self) -> Result<Report, ErrorKind> {
        let start = Instant::now();
        let result = self.preprocess_formula();
        self.counters.time += start.elapsed();
        self.update_counters();

        match result {
            Ok(()) => {}
            Err(err::PreprocessingError::Unsatisfiable) => self.formula.set_failed(),
            Err(e) => {
                log::error!(target: targets::PREPROCESSING, "Preprocessing failed: {e:?}");
                return Err(e.into());
            }
        }

        self.state = match self.formula.ok() {
            false => ContextState::Unsatisfiable,
            true if self.clause_count() == 0 => ContextState::Satisfiable,
            true => ContextState::Unknown,
        };

        log::info!(
            target: targets::PREPROCESSING,
            "{} after {:.2?}, with {} clauses remaining",
            self.report(),
            self.counters.time,
            self.clause_count()
        );
        Ok(self.report())
    }

    fn preprocess_formula(&mut self) -> Result<(), err::PreprocessingError> {
        if !self.formula.ok() {
            return Err(err::PreprocessingError::Unsatisfiable);
        }
        self.propagation.propagate(&mut self.formula, &mut self.arena)?;

        if self.config.subsumption.value {
            self.subsumption.accept_all(&mut self.arena);
            self.subsumption
                .subsume_strengthen(&mut self.formula, &mut self.arena)?;
            self.propagation.propagate(&mut self.formula, &mut self.arena)?;
        }

        if self.config.elimination.value {
            self.elimination.run(
                &mut self.formula,
                &mut self.arena,
                &mut self.subsumption,
                &mut self.propagation,
            )?;
        }

        self.formula.clean_occurrences(&self.arena);
        if !self.subsumption.has_work() {
            let relocation = self.arena.compact();
            self.formula.relocate(&relocation);
        }
        Ok(())
    }

    fn update_counters(&mut self) {
        self.counters.elimination = *self.elimination.stats();
        self.counters.subsumption = self.subsumption.stats;
        self.counters.satisfied = self.propagation.satisfied;
        self.counters.propagated_literals = self.propagation.removed_literals;
    }

    /// A report on the state of the session.
    pub fn report(&self) -> Report {
        match self.state {
            ContextState::Satisfiable => Report::Satisfiable,
            ContextState::Unsatisfiable => Report::Unsatisfiable,
            ContextState::Input | ContextState::Unknown => match self.formula.ok() {
                false => Report::Unsatisfiable,
                true => Report::Unknown,
            },
        }
    }

    /// The value of `atom` on the top-level assignment, if any.
    pub fn value_of(&self, atom: Atom) -> Option<bool> {
        match (atom as usize) < self.formula.atom_count() {
            true => self.formula.value_of(atom),
            false => None,
        }
    }

    /// Whether `atom` was eliminated.
    pub fn is_eliminated(&self, atom: Atom) -> bool {
        (atom as usize) < self.formula.atom_count() && self.formula.is_eliminated(atom)
    }

    /// An iterator over the literals of each live clause, original or learnt.
    pub fn live_clauses(&self) -> impl Iterator<Item = &[CLiteral]> {
        self.arena.live().map(|(_, clause)| clause.literals())
    }

    /// A count of live clauses, original or learnt.
    pub fn clause_count(&self) -> usize {
        self.arena.live().count()
    }

    /// Extends an assignment to the reduced formula to a model of the formula given to the session.
    ///
    /// Atoms assigned during preprocessing keep their value.
    /// Any other atom takes its value from `model`, if given, and is otherwise true.
    /// The extension log is then applied, most recent entry first.
    ///
    /// If `model` satisfies each live (original) clause, the valuation returned satisfies each clause given to the session.
    pub fn extend_model(&self, model: &[Option<bool>]) -> Vec<bool> {
        let mut valuation = (0..self.formula.atom_count())
            .map(|atom| {
                self.formula
                    .value_of(atom as Atom)
                    .or(model.get(atom).copied().flatten())
                    .unwrap_or(true)
            })
            .collect::<Vec<_>>();

        log::debug!(
            target: targets::EXTENSION,
            "Extending with {} entries",
            self.formula.extension().len()
        );
        self.formula.extension().extend(&mut valuation);
        valuation
    }
}
