/*!
Procedures over a formula.

Each procedure is a struct holding its configuration, working buffers, and statistics, with the formula and the arena given to each call.

- [Propagation](propagation::Propagation) drains the trail.
- [Subsumption](subsumption::Subsumption) removes subsumed clauses and strengthens clauses by self-subsuming resolution.
- [Elimination](elimination::BoundedVariableElimination) removes atoms by resolution.

Collaboration between procedures is through the [Technique] trait.
For example, elimination is given some technique to which every resolvent is passed, and which is run to a fixed point after each elimination.
*/

pub mod elimination;
pub mod propagation;
pub mod subsumption;

use crate::{
    db::{arena::ClauseArena, formula::FormulaDB, ClauseKey},
    types::err::{self},
};

/// A procedure which may be told of new (or revised) clauses, and run to a fixed point.
pub trait Technique {
    /// Notes the clause at `key` is new to, or has been revised in, the formula.
    fn accept_clause(&mut self, key: ClauseKey, arena: &mut ClauseArena);

    /// Applies the technique until no further application is possible.
    fn run_to_fixpoint(
        &mut self,
        formula: &mut FormulaDB,
        arena: &mut ClauseArena,
    ) -> Result<(), err::PreprocessingError>;
}
