//! Clauses, aka. a collection of literals, interpreted as the disjunction of those literals.
//!
//! The canonical representation of a clause is as a vector of literals.
//! Clauses held by the [arena](crate::db::arena) are kept sorted and free of duplicates, and the predicates here assume as much.
//!
//! ```rust
//! # use coprocessor::structures::literal::{CLiteral, Literal};
//! # use coprocessor::structures::clause::Clause;
//! let a = CLiteral::new(1, true);
//! let b = CLiteral::new(2, false);
//! let c = CLiteral::new(3, true);
//!
//! let short = vec![a, c];
//! let long = vec![a, b, c];
//!
//! assert!(short.ordered_subsumes(&long));
//! assert!(!long.ordered_subsumes(&short));
//!
//! // (-1 ∨ 3) removes -1 from (1 ∨ -2 ∨ 3).
//! let flipped = vec![-a, c];
//! assert_eq!(flipped.strengthening_literal(&long), Some(a));
//! ```
//!
//! - The empty clause is always false (never true).
//! - Single literals are identified with the clause containing that literal (aka. a 'unit' clause --- where the 'unit' is the literal).

use std::cmp::Ordering;

use crate::structures::{
    atom::Atom,
    literal::{CLiteral, Literal},
};

/// The clause trait.
pub trait Clause {
    /// A string of the clause in DIMACS form, with the terminating `0` as optional.
    fn as_dimacs(&self, zero: bool) -> String;

    /// An iterator over all literals in the clause, in order.
    fn literals(&self) -> impl Iterator<Item = &CLiteral>;

    /// The number of literals in the clause.
    fn size(&self) -> usize;

    /// An iterator over all atoms in the clause, in order.
    fn atoms(&self) -> impl Iterator<Item = Atom>;

    /// Whether every literal of the clause is a literal of `other`.
    ///
    /// Both clauses must be sorted.
    fn ordered_subsumes(&self, other: &[CLiteral]) -> bool;

    /// The literal of `other` which self-subsuming resolution with the clause would remove, if any.
    ///
    /// That is, some literal *l* of `other` such that the negation of *l* is in the clause and every other literal of the clause is in `other`.
    /// Both clauses must be sorted.
    fn strengthening_literal(&self, other: &[CLiteral]) -> Option<CLiteral>;

    /// Whether some literal of the clause is true on a total valuation, indexed by atom.
    fn satisfied_on(&self, valuation: &[bool]) -> bool;
}

impl Clause for [CLiteral] {
    fn as_dimacs(&self, zero: bool) -> String {
        let mut the_string = String::new();
        for literal in self {
            the_string.push_str(format!("{literal} ").as_str());
        }
        if zero {
            the_string += "0";
        } else {
            the_string.pop();
        }
        the_string
    }

    fn literals(&self) -> impl Iterator<Item = &CLiteral> {
        self.iter()
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn atoms(&self) -> impl Iterator<Item = Atom> {
        self.iter().map(|literal| literal.atom())
    }

    fn ordered_subsumes(&self, other: &[CLiteral]) -> bool {
        if self.len() > other.len() {
            return false;
        }
        let (mut i, mut j) = (0, 0);
        while i < self.len() && j < other.len() {
            match self[i].cmp(&other[j]) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                Ordering::Less => return false,
                Ordering::Greater => j += 1,
            }
        }
        i == self.len()
    }

    fn strengthening_literal(&self, other: &[CLiteral]) -> Option<CLiteral> {
        if self.len() > other.len() {
            return None;
        }
        let mut flipped = None;
        let (mut i, mut j) = (0, 0);
        while i < self.len() && j < other.len() {
            match self[i].atom().cmp(&other[j].atom()) {
                Ordering::Less => return None,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    if self[i].polarity() != other[j].polarity() {
                        if flipped.is_some() {
                            return None;
                        }
                        flipped = Some(other[j]);
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        match i == self.len() {
            true => flipped,
            false => None,
        }
    }

    fn satisfied_on(&self, valuation: &[bool]) -> bool {
        self.iter()
            .any(|literal| valuation[literal.atom() as usize] == literal.polarity())
    }
}

/// The canonical implementation of a clause.
pub type CClause = Vec<CLiteral>;

/// Sorts the literals of a clause and removes duplicates.
///
/// Returns true if the clause is a tautology, in which case the order of the literals is unspecified.
pub fn normalise(clause: &mut CClause) -> bool {
    clause.sort_unstable();
    clause.dedup();
    clause
        .windows(2)
        .any(|pair| pair[0].atom() == pair[1].atom())
}

impl From<CLiteral> for CClause {
    fn from(literal: CLiteral) -> Self {
        vec![literal]
    }
}
