//! A copy of the clauses containing either literal of an atom.
//!
//! Elimination of an atom works on a copy of the (live) clauses of the atom, taken before any decision is made.
//! With the copy the checks made during elimination are the same for the sequential and parallel variants, and in the parallel variant a clause lock is held only while the clause is copied.
//!
//! Literals of all clauses are held in a single buffer, and each [Occurrence] notes the span of its clause.

use crate::{
    db::ClauseKey,
    structures::literal::CLiteral,
};

/// A clause containing some literal of an atom.
#[derive(Clone, Copy, Debug)]
pub struct Occurrence {
    /// The key to the clause.
    pub key: ClauseKey,

    /// Whether the clause was learnt.
    pub learnt: bool,

    start: usize,
    end: usize,
}

impl Occurrence {
    /// The number of literals in the clause.
    pub fn size(&self) -> usize {
        self.end - self.start
    }
}

/// The clauses of an atom, split by the polarity of the atom.
#[derive(Default)]
pub struct Occurrences {
    /// Clauses containing the positive literal of the atom.
    pub positive: Vec<Occurrence>,

    /// Clauses containing the negative literal of the atom.
    pub negative: Vec<Occurrence>,

    literals: Vec<CLiteral>,
}

impl Occurrences {
    pub fn clear(&mut self) {
        self.positive.clear();
        self.negative.clear();
        self.literals.clear();
    }

    /// Copies `literals` as the clause at `key`, to the side of `polarity`.
    pub fn push(&mut self, polarity: bool, key: ClauseKey, learnt: bool, literals: &[CLiteral]) {
        let start = self.literals.len();
        self.literals.extend_from_slice(literals);
        let occurrence = Occurrence {
            key,
            learnt,
            start,
            end: self.literals.len(),
        };
        match polarity {
            true => self.positive.push(occurrence),
            false => self.negative.push(occurrence),
        }
    }

    /// The literals of `occurrence`.
    pub fn literals(&self, occurrence: &Occurrence) -> &[CLiteral] {
        &self.literals[occurrence.start..occurrence.end]
    }

    /// The clauses to the side of `polarity`.
    pub fn side(&self, polarity: bool) -> &[Occurrence] {
        match polarity {
            true => &self.positive,
            false => &self.negative,
        }
    }

    /// A count of literals over original clauses, skipping any clause for which `skip` holds.
    pub fn original_literals(&self, skip: impl Fn(bool, usize) -> bool) -> usize {
        let mut total = 0;
        for (polarity, side) in [(true, &self.positive), (false, &self.negative)] {
            for (index, occurrence) in side.iter().enumerate() {
                if !occurrence.learnt && !skip(polarity, index) {
                    total += occurrence.size();
                }
            }
        }
        total
    }

    /// A count of original and learnt clauses.
    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }
}
