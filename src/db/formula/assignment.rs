//! The (top-level) assignment of a formula, as a valuation together with the trail of assigned literals.
//!
//! Every assignment is a consequence of the formula, and so there are no decisions or levels.
//! Literals are [enqueued](Assignment::enqueue) on the trail and the valuation at once, and the head of the queue marks the first literal which has not yet been propagated.

use crate::structures::{
    atom::Atom,
    literal::{CLiteral, Literal},
};

/// The result of enqueueing a literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueResult {
    /// The atom of the literal had no value, and now has the value of the polarity of the literal.
    Queued,

    /// The atom of the literal already had the value of the polarity of the literal.
    AlreadySet,

    /// The atom of the literal already had a value opposite to the polarity of the literal.
    Conflict,
}

/// A valuation and trail.
#[derive(Clone, Debug, Default)]
pub struct Assignment {
    valuation: Vec<Option<bool>>,
    trail: Vec<CLiteral>,
    q_head: usize,
}

impl Assignment {
    /// Extends the valuation to include `atom`, if required.
    pub fn ensure_atom(&mut self, atom: Atom) {
        if self.valuation.len() <= atom as usize {
            self.valuation.resize(atom as usize + 1, None);
        }
    }

    /// The value of `atom`, if any.
    pub fn value_of(&self, atom: Atom) -> Option<bool> {
        self.valuation.get(atom as usize).copied().flatten()
    }

    /// The value of `literal`, if the atom of the literal has a value.
    pub fn literal_value(&self, literal: CLiteral) -> Option<bool> {
        self.value_of(literal.atom())
            .map(|value| value == literal.polarity())
    }

    /// Assigns the atom of `literal` the polarity of `literal`, if the atom has no value.
    pub fn enqueue(&mut self, literal: CLiteral) -> EnqueueResult {
        self.ensure_atom(literal.atom());
        match self.valuation[literal.atom() as usize] {
            None => {
                self.valuation[literal.atom() as usize] = Some(literal.polarity());
                self.trail.push(literal);
                EnqueueResult::Queued
            }
            Some(value) if value == literal.polarity() => EnqueueResult::AlreadySet,
            Some(_) => EnqueueResult::Conflict,
        }
    }

    /// Whether some literal on the trail has not been propagated.
    pub fn has_to_propagate(&self) -> bool {
        self.q_head < self.trail.len()
    }

    /// The next literal to propagate, if any, advancing the head of the queue.
    pub fn next_to_propagate(&mut self) -> Option<CLiteral> {
        let literal = self.trail.get(self.q_head).copied();
        if literal.is_some() {
            self.q_head += 1;
        }
        literal
    }

    /// Every assigned literal, in order of assignment.
    pub fn trail(&self) -> &[CLiteral] {
        &self.trail
    }

    /// The valuation, indexed by atom.
    pub fn valuation(&self) -> &[Option<bool>] {
        &self.valuation
    }
}

#[cfg(test)]
mod assignment_tests {
    use super::*;

    #[test]
    fn enqueue_results() {
        let mut assignment = Assignment::default();
        let p = CLiteral::new(3, true);

        assert_eq!(assignment.enqueue(p), EnqueueResult::Queued);
        assert_eq!(assignment.enqueue(p), EnqueueResult::AlreadySet);
        assert_eq!(assignment.enqueue(-p), EnqueueResult::Conflict);

        assert_eq!(assignment.value_of(3), Some(true));
        assert_eq!(assignment.value_of(2), None);
        assert_eq!(assignment.literal_value(-p), Some(false));

        assert!(assignment.has_to_propagate());
        assert_eq!(assignment.next_to_propagate(), Some(p));
        assert!(!assignment.has_to_propagate());
        assert_eq!(assignment.next_to_propagate(), None);
    }
}
