//! Detection of and-gate definitions.
//!
//! An atom *x* is defined as the conjunction of *a₁*, …, *aₖ* by the binary clauses (*x* ∨ -*aᵢ*) together with the clause (-*x* ∨ *a₁* ∨ … ∨ *aₖ*).
//! The same holds with the polarity of *x* flipped.
//!
//! When eliminating a defined atom, resolvents of two definition clauses are tautologies, and resolvents of two clauses outside of the definition are implied by the others.
//! So, only definition clauses need to be resolved against clauses outside of the definition.
//!
//! On finding a gate, definition clauses are moved to the front of each side of the [occurrences](Occurrences), and the limits note where definition clauses end.

use crate::{
    procedures::elimination::occurrences::{Occurrence, Occurrences},
    structures::{
        atom::Atom,
        literal::{CLiteral, Literal},
    },
};

/// Which pairs of clauses are to be resolved.
///
/// With a definition, the first `positive` (`negative`) clauses of the positive (negative) side are definition clauses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PairLimits {
    pub positive: usize,
    pub negative: usize,
    pub definition: bool,
}

impl PairLimits {
    /// Limits which skip no pair.
    pub fn unrestricted(occurrences: &Occurrences) -> Self {
        PairLimits {
            positive: occurrences.positive.len(),
            negative: occurrences.negative.len(),
            definition: false,
        }
    }

    /// Whether the pair of the positive clause at `positive` and the negative clause at `negative` is skipped.
    pub fn skips(&self, positive: usize, negative: usize) -> bool {
        let positive_definition = positive < self.positive;
        let negative_definition = negative < self.negative;
        match self.definition {
            true => positive_definition == negative_definition,
            false => !positive_definition && !negative_definition,
        }
    }
}

/// Marks on literals, valid for a single stamp.
#[derive(Default)]
pub struct LiteralMarks {
    stamps: Vec<u32>,
    stamp: u32,
}

impl LiteralMarks {
    /// Clears every mark.
    pub fn next_stamp(&mut self) {
        self.stamp = self.stamp.wrapping_add(1);
        if self.stamp == 0 {
            self.stamps.iter_mut().for_each(|stamp| *stamp = 0);
            self.stamp = 1;
        }
    }

    pub fn mark(&mut self, literal: CLiteral) {
        let index = literal.index();
        if self.stamps.len() <= index {
            self.stamps.resize(index + 1, 0);
        }
        self.stamps[index] = self.stamp;
    }

    pub fn unmark(&mut self, literal: CLiteral) {
        if let Some(stamp) = self.stamps.get_mut(literal.index()) {
            *stamp = 0;
        }
    }

    pub fn is_marked(&self, literal: CLiteral) -> bool {
        self.stamps.get(literal.index()) == Some(&self.stamp)
    }
}

/// Searches for gate definitions.
#[derive(Default)]
pub struct GateFinder {
    marks: LiteralMarks,
}

impl GateFinder {
    /// Searches for a definition of `atom`, with the output of the gate as either polarity.
    ///
    /// If found, `occurrences` are reordered so that definition clauses come first, and the limits are returned.
    pub fn find(&mut self, atom: Atom, occurrences: &mut Occurrences) -> Option<PairLimits> {
        for polarity in [true, false] {
            let output = CLiteral::new(atom, polarity);
            if let Some(binaries) = self.find_with_output(output, occurrences) {
                return Some(match polarity {
                    true => PairLimits {
                        positive: binaries,
                        negative: 1,
                        definition: true,
                    },
                    false => PairLimits {
                        positive: 1,
                        negative: binaries,
                        definition: true,
                    },
                });
            }
        }
        None
    }

    /// Searches for (`output` ∨ -*aᵢ*) clauses and a (-`output` ∨ *a₁* ∨ … ∨ *aₖ*) clause.
    ///
    /// On success, returns the count of binary clauses moved to the front of the side of `output`.
    fn find_with_output(&mut self, output: CLiteral, occurrences: &mut Occurrences) -> Option<usize> {
        let polarity = output.polarity();
        if occurrences.side(polarity).len() < 2 || occurrences.side(!polarity).is_empty() {
            return None;
        }

        // Mark each aᵢ of a binary (output ∨ -aᵢ).
        self.marks.next_stamp();
        for occurrence in occurrences.side(polarity) {
            if let Some(other) = binary_partner(occurrence, output, occurrences) {
                self.marks.mark(-other);
            }
        }

        let long = occurrences.side(!polarity).iter().position(|occurrence| {
            !occurrence.learnt
                && occurrences
                    .literals(occurrence)
                    .iter()
                    .filter(|literal| **literal != -output)
                    .all(|literal| self.marks.is_marked(*literal))
        })?;

        // Mark the literals of the long clause, and collect the binaries which match.
        self.marks.next_stamp();
        let long_occurrence = occurrences.side(!polarity)[long];
        for literal in occurrences.literals(&long_occurrence) {
            if *literal != -output {
                self.marks.mark(*literal);
            }
        }

        let mut matched = Vec::default();
        for (index, occurrence) in occurrences.side(polarity).iter().enumerate() {
            if let Some(other) = binary_partner(occurrence, output, occurrences) {
                if self.marks.is_marked(-other) {
                    self.marks.unmark(-other);
                    matched.push(index);
                }
            }
        }

        let (definitions, others) = match polarity {
            true => (&mut occurrences.positive, &mut occurrences.negative),
            false => (&mut occurrences.negative, &mut occurrences.positive),
        };
        others.swap(0, long);
        for (placed, index) in matched.iter().enumerate() {
            definitions.swap(placed, *index);
        }

        Some(matched.len())
    }
}

/// The literal other than `output` of an original binary clause.
fn binary_partner(occurrence: &Occurrence, output: CLiteral, occurrences: &Occurrences) -> Option<CLiteral> {
    if occurrence.learnt || occurrence.size() != 2 {
        return None;
    }
    occurrences
        .literals(occurrence)
        .iter()
        .find(|literal| **literal != output)
        .copied()
}

#[cfg(test)]
mod gate_tests {
    use super::*;
    use crate::db::ClauseKey;

    fn lits(ints: &[i32]) -> Vec<CLiteral> {
        let mut clause = ints
            .iter()
            .map(|i| CLiteral::new(i.unsigned_abs(), i.is_positive()))
            .collect::<Vec<_>>();
        clause.sort();
        clause
    }

    #[test]
    fn and_gate_found() {
        // 1 ↔ (2 ∧ 3), with other clauses (1 ∨ 4) and (-1 ∨ 5).
        let mut occurrences = Occurrences::default();
        occurrences.push(true, ClauseKey(0), false, &lits(&[1, 4]));
        occurrences.push(true, ClauseKey(1), false, &lits(&[1, -2]));
        occurrences.push(true, ClauseKey(2), false, &lits(&[1, -3]));
        occurrences.push(false, ClauseKey(3), false, &lits(&[-1, 5]));
        occurrences.push(false, ClauseKey(4), false, &lits(&[-1, 2, 3]));

        let mut finder = GateFinder::default();
        let limits = finder.find(1, &mut occurrences);
        assert_eq!(
            limits,
            Some(PairLimits {
                positive: 2,
                negative: 1,
                definition: true
            })
        );

        let mut definitions = occurrences.positive[..2]
            .iter()
            .map(|occurrence| occurrence.key)
            .collect::<Vec<_>>();
        definitions.sort();
        assert_eq!(definitions, vec![ClauseKey(1), ClauseKey(2)]);
        assert_eq!(occurrences.negative[0].key, ClauseKey(4));

        let limits = limits.unwrap();
        // Definition with non-definition only.
        assert!(limits.skips(0, 0));
        assert!(!limits.skips(0, 1));
        assert!(!limits.skips(2, 0));
        assert!(limits.skips(2, 1));
    }

    #[test]
    fn no_gate_without_long_clause() {
        let mut occurrences = Occurrences::default();
        occurrences.push(true, ClauseKey(0), false, &lits(&[1, -2]));
        occurrences.push(true, ClauseKey(1), false, &lits(&[1, -3]));
        occurrences.push(false, ClauseKey(2), false, &lits(&[-1, 2, 4]));

        let mut finder = GateFinder::default();
        assert_eq!(finder.find(1, &mut occurrences), None);
    }

    #[test]
    fn unrestricted_skips_nothing() {
        let mut occurrences = Occurrences::default();
        occurrences.push(true, ClauseKey(0), false, &lits(&[1, 2]));
        occurrences.push(false, ClauseKey(1), false, &lits(&[-1, 2]));
        let limits = PairLimits::unrestricted(&occurrences);
        assert!(!limits.skips(0, 0));
    }
}
