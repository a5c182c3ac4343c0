//! Anticipation of the resolvents of an atom, without building them.
//!
//! Every pair of a positive and a negative clause which is not skipped by the [limits](PairLimits) is checked:
//! - A tautology is ignored.
//! - An empty resolvent means the formula is unsatisfiable.
//! - A unit resolvent is a consequence of the formula, and is noted for the caller to enqueue.
//!   Units are enqueued only after anticipation, so later pairs are counted without them.
//!   Still, a unit whose negation was already noted means the formula is unsatisfiable, and anticipation stops at once.
//! - Otherwise, the size of the resolvent is added to the total for original or learnt resolvents.
//!
//! Further, for each clause a count is kept of the pairs the clause is part of with a resolvent which is not a tautology.
//! A clause with a count of zero is blocked on the atom.
//! Here, pairs of an original clause with a learnt clause count only toward the learnt clause.

use crate::{
    procedures::elimination::{
        gates::PairLimits,
        occurrences::Occurrences,
        resolution::{resolvent_size, unit_resolvent},
    },
    structures::{atom::Atom, literal::CLiteral},
    types::err::{self},
};

/// Totals from anticipation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Anticipation {
    /// Literals over resolvents of original clauses, excluding units.
    pub clause_literals: usize,

    /// Resolvents of original clauses, excluding units.
    pub clause_resolvents: usize,

    /// Literals over resolvents with some learnt parent, excluding units.
    pub learnt_literals: usize,

    /// Resolvents with some learnt parent, excluding units.
    pub learnt_resolvents: usize,

    /// Pairs checked.
    pub steps: usize,
}

/// Anticipates the resolvents of `atom` over `occurrences`.
///
/// On return `positive_stats` and `negative_stats` hold the count for each clause of the respective side, and `units` is extended with every unit resolvent.
pub fn anticipate(
    atom: Atom,
    occurrences: &Occurrences,
    limits: PairLimits,
    positive_stats: &mut Vec<u32>,
    negative_stats: &mut Vec<u32>,
    units: &mut Vec<CLiteral>,
) -> Result<Anticipation, err::PreprocessingError> {
    let mut anticipation = Anticipation::default();

    positive_stats.clear();
    positive_stats.resize(occurrences.positive.len(), 0);
    negative_stats.clear();
    negative_stats.resize(occurrences.negative.len(), 0);

    for (p_index, positive) in occurrences.positive.iter().enumerate() {
        let p_literals = occurrences.literals(positive);

        for (n_index, negative) in occurrences.negative.iter().enumerate() {
            if limits.skips(p_index, n_index) {
                continue;
            }
            anticipation.steps += 1;
            let n_literals = occurrences.literals(negative);

            match resolvent_size(p_literals, n_literals, atom) {
                None => continue,

                Some(0) => return Err(err::PreprocessingError::Unsatisfiable),

                Some(1) => {
                    if let Some(unit) = unit_resolvent(p_literals, n_literals, atom) {
                        if units.contains(&-unit) {
                            return Err(err::PreprocessingError::Unsatisfiable);
                        }
                        units.push(unit);
                    }
                }

                Some(size) => match positive.learnt || negative.learnt {
                    true => {
                        anticipation.learnt_literals += size;
                        anticipation.learnt_resolvents += 1;
                    }
                    false => {
                        anticipation.clause_literals += size;
                        anticipation.clause_resolvents += 1;
                    }
                },
            }

            if positive.learnt || !negative.learnt {
                positive_stats[p_index] += 1;
            }
            if negative.learnt || !positive.learnt {
                negative_stats[n_index] += 1;
            }
        }
    }

    Ok(anticipation)
}

#[cfg(test)]
mod anticipation_tests {
    use super::*;
    use crate::{db::ClauseKey, structures::literal::Literal};

    fn lits(ints: &[i32]) -> Vec<CLiteral> {
        let mut clause = ints
            .iter()
            .map(|i| CLiteral::new(i.unsigned_abs(), i.is_positive()))
            .collect::<Vec<_>>();
        clause.sort();
        clause
    }

    #[test]
    fn counts_and_blocked() {
        // (1 ∨ 2 ∨ 3), (1 ∨ -4), (-1 ∨ 4 ∨ 5)
        let mut occurrences = Occurrences::default();
        occurrences.push(true, ClauseKey(0), false, &lits(&[1, 2, 3]));
        occurrences.push(true, ClauseKey(1), false, &lits(&[1, -4]));
        occurrences.push(false, ClauseKey(2), false, &lits(&[-1, 4, 5]));

        let (mut p_stats, mut n_stats, mut units) = (Vec::default(), Vec::default(), Vec::default());
        let limits = PairLimits::unrestricted(&occurrences);
        let anticipation =
            anticipate(1, &occurrences, limits, &mut p_stats, &mut n_stats, &mut units).unwrap();

        assert_eq!(anticipation.clause_resolvents, 1);
        assert_eq!(anticipation.clause_literals, 4);
        assert_eq!(anticipation.steps, 2);
        assert_eq!(p_stats, vec![1, 0]);
        assert_eq!(n_stats, vec![1]);
        assert!(units.is_empty());
    }

    #[test]
    fn units_and_conflicts() {
        let mut occurrences = Occurrences::default();
        occurrences.push(true, ClauseKey(0), false, &lits(&[1, 2]));
        occurrences.push(false, ClauseKey(1), false, &lits(&[-1, 2]));

        let (mut p_stats, mut n_stats, mut units) = (Vec::default(), Vec::default(), Vec::default());
        let limits = PairLimits::unrestricted(&occurrences);
        let anticipation =
            anticipate(1, &occurrences, limits, &mut p_stats, &mut n_stats, &mut units).unwrap();
        assert_eq!(anticipation.clause_literals, 0);
        assert_eq!(units, vec![CLiteral::new(2, true)]);
        assert_eq!(p_stats, vec![1]);

        let mut occurrences = Occurrences::default();
        occurrences.push(true, ClauseKey(0), false, &lits(&[1]));
        occurrences.push(false, ClauseKey(1), false, &lits(&[-1]));
        let limits = PairLimits::unrestricted(&occurrences);
        assert_eq!(
            anticipate(1, &occurrences, limits, &mut p_stats, &mut n_stats, &mut units).unwrap_err(),
            err::PreprocessingError::Unsatisfiable
        );
    }

    #[test]
    fn complementary_units_stop_anticipation() {
        // (1 ∨ 2), (1 ∨ -2), (-1 ∨ 3), (-1)
        let mut occurrences = Occurrences::default();
        occurrences.push(true, ClauseKey(0), false, &lits(&[1, 2]));
        occurrences.push(true, ClauseKey(1), false, &lits(&[1, -2]));
        occurrences.push(false, ClauseKey(2), false, &lits(&[-1, 3]));
        occurrences.push(false, ClauseKey(3), false, &lits(&[-1]));

        let (mut p_stats, mut n_stats, mut units) = (Vec::default(), Vec::default(), Vec::default());
        let limits = PairLimits::unrestricted(&occurrences);
        assert_eq!(
            anticipate(1, &occurrences, limits, &mut p_stats, &mut n_stats, &mut units).unwrap_err(),
            err::PreprocessingError::Unsatisfiable
        );
        assert_eq!(units, vec![CLiteral::new(2, true)]);
    }

    #[test]
    fn learnt_pairs_count_toward_the_learnt_clause() {
        let mut occurrences = Occurrences::default();
        occurrences.push(true, ClauseKey(0), false, &lits(&[1, 2, 3]));
        occurrences.push(false, ClauseKey(1), true, &lits(&[-1, 4, 5]));

        let (mut p_stats, mut n_stats, mut units) = (Vec::default(), Vec::default(), Vec::default());
        let limits = PairLimits::unrestricted(&occurrences);
        let anticipation =
            anticipate(1, &occurrences, limits, &mut p_stats, &mut n_stats, &mut units).unwrap();
        assert_eq!(anticipation.learnt_resolvents, 1);
        assert_eq!(anticipation.clause_resolvents, 0);
        assert_eq!(p_stats, vec![0]);
        assert_eq!(n_stats, vec![1]);
    }
}
