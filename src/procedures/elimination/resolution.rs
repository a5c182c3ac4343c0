//! Resolution of a pair of (sorted) clauses on an atom.
//!
//! Both clauses are walked together, skipping any literal of the pivot atom, and literals are emitted in order.
//! As the walk is ordered, a duplicate literal immediately follows its twin and is dropped, and a complementary pair is adjacent and marks the resolvent a tautology.

use crate::{
    config::elimination::LearntResolution,
    procedures::elimination::{gates::PairLimits, occurrences::Occurrences},
    structures::{
        atom::Atom,
        clause::CClause,
        literal::{CLiteral, Literal},
    },
    types::err::{self},
};

/// Walks the resolvent of `positive` and `negative` on `atom`, passing each literal to `emit`.
///
/// Returns false, part way through, if the resolvent is a tautology.
fn merge(
    positive: &[CLiteral],
    negative: &[CLiteral],
    atom: Atom,
    mut emit: impl FnMut(CLiteral),
) -> bool {
    let (mut i, mut j) = (0, 0);
    let mut previous: Option<CLiteral> = None;

    loop {
        while i < positive.len() && positive[i].atom() == atom {
            i += 1;
        }
        while j < negative.len() && negative[j].atom() == atom {
            j += 1;
        }

        let literal = match (positive.get(i), negative.get(j)) {
            (Some(p), Some(n)) if p <= n => {
                i += 1;
                *p
            }
            (_, Some(n)) => {
                j += 1;
                *n
            }
            (Some(p), None) => {
                i += 1;
                *p
            }
            (None, None) => return true,
        };

        match previous {
            Some(last) if last == literal => continue,
            Some(last) if last.atom() == literal.atom() => return false,
            _ => {}
        }
        previous = Some(literal);
        emit(literal);
    }
}

/// The size of the resolvent of `positive` and `negative` on `atom`, or None if the resolvent is a tautology.
pub fn resolvent_size(positive: &[CLiteral], negative: &[CLiteral], atom: Atom) -> Option<usize> {
    let mut size = 0;
    match merge(positive, negative, atom, |_| size += 1) {
        true => Some(size),
        false => None,
    }
}

/// Writes the resolvent of `positive` and `negative` on `atom` to `out`, sorted.
///
/// Returns false if the resolvent is a tautology, in which case `out` holds some prefix of the walk.
pub fn resolve(positive: &[CLiteral], negative: &[CLiteral], atom: Atom, out: &mut CClause) -> bool {
    out.clear();
    merge(positive, negative, atom, |literal| out.push(literal))
}

/// The literal of a resolvent of size one.
pub fn unit_resolvent(positive: &[CLiteral], negative: &[CLiteral], atom: Atom) -> Option<CLiteral> {
    positive
        .iter()
        .chain(negative.iter())
        .find(|literal| literal.atom() != atom)
        .copied()
}

/// A resolvent, to be added to the formula.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolvent {
    pub literals: CClause,

    /// Whether some parent was learnt.
    pub learnt: bool,
}

/// Which resolvents of an atom are kept.
#[derive(Clone, Copy, Debug)]
pub struct ResolutionPolicy {
    pub learnts: LearntResolution,

    /// A resolvent with a learnt parent is dropped if larger than the larger parent by more than the growth.
    pub learnt_growth: i32,
}

impl ResolutionPolicy {
    fn admits(&self, positive_learnt: bool, negative_learnt: bool) -> bool {
        match self.learnts {
            LearntResolution::Off => !positive_learnt && !negative_learnt,
            LearntResolution::OriginalLearnt => !(positive_learnt && negative_learnt),
            LearntResolution::All => true,
        }
    }
}

/// Resolves every pair of `occurrences` on `atom` not skipped by `limits` and admitted by `policy`.
///
/// Resolvents of size two or more are written to `resolvents`, and units to `units`.
/// Returns an error if some resolvent is empty.
pub fn resolve_all(
    atom: Atom,
    occurrences: &Occurrences,
    limits: PairLimits,
    policy: ResolutionPolicy,
    resolvents: &mut Vec<Resolvent>,
    units: &mut Vec<CLiteral>,
) -> Result<(), err::PreprocessingError> {
    let mut buffer = CClause::default();

    for (p_index, positive) in occurrences.positive.iter().enumerate() {
        let p_literals = occurrences.literals(positive);

        for (n_index, negative) in occurrences.negative.iter().enumerate() {
            if limits.skips(p_index, n_index) || !policy.admits(positive.learnt, negative.learnt) {
                continue;
            }
            let n_literals = occurrences.literals(negative);

            if !resolve(p_literals, n_literals, atom, &mut buffer) {
                continue;
            }

            match buffer.len() {
                0 => return Err(err::PreprocessingError::Unsatisfiable),

                1 => units.push(buffer[0]),

                size => {
                    let learnt = positive.learnt || negative.learnt;
                    if learnt {
                        let bound = positive.size().max(negative.size()) as i64
                            + policy.learnt_growth as i64;
                        if size as i64 > bound {
                            continue;
                        }
                    }
                    resolvents.push(Resolvent {
                        literals: buffer.clone(),
                        learnt,
                    });
                }
            }
        }
    }
    Ok(())
}
