//! The extension log, used to reconstruct a model of a formula from a model of the formula after elimination.
//!
//! Each entry is a clause removed from the formula, together with the literal (of the clause) the clause was removed on.
//! An entry is a promise: if some model of the reduced formula falsifies the clause, then flipping the atom of the literal to satisfy the literal gives a model of the formula with the clause.
//!
//! So, a model is extended by applying the entries in reverse order of their addition:
//!
//! ```rust
//! # use coprocessor::db::formula::extension::ExtensionLog;
//! # use coprocessor::structures::literal::{CLiteral, Literal};
//! let x = CLiteral::new(0, true);
//! let y = CLiteral::new(1, true);
//!
//! let mut log = ExtensionLog::default();
//! // (x ∨ -y) and (-x ∨ y) were removed when eliminating x.
//! log.push(&[x, -y], x);
//! log.push(&[-x, y], -x);
//!
//! let mut valuation = vec![true, false];
//! log.extend(&mut valuation);
//! assert_eq!(valuation, vec![false, false]);
//! ```
//!
//! The log only grows during a session.

use crate::{
    misc::log::targets,
    structures::{
        clause::Clause,
        literal::{CLiteral, Literal},
    },
};

/// An entry of the extension log.
#[derive(Clone, Debug)]
pub struct ExtensionEntry {
    pivot: CLiteral,
    clause: Box<[CLiteral]>,
}

impl ExtensionEntry {
    /// The literal the clause was removed on.
    pub fn pivot(&self) -> CLiteral {
        self.pivot
    }

    /// The removed clause.
    pub fn clause(&self) -> &[CLiteral] {
        &self.clause
    }
}

/// The extension log.
#[derive(Clone, Debug, Default)]
pub struct ExtensionLog {
    entries: Vec<ExtensionEntry>,
}

impl ExtensionLog {
    /// Records `clause` as removed on `pivot`.
    pub fn push(&mut self, clause: &[CLiteral], pivot: CLiteral) {
        debug_assert!(clause.contains(&pivot));
        log::trace!(target: targets::EXTENSION, "{pivot}: {}", clause.as_dimacs(false));
        self.entries.push(ExtensionEntry {
            pivot,
            clause: clause.into(),
        });
    }

    /// A count of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// An iterator over entries, in order of addition.
    pub fn iter(&self) -> impl Iterator<Item = &ExtensionEntry> {
        self.entries.iter()
    }

    /// Revises a (total) valuation, indexed by atom, so that every logged clause is satisfied.
    pub fn extend(&self, valuation: &mut [bool]) {
        for entry in self.entries.iter().rev() {
            if !entry.clause.satisfied_on(valuation) {
                valuation[entry.pivot.atom() as usize] = entry.pivot.polarity();
            }
        }
    }
}
