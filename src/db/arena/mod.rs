/*!
The clause arena, which owns every (non-unit) clause of a session.

Clauses are allocated into the arena and accessed by a [ClauseKey], through indexing:

```rust
# use coprocessor::db::arena::ClauseArena;
# use coprocessor::structures::literal::{CLiteral, Literal};
let mut arena = ClauseArena::default();
let clause = vec![CLiteral::new(1, true), CLiteral::new(2, false)];

let key = arena.allocate(clause.clone(), false).unwrap();
assert_eq!(arena[key].literals(), clause.as_slice());

arena[key].set_deleted();
assert_eq!(arena.live().count(), 0);
```

Deletion only marks a clause.
The storage of deleted clauses is reclaimed by [compact](ClauseArena::compact), which relocates live clauses and returns the map from old keys to new keys so that holders of keys (e.g. the [formula](crate::db::formula::FormulaDB)) may [relocate](crate::db::formula::FormulaDB::relocate).
*/

mod stored_clause;
pub use stored_clause::StoredClause;

use std::ops::{Index, IndexMut};

use crate::{
    db::{ArenaIndex, ClauseKey},
    misc::log::targets,
    structures::clause::{CClause, Clause},
    types::err::{self},
};

/// The clause arena.
#[derive(Default)]
pub struct ClauseArena {
    clauses: Vec<StoredClause>,
}

impl ClauseArena {
    /// Stores `literals` as a clause, returning the key to the clause.
    ///
    /// The literals are expected to be sorted and free of duplicates.
    pub fn allocate(
        &mut self,
        literals: CClause,
        learnt: bool,
    ) -> Result<ClauseKey, err::ClauseArenaError> {
        if literals.is_empty() {
            log::error!(target: targets::CLAUSE_ARENA, "Attempt to store an empty clause");
            return Err(err::ClauseArenaError::EmptyClause);
        }
        let key = match ArenaIndex::try_from(self.clauses.len()) {
            Ok(index) if index < ArenaIndex::MAX => ClauseKey(index),
            _ => {
                log::error!(target: targets::CLAUSE_ARENA, "Arena exhausted");
                return Err(err::ClauseArenaError::StorageExhausted);
            }
        };
        log::trace!(target: targets::CLAUSE_ARENA, "{key}: {}", literals.as_dimacs(false));
        self.clauses.push(StoredClause::new(literals, learnt));
        Ok(key)
    }

    /// The count of stored clauses, live or deleted.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// An iterator over all live clauses, paired with their key.
    pub fn live(&self) -> impl Iterator<Item = (ClauseKey, &StoredClause)> {
        self.clauses
            .iter()
            .enumerate()
            .filter(|(_, clause)| !clause.is_deleted())
            .map(|(index, clause)| (ClauseKey(index as ArenaIndex), clause))
    }

    /// Drops every deleted clause, and moves live clauses to fill the gaps.
    ///
    /// Returns a map from each old key (by index) to the new key of the clause, if the clause was kept.
    pub fn compact(&mut self) -> Vec<Option<ClauseKey>> {
        let mut relocation = Vec::with_capacity(self.clauses.len());
        let mut next: ArenaIndex = 0;
        for clause in &self.clauses {
            match clause.is_deleted() {
                true => relocation.push(None),
                false => {
                    relocation.push(Some(ClauseKey(next)));
                    next += 1;
                }
            }
        }
        let dropped = self.clauses.len() - next as usize;
        self.clauses.retain(|clause| !clause.is_deleted());
        log::debug!(target: targets::CLAUSE_ARENA, "Compaction dropped {dropped} clauses");
        relocation
    }

    pub(crate) fn into_clauses(self) -> Vec<StoredClause> {
        self.clauses
    }

    pub(crate) fn from_clauses(clauses: Vec<StoredClause>) -> Self {
        ClauseArena { clauses }
    }
}

impl Index<ClauseKey> for ClauseArena {
    type Output = StoredClause;

    fn index(&self, key: ClauseKey) -> &Self::Output {
        &self.clauses[key.index()]
    }
}

impl IndexMut<ClauseKey> for ClauseArena {
    fn index_mut(&mut self, key: ClauseKey) -> &mut Self::Output {
        &mut self.clauses[key.index()]
    }
}

#[cfg(test)]
mod arena_tests {
    use super::*;
    use crate::structures::literal::{CLiteral, Literal};

    #[test]
    fn empty_clauses_are_refused() {
        let mut arena = ClauseArena::default();
        assert_eq!(
            arena.allocate(Vec::new(), false),
            Err(err::ClauseArenaError::EmptyClause)
        );
    }

    #[test]
    fn compaction_relocates() {
        let mut arena = ClauseArena::default();
        let p = CLiteral::new(0, true);
        let q = CLiteral::new(1, true);

        let a = arena.allocate(vec![p, q], false).unwrap();
        let b = arena.allocate(vec![-p, q], true).unwrap();
        let c = arena.allocate(vec![-p, -q], false).unwrap();
        arena[b].set_deleted();

        let relocation = arena.compact();
        assert_eq!(relocation[a.index()], Some(a));
        assert_eq!(relocation[b.index()], None);
        assert_eq!(relocation[c.index()], Some(b));

        assert_eq!(arena.len(), 2);
        assert_eq!(arena[b].literals(), &[-p, -q]);
    }

    #[test]
    fn strengthening_keeps_order() {
        let mut arena = ClauseArena::default();
        let literals = (0..4).map(|atom| CLiteral::new(atom, true)).collect::<Vec<_>>();
        let key = arena.allocate(literals.clone(), false).unwrap();

        assert_eq!(arena[key].strengthen(literals[1]), Ok(3));
        assert_eq!(arena[key].literals(), &[literals[0], literals[2], literals[3]]);
        assert_eq!(
            arena[key].strengthen(literals[1]),
            Err(err::ClauseArenaError::NoPivot)
        );
    }
}
