//! Keys to clauses stored in the [clause arena](crate::db::arena).

/// The index to a clause in the arena.
pub type ArenaIndex = u32;

/// A key to access a clause stored in the clause arena.
///
/// A key is stable for the lifetime of the arena, as the arena never reuses an index for a different clause.
/// The exception is [compaction](crate::db::arena::ClauseArena::compact), after which keys must be relocated.
///
/// Keys held outside of the arena (e.g. in an occurrence list) are weak, in that the clause may since have been deleted, and every consumer should check before use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClauseKey(pub(crate) ArenaIndex);

impl ClauseKey {
    /// Extracts the index from a key.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ClauseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c_{}", self.0)
    }
}
