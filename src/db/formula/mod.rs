/*!
The formula, as an index over the clauses of the [arena](crate::db::arena).

The formula holds:
- For each literal, an occurrence list of keys to clauses containing the literal, and a count of live clauses containing the literal.
- Lists of keys to original and learnt clauses.
- The (top-level) [assignment](assignment), including the queue of literals to propagate.
- The [extension log](extension).
- A delete timer, noting the last step at which each atom lost an occurrence.
- Whether each atom has been eliminated.
- Whether the formula is known to be unsatisfiable.

# Occurrence lists

Occurrence lists are weak: an entry may be a key to a clause which has since been deleted (or, rarely, which no longer contains the literal), and every consumer must check the clause before use.
Still, every live clause containing a literal is in the occurrence list of the literal.

The counts, by contrast, are exact.
Each count is updated when a clause is [added](FormulaDB::add_clause) or [removed](FormulaDB::removed_clause), or when a literal is [removed from a clause](FormulaDB::removed_literal).

# The delete timer

[next_step](FormulaDB::next_step) opens a step, and every atom which loses an occurrence during the step is stamped with the step.
So, [active_atoms](FormulaDB::active_atoms) gives the atoms which lost an occurrence since some step.
*/

pub mod assignment;
pub mod extension;

use assignment::{Assignment, EnqueueResult};
use extension::ExtensionLog;

use crate::{
    db::{arena::ClauseArena, ClauseKey},
    misc::log::targets,
    structures::{
        atom::Atom,
        literal::{CLiteral, Literal},
    },
};

/// The formula.
#[derive(Default)]
pub struct FormulaDB {
    pub(crate) occurrences: Vec<Vec<ClauseKey>>,
    pub(crate) literal_counts: Vec<i32>,

    pub(crate) clauses: Vec<ClauseKey>,
    pub(crate) learnts: Vec<ClauseKey>,

    pub(crate) assignment: Assignment,
    pub(crate) extension: ExtensionLog,

    pub(crate) delete_timer: Vec<u32>,
    pub(crate) timer: u32,

    pub(crate) eliminated: Vec<bool>,

    pub(crate) count_changes: Option<Vec<Atom>>,

    pub(crate) ok: bool,
}

impl FormulaDB {
    /// A fresh (empty, satisfiable) formula.
    pub fn new() -> Self {
        FormulaDB {
            ok: true,
            ..Default::default()
        }
    }

    /// A count of atoms in the formula.
    pub fn atom_count(&self) -> usize {
        self.eliminated.len()
    }

    /// Extends the formula to include `atom`, if required.
    pub fn ensure_atom(&mut self, atom: Atom) {
        let required = atom as usize + 1;
        if self.eliminated.len() < required {
            self.occurrences.resize_with(2 * required, Vec::default);
            self.literal_counts.resize(2 * required, 0);
            self.delete_timer.resize(required, 0);
            self.eliminated.resize(required, false);
            self.assignment.ensure_atom(atom);
        }
    }

    /// The occurrence list of `literal`.
    pub fn list(&self, literal: CLiteral) -> &[ClauseKey] {
        &self.occurrences[literal.index()]
    }

    /// The occurrence list of `literal`.
    pub fn list_mut(&mut self, literal: CLiteral) -> &mut Vec<ClauseKey> {
        &mut self.occurrences[literal.index()]
    }

    /// The count of live clauses containing `literal`.
    pub fn count(&self, literal: CLiteral) -> i32 {
        self.literal_counts[literal.index()]
    }

    /// The count of live clauses containing either literal of `atom`.
    pub fn atom_occurrences(&self, atom: Atom) -> usize {
        let positive = self.count(CLiteral::new(atom, true));
        let negative = self.count(CLiteral::new(atom, false));
        (positive + negative).max(0) as usize
    }

    /// Keys to original clauses, live or deleted.
    pub fn clause_keys(&self) -> &[ClauseKey] {
        &self.clauses
    }

    /// Keys to learnt clauses, live or deleted.
    pub fn learnt_keys(&self) -> &[ClauseKey] {
        &self.learnts
    }

    /// Indexes the clause at `key`.
    pub fn add_clause(&mut self, key: ClauseKey, arena: &ClauseArena) {
        let clause = &arena[key];
        for literal in clause.iter() {
            self.occurrences[literal.index()].push(key);
            self.literal_counts[literal.index()] += 1;
            self.note_count_change(literal.atom());
        }
        match clause.is_learnt() {
            true => self.learnts.push(key),
            false => self.clauses.push(key),
        }
    }

    /// Notes the clause at `key` has been deleted from the arena.
    ///
    /// The counts of each literal are updated and each atom is stamped on the delete timer.
    /// Occurrence lists are untouched.
    pub fn removed_clause(&mut self, key: ClauseKey, arena: &ClauseArena) {
        for literal in arena[key].iter() {
            self.literal_counts[literal.index()] -= 1;
            self.touch(literal.atom());
            self.note_count_change(literal.atom());
        }
    }

    /// Notes `literal` has been removed from the clause at `key`.
    ///
    /// The key is removed from the occurrence list of the literal.
    pub fn removed_literal(&mut self, key: ClauseKey, literal: CLiteral) {
        let list = &mut self.occurrences[literal.index()];
        if let Some(position) = list.iter().position(|other| *other == key) {
            list.swap_remove(position);
        }
        self.literal_counts[literal.index()] -= 1;
        self.touch(literal.atom());
        self.note_count_change(literal.atom());
    }

    /// Records `clause` in the extension log, removed on `pivot`.
    pub fn add_to_extension(&mut self, clause: &[CLiteral], pivot: CLiteral) {
        self.extension.push(clause, pivot);
    }

    /// The extension log.
    pub fn extension(&self) -> &ExtensionLog {
        &self.extension
    }

    /// Assigns the atom of `literal` the polarity of `literal`, if possible.
    ///
    /// A conflict marks the formula as unsatisfiable.
    pub fn enqueue(&mut self, literal: CLiteral) -> EnqueueResult {
        self.ensure_atom(literal.atom());
        let result = self.assignment.enqueue(literal);
        match result {
            EnqueueResult::Conflict => {
                log::debug!(target: targets::PROPAGATION, "Conflict enqueueing {literal}");
                self.set_failed();
            }
            EnqueueResult::Queued => {
                log::trace!(target: targets::PROPAGATION, "Enqueued {literal}");
            }
            EnqueueResult::AlreadySet => {}
        }
        result
    }

    /// The value of `atom`, if any.
    pub fn value_of(&self, atom: Atom) -> Option<bool> {
        self.assignment.value_of(atom)
    }

    /// The assignment of the formula.
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Whether some assigned literal has not been propagated.
    pub fn has_to_propagate(&self) -> bool {
        self.assignment.has_to_propagate()
    }

    /// Marks the formula as unsatisfiable.
    pub fn set_failed(&mut self) {
        self.ok = false;
    }

    /// Whether the formula may be satisfiable.
    pub fn ok(&self) -> bool {
        self.ok
    }

    /// Marks `atom` as eliminated.
    pub fn set_eliminated(&mut self, atom: Atom) {
        self.eliminated[atom as usize] = true;
    }

    /// Whether `atom` has been eliminated.
    pub fn is_eliminated(&self, atom: Atom) -> bool {
        self.eliminated[atom as usize]
    }

    /// Opens a fresh step on the delete timer, and returns the step.
    pub fn next_step(&mut self) -> u32 {
        self.timer += 1;
        self.timer
    }

    /// Stamps `atom` on the delete timer.
    pub fn touch(&mut self, atom: Atom) {
        self.delete_timer[atom as usize] = self.timer;
    }

    /// Extends `out` with every atom stamped at or after step `since`.
    pub fn active_atoms(&self, since: u32, out: &mut Vec<Atom>) {
        out.extend(
            self.delete_timer
                .iter()
                .enumerate()
                .filter(|(_, stamp)| **stamp >= since)
                .map(|(atom, _)| atom as Atom),
        );
    }

    /// Begins (or ends) a record of the atoms whose counts change.
    pub fn track_count_changes(&mut self, track: bool) {
        self.count_changes = match track {
            true => Some(Vec::default()),
            false => None,
        };
    }

    /// Moves the atoms whose counts changed since the last call to `out`.
    pub fn take_count_changes(&mut self, out: &mut Vec<Atom>) {
        if let Some(changes) = &mut self.count_changes {
            out.append(changes);
        }
    }

    fn note_count_change(&mut self, atom: Atom) {
        if let Some(changes) = &mut self.count_changes {
            changes.push(atom);
        }
    }

    /// Notes the (learnt) clause at `key` is now original.
    pub fn promoted_clause(&mut self, key: ClauseKey) {
        self.clauses.push(key);
    }

    /// Removes every entry for a deleted clause from the occurrence and clause lists.
    pub fn clean_occurrences(&mut self, arena: &ClauseArena) {
        let live = |key: &ClauseKey| !arena[*key].is_deleted();
        for list in self.occurrences.iter_mut() {
            list.retain(live);
        }
        self.clauses.retain(|key| live(key) && !arena[*key].is_learnt());
        self.learnts.retain(|key| live(key) && arena[*key].is_learnt());
    }

    /// Applies a relocation from [compaction](ClauseArena::compact) to every key held.
    pub fn relocate(&mut self, relocation: &[Option<ClauseKey>]) {
        let relocate_list = |list: &mut Vec<ClauseKey>| {
            *list = list
                .iter()
                .filter_map(|key| relocation.get(key.index()).copied().flatten())
                .collect();
        };
        for list in self.occurrences.iter_mut() {
            relocate_list(list);
        }
        relocate_list(&mut self.clauses);
        relocate_list(&mut self.learnts);
    }
}

#[cfg(test)]
mod formula_tests {
    use super::*;

    fn setup() -> (FormulaDB, ClauseArena, CLiteral, CLiteral) {
        let mut formula = FormulaDB::new();
        let mut arena = ClauseArena::default();
        formula.ensure_atom(1);
        let p = CLiteral::new(0, true);
        let q = CLiteral::new(1, true);
        for clause in [vec![p, q], vec![-p, q]] {
            let key = arena.allocate(clause, false).unwrap();
            formula.add_clause(key, &arena);
        }
        (formula, arena, p, q)
    }

    #[test]
    fn counts_follow_clauses() {
        let (mut formula, mut arena, p, q) = setup();
        assert_eq!(formula.count(q), 2);
        assert_eq!(formula.count(p), 1);
        assert_eq!(formula.atom_occurrences(0), 2);

        let step = formula.next_step();
        let key = formula.list(-p)[0];
        arena[key].set_deleted();
        formula.removed_clause(key, &arena);

        assert_eq!(formula.count(-p), 0);
        assert_eq!(formula.count(q), 1);
        // Lists are weak.
        assert_eq!(formula.list(-p).len(), 1);

        let mut active = Vec::default();
        formula.active_atoms(step, &mut active);
        assert_eq!(active, vec![0, 1]);

        formula.clean_occurrences(&arena);
        assert!(formula.list(-p).is_empty());
        assert_eq!(formula.clause_keys().len(), 1);
    }

    #[test]
    fn relocation_after_compaction() {
        let (mut formula, mut arena, p, q) = setup();
        let first = formula.list(p)[0];
        arena[first].set_deleted();
        formula.removed_clause(first, &arena);

        let relocation = arena.compact();
        formula.relocate(&relocation);

        assert!(formula.list(p).is_empty());
        assert_eq!(formula.list(q), &[ClauseKey(0)]);
        assert_eq!(arena[formula.list(-p)[0]].literals(), &[-p, q]);
    }

    #[test]
    fn conflict_fails_formula() {
        let (mut formula, _, p, _) = setup();
        assert_eq!(formula.enqueue(p), EnqueueResult::Queued);
        assert!(formula.ok());
        assert_eq!(formula.enqueue(-p), EnqueueResult::Conflict);
        assert!(!formula.ok());
    }
}
