/*!
Bounded variable elimination.

# Overview

An atom *x* is eliminated by replacing every clause containing *x* or -*x* with every (non-tautological) resolvent on *x* of a clause containing *x* and a clause containing -*x*.
Each removed original clause is recorded on the [extension log](crate::db::formula::extension), so that a model of the reduced formula may be extended to a model of the formula.

Elimination is *bounded*: an atom is eliminated only if the resolvents have no more literals than the original clauses they replace (unless [forced](crate::config::elimination::EliminationConfig::force)).

# Procedure

Atoms are taken from a [scheduler](scheduler::VariableScheduler), and for each atom a [copy](occurrences::Occurrences) of the live clauses of the atom is taken.

With the copy, a [decision](AtomWorker::decide) is made:

1. An atom without clauses is skipped, and an atom whose clauses all contain the same literal of the atom is pure, and the literal is assigned.
2. Atoms with many occurrences are skipped, unless a [gate](gates) is found (and gates are forced).
3. The resolvents are [anticipated](anticipation).
   Units found are assigned, and clauses blocked on the atom are removed.
4. If the resolvents are no larger than the (remaining) original clauses, the atom is eliminated.

The decision is then applied to the formula, which differs between the sequential variant (here) and the [parallel](crate::parallel) variant.

After applying a decision, propagation and some [technique](crate::procedures::Technique) (e.g. [subsumption](crate::procedures::subsumption)) are run to a fixed point.

# Rounds

Elimination of an atom may make the elimination of some other atom profitable.
So, after the scheduler is drained every atom which lost an occurrence during the round is rescheduled, and the technique is given each clause of those atoms.
Rounds continue until no atom is touched, or the round limit is reached.
*/

pub mod anticipation;
pub mod gates;
pub mod occurrences;
pub mod resolution;
pub mod scheduler;

use crate::{
    config::{elimination::EliminationConfig, Config},
    db::{
        arena::ClauseArena,
        formula::{assignment::EnqueueResult, FormulaDB},
        ClauseKey,
    },
    misc::log::targets,
    procedures::{propagation::Propagation, Technique},
    structures::{
        atom::Atom,
        literal::{CLiteral, Literal},
    },
    types::err::{self},
};

use anticipation::anticipate;
use gates::{GateFinder, PairLimits};
use occurrences::Occurrences;
use resolution::{resolve_all, ResolutionPolicy, Resolvent};
use scheduler::VariableScheduler;

/// Counts for elimination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EliminationStats {
    /// Atoms taken from the scheduler and inspected.
    pub tested: usize,

    /// Atoms eliminated.
    pub eliminated: usize,

    /// Atoms found to be pure.
    pub pure: usize,

    /// Atoms skipped for having too many occurrences.
    pub skipped: usize,

    /// Atoms not eliminated as the resolvents were too large.
    pub unprofitable: usize,

    /// Gate definitions found.
    pub gates: usize,

    /// Clauses removed as blocked.
    pub blocked_clauses: usize,

    /// Literals over clauses removed as blocked.
    pub blocked_literals: usize,

    /// Clauses removed by elimination.
    pub removed_clauses: usize,

    /// Resolvents added.
    pub resolvents: usize,

    /// Units found by resolution.
    pub units: usize,

    /// Pairs checked during anticipation.
    pub anticipation_steps: usize,

    /// Rounds of elimination.
    pub rounds: usize,

    /// Clauses subsumed by resolvents, within a parallel worker.
    pub subsumed: usize,

    /// Literals removed by strengthening with resolvents, within a parallel worker.
    pub strengthened: usize,

    /// Atoms retried by a parallel worker after the clauses of the atom changed while the locks were taken.
    pub retries: usize,
}

impl std::ops::AddAssign for EliminationStats {
    fn add_assign(&mut self, other: Self) {
        self.tested += other.tested;
        self.eliminated += other.eliminated;
        self.pure += other.pure;
        self.skipped += other.skipped;
        self.unprofitable += other.unprofitable;
        self.gates += other.gates;
        self.blocked_clauses += other.blocked_clauses;
        self.blocked_literals += other.blocked_literals;
        self.removed_clauses += other.removed_clauses;
        self.resolvents += other.resolvents;
        self.units += other.units;
        self.anticipation_steps += other.anticipation_steps;
        self.rounds += other.rounds;
        self.subsumed += other.subsumed;
        self.strengthened += other.strengthened;
        self.retries += other.retries;
    }
}

/// What to do with an atom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Leave the atom as it is.
    Skip,

    /// Assign the (pure) literal.
    Pure(CLiteral),

    /// Assign units and remove blocked clauses, but keep the atom.
    Keep,

    /// Assign units, remove blocked clauses, add resolvents, and remove every other clause of the atom.
    Eliminate,
}

/// Buffers for, and the decision procedure on, a single atom.
///
/// Each parallel worker holds its own.
#[derive(Default)]
pub struct AtomWorker {
    /// The clauses of the atom.
    pub occurrences: Occurrences,

    /// Units to assign.
    pub units: Vec<CLiteral>,

    /// Resolvents to add, on elimination.
    pub resolvents: Vec<Resolvent>,

    /// Clauses blocked on the atom, with the literal of the atom.
    pub blocked: Vec<(ClauseKey, CLiteral)>,

    /// Counts.
    pub stats: EliminationStats,

    gates: GateFinder,
    positive_stats: Vec<u32>,
    negative_stats: Vec<u32>,
}

/// Whether an atom with the given counts of clauses is skipped, without some definition.
fn past_cutoff(positive: usize, negative: usize) -> bool {
    (positive > 10 && negative > 10) || (positive + negative > 15 && (positive > 5 || negative > 5))
}

impl AtomWorker {
    /// Decides what to do with `atom`, from the [occurrences](AtomWorker::occurrences) of the atom.
    pub fn decide(
        &mut self,
        atom: Atom,
        config: &EliminationConfig,
    ) -> Result<Decision, err::PreprocessingError> {
        self.units.clear();
        self.resolvents.clear();
        self.blocked.clear();
        self.stats.tested += 1;

        let positive = self.occurrences.positive.len();
        let negative = self.occurrences.negative.len();
        match (positive, negative) {
            (0, 0) => return Ok(Decision::Skip),
            (0, _) => return Ok(Decision::Pure(CLiteral::new(atom, false))),
            (_, 0) => return Ok(Decision::Pure(CLiteral::new(atom, true))),
            _ => {}
        }

        let heavy = !config.unlimited.value && past_cutoff(positive, negative);
        if heavy && !(config.gates.value && config.force_gates.value) {
            self.stats.skipped += 1;
            return Ok(Decision::Skip);
        }

        let gate = match config.gates.value {
            true => self.gates.find(atom, &mut self.occurrences),
            false => None,
        };
        if gate.is_some() {
            log::trace!(target: targets::ELIMINATION, "Gate on {atom}: {gate:?}");
            self.stats.gates += 1;
        } else if heavy {
            self.stats.skipped += 1;
            return Ok(Decision::Skip);
        }

        let limits = gate.unwrap_or_else(|| PairLimits::unrestricted(&self.occurrences));
        let policy = ResolutionPolicy {
            learnts: config.resolve_learnts.value,
            learnt_growth: config.learnt_growth.value,
        };

        if !config.force.value {
            let anticipation = anticipate(
                atom,
                &self.occurrences,
                limits,
                &mut self.positive_stats,
                &mut self.negative_stats,
                &mut self.units,
            )?;
            self.stats.anticipation_steps += anticipation.steps;
            log::trace!(target: targets::ELIMINATION,
                "{atom} anticipated: {} original resolvents, {} learnt resolvents over {} literals, {} units",
                anticipation.clause_resolvents,
                anticipation.learnt_resolvents,
                anticipation.learnt_literals,
                self.units.len());

            let blocking = config.blocked_clauses.value && gate.is_none();
            if blocking {
                self.collect_blocked(atom);
            }

            let (positive_stats, negative_stats) = (&self.positive_stats, &self.negative_stats);
            let original_literals = self.occurrences.original_literals(|polarity, index| {
                let count = match polarity {
                    true => positive_stats[index],
                    false => negative_stats[index],
                };
                blocking && count == 0
            });

            if anticipation.clause_literals > original_literals {
                log::trace!(target: targets::ELIMINATION,
                    "{atom} kept: {} resolvent literals against {original_literals}", anticipation.clause_literals);
                self.stats.unprofitable += 1;
                return Ok(Decision::Keep);
            }
        }

        resolve_all(
            atom,
            &self.occurrences,
            limits,
            policy,
            &mut self.resolvents,
            &mut self.units,
        )?;
        Ok(Decision::Eliminate)
    }

    fn collect_blocked(&mut self, atom: Atom) {
        for (polarity, stats) in [(true, &self.positive_stats), (false, &self.negative_stats)] {
            let pivot = CLiteral::new(atom, polarity);
            for (occurrence, count) in self.occurrences.side(polarity).iter().zip(stats.iter()) {
                if *count == 0 {
                    self.blocked.push((occurrence.key, pivot));
                }
            }
        }
    }
}

/// Bounded variable elimination.
pub struct BoundedVariableElimination {
    pub(crate) config: EliminationConfig,
    pub(crate) threads: usize,
    pub(crate) scheduler: VariableScheduler,
    pub(crate) worker: AtomWorker,
    touched: Vec<Atom>,
}

impl BoundedVariableElimination {
    pub fn new(config: &Config) -> Self {
        BoundedVariableElimination {
            config: config.bve.clone(),
            threads: config.threads.value,
            scheduler: VariableScheduler::new(
                config.bve.heap_order.value,
                config.random_seed.value,
            ),
            worker: AtomWorker::default(),
            touched: Vec::default(),
        }
    }

    /// Counts for elimination.
    pub fn stats(&self) -> &EliminationStats {
        &self.worker.stats
    }

    /// Whether the anticipation step limit has been reached.
    pub(crate) fn step_limit_reached(&self) -> bool {
        self.worker.stats.anticipation_steps >= self.config.step_limit.value
    }

    /// Eliminates atoms of the formula, in rounds.
    ///
    /// Returns an error if the formula is found to be unsatisfiable, and otherwise only on failure of some part of the procedure.
    pub fn run<T: Technique>(
        &mut self,
        formula: &mut FormulaDB,
        arena: &mut ClauseArena,
        technique: &mut T,
        propagation: &mut Propagation,
    ) -> Result<(), err::PreprocessingError> {
        formula.track_count_changes(self.config.heap_updates.value && self.threads == 0);
        let result = self.rounds(formula, arena, technique, propagation);
        formula.track_count_changes(false);

        log::info!(target: targets::ELIMINATION, "Elimination: {:?}", self.worker.stats);
        result
    }

    fn rounds<T: Technique>(
        &mut self,
        formula: &mut FormulaDB,
        arena: &mut ClauseArena,
        technique: &mut T,
        propagation: &mut Propagation,
    ) -> Result<(), err::PreprocessingError> {
        propagation.propagate(formula, arena)?;

        self.touched.clear();
        self.touched.extend(0..formula.atom_count() as Atom);
        self.scheduler.rebuild(&self.touched, formula);

        let mut since = formula.next_step();

        for _ in 0..self.config.round_limit.value {
            self.worker.stats.rounds += 1;
            match self.threads {
                0 => self.sequential_pass(formula, arena, technique, propagation)?,
                threads => crate::parallel::parallel_pass(
                    self,
                    threads,
                    formula,
                    arena,
                    technique,
                    propagation,
                )?,
            }

            if self.step_limit_reached() {
                log::info!(target: targets::ELIMINATION, "Step limit reached");
                break;
            }

            self.touched.clear();
            formula.active_atoms(since, &mut self.touched);
            if self.touched.is_empty() {
                break;
            }
            since = formula.next_step();

            for atom in &self.touched {
                for literal in [CLiteral::new(*atom, true), CLiteral::new(*atom, false)] {
                    for key in formula.list(literal) {
                        technique.accept_clause(*key, arena);
                    }
                }
            }
            technique.run_to_fixpoint(formula, arena)?;
            propagation.propagate(formula, arena)?;

            self.scheduler.rebuild(&self.touched, formula);
            if !self.scheduler.has_work() {
                break;
            }
            log::debug!(target: targets::ELIMINATION, "Round with {} atoms", self.scheduler.len());
        }

        Ok(())
    }

    fn sequential_pass<T: Technique>(
        &mut self,
        formula: &mut FormulaDB,
        arena: &mut ClauseArena,
        technique: &mut T,
        propagation: &mut Propagation,
    ) -> Result<(), err::PreprocessingError> {
        while let Some(atom) = self.scheduler.next() {
            if self.step_limit_reached() {
                self.scheduler.clear();
                break;
            }
            self.eliminate_atom(atom, formula, arena, technique, propagation)?;
            self.refresh_scheduler(formula);
        }
        Ok(())
    }

    /// Rekeys every atom whose count of occurrences has changed.
    fn refresh_scheduler(&mut self, formula: &mut FormulaDB) {
        self.touched.clear();
        formula.take_count_changes(&mut self.touched);
        for atom in &self.touched {
            self.scheduler
                .update(*atom, formula.atom_occurrences(*atom));
        }
    }

    /// Decides on and applies the decision for `atom`, then runs propagation and the technique to a fixed point.
    fn eliminate_atom<T: Technique>(
        &mut self,
        atom: Atom,
        formula: &mut FormulaDB,
        arena: &mut ClauseArena,
        technique: &mut T,
        propagation: &mut Propagation,
    ) -> Result<(), err::PreprocessingError> {
        if !formula.ok() {
            return Err(err::PreprocessingError::Unsatisfiable);
        }
        if formula.is_eliminated(atom) || formula.value_of(atom).is_some() {
            return Ok(());
        }

        let worker = &mut self.worker;
        worker.occurrences.clear();
        for polarity in [true, false] {
            let literal = CLiteral::new(atom, polarity);
            for key in formula.list(literal) {
                let clause = &arena[*key];
                if clause.is_deleted() || clause.binary_search(&literal).is_err() {
                    continue;
                }
                worker
                    .occurrences
                    .push(polarity, *key, clause.is_learnt(), clause.literals());
            }
        }

        let decision = worker.decide(atom, &self.config)?;
        apply_decision(atom, decision, worker, formula, arena, technique)?;

        if decision != Decision::Skip {
            propagation.propagate(formula, arena)?;
            technique.run_to_fixpoint(formula, arena)?;
            propagation.propagate(formula, arena)?;
        }
        Ok(())
    }
}

/// Applies `decision` on `atom` to the formula.
fn apply_decision<T: Technique>(
    atom: Atom,
    decision: Decision,
    worker: &mut AtomWorker,
    formula: &mut FormulaDB,
    arena: &mut ClauseArena,
    technique: &mut T,
) -> Result<(), err::PreprocessingError> {
    match decision {
        Decision::Skip => return Ok(()),

        Decision::Pure(literal) => {
            log::trace!(target: targets::ELIMINATION, "Pure {literal}");
            worker.stats.pure += 1;
            return match formula.enqueue(literal) {
                EnqueueResult::Conflict => Err(err::PreprocessingError::Unsatisfiable),
                EnqueueResult::Queued | EnqueueResult::AlreadySet => Ok(()),
            };
        }

        Decision::Keep | Decision::Eliminate => {}
    }

    for unit in worker.units.drain(..) {
        match formula.enqueue(unit) {
            EnqueueResult::Conflict => return Err(err::PreprocessingError::Unsatisfiable),
            EnqueueResult::Queued => worker.stats.units += 1,
            EnqueueResult::AlreadySet => {}
        }
    }

    for (key, pivot) in worker.blocked.drain(..) {
        if arena[key].is_deleted() {
            continue;
        }
        worker.stats.blocked_clauses += 1;
        worker.stats.blocked_literals += arena[key].len();
        remove_clause(key, pivot, formula, arena);
    }

    if decision == Decision::Keep {
        return Ok(());
    }

    for resolvent in worker.resolvents.drain(..) {
        let key = arena.allocate(resolvent.literals, resolvent.learnt)?;
        formula.add_clause(key, arena);
        technique.accept_clause(key, arena);
        worker.stats.resolvents += 1;
    }

    for polarity in [true, false] {
        let pivot = CLiteral::new(atom, polarity);
        for occurrence in worker.occurrences.side(polarity) {
            if arena[occurrence.key].is_deleted() {
                continue;
            }
            worker.stats.removed_clauses += 1;
            remove_clause(occurrence.key, pivot, formula, arena);
        }
    }

    formula.set_eliminated(atom);
    worker.stats.eliminated += 1;
    log::trace!(target: targets::ELIMINATION, "Eliminated {atom}");
    Ok(())
}

/// Deletes the clause at `key`, recording the clause on the extension log if original.
fn remove_clause(key: ClauseKey, pivot: CLiteral, formula: &mut FormulaDB, arena: &mut ClauseArena) {
    let clause = &mut arena[key];
    clause.set_deleted();
    if !clause.is_learnt() {
        formula.add_to_extension(clause.literals(), pivot);
    }
    formula.removed_clause(key, arena);
}

#[cfg(test)]
mod elimination_tests {
    use super::*;
    use crate::procedures::subsumption::Subsumption;

    fn build(clauses: &[&[i32]]) -> (FormulaDB, ClauseArena) {
        let mut formula = FormulaDB::new();
        let mut arena = ClauseArena::default();
        for clause in clauses {
            let mut literals = clause
                .iter()
                .map(|i| CLiteral::new(i.unsigned_abs(), i.is_positive()))
                .collect::<Vec<_>>();
            literals.sort();
            for literal in &literals {
                formula.ensure_atom(literal.atom());
            }
            let key = arena.allocate(literals, false).unwrap();
            formula.add_clause(key, &arena);
        }
        (formula, arena)
    }

    fn run(
        config: &Config,
        formula: &mut FormulaDB,
        arena: &mut ClauseArena,
    ) -> Result<EliminationStats, err::PreprocessingError> {
        let mut bve = BoundedVariableElimination::new(config);
        let mut subsumption = Subsumption::new(&config.subsume);
        let mut propagation = Propagation::default();
        bve.run(formula, arena, &mut subsumption, &mut propagation)?;
        Ok(*bve.stats())
    }

    #[test]
    fn cutoff() {
        assert!(past_cutoff(11, 11));
        assert!(past_cutoff(10, 10));
        assert!(past_cutoff(6, 10));
        assert!(past_cutoff(2, 14));
        assert!(!past_cutoff(5, 10));
        assert!(!past_cutoff(8, 7));
        assert!(!past_cutoff(3, 3));
    }

    #[test]
    fn cycle_is_eliminated() {
        // 1 → 2 → 3 → 1
        let (mut formula, mut arena) = build(&[&[-1, 2], &[-2, 3], &[-3, 1]]);
        let stats = run(&Config::default(), &mut formula, &mut arena).unwrap();
        assert!(stats.eliminated >= 1);
        assert_eq!(arena.live().count(), 0);
        assert!(formula.extension().len() >= 2);

        let mut valuation = vec![false, true, false, true];
        formula.extension().extend(&mut valuation);
        assert!(valuation[1] == valuation[2] && valuation[2] == valuation[3]);
    }

    #[test]
    fn pure_literal_is_assigned() {
        let (mut formula, mut arena) = build(&[&[1, 2], &[1, -2, 3]]);
        let mut worker = AtomWorker::default();
        for key in formula.list(CLiteral::new(1, true)).to_vec() {
            worker.occurrences.push(true, key, false, arena[key].literals());
        }
        assert_eq!(
            worker.decide(1, &EliminationConfig::default()),
            Ok(Decision::Pure(CLiteral::new(1, true)))
        );

        let stats = run(&Config::default(), &mut formula, &mut arena).unwrap();
        assert!(stats.pure >= 1);
        assert_eq!(arena.live().count(), 0);
    }

    #[test]
    fn contradiction_found() {
        let (mut formula, mut arena) = build(&[&[1, 2], &[1, -2], &[-1, 2], &[-1, -2]]);
        assert_eq!(
            run(&Config::default(), &mut formula, &mut arena),
            Err(err::PreprocessingError::Unsatisfiable)
        );
        assert!(!formula.ok());
    }

    #[test]
    fn unprofitable_atom_is_kept() {
        // Each of the four resolvents on 1 has four literals.
        let (mut formula, mut arena) = build(&[
            &[1, 2, 3],
            &[1, 4, 5],
            &[-1, 6, 7],
            &[-1, 8, 9],
        ]);
        let mut worker = AtomWorker::default();
        for polarity in [true, false] {
            for key in formula.list(CLiteral::new(1, polarity)).to_vec() {
                worker.occurrences.push(polarity, key, false, arena[key].literals());
            }
        }
        assert_eq!(
            worker.decide(1, &EliminationConfig::default()),
            Ok(Decision::Keep)
        );

        let mut config = EliminationConfig::default();
        config.force.value = true;
        assert_eq!(worker.decide(1, &config), Ok(Decision::Eliminate));
        assert_eq!(worker.resolvents.len(), 4);

        formula.set_failed();
        assert!(run(&Config::default(), &mut formula, &mut arena).is_err());
    }
}
