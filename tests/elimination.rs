use coprocessor::{
    config::{
        elimination::{EliminationConfig, LearntResolution},
        Config,
    },
    context::Coprocessor,
    generic::minimal_pcg::MinimalPCG32,
    procedures::elimination::{AtomWorker, Decision},
    reports::Report,
    structures::{
        atom::Atom,
        clause::Clause,
        literal::{CLiteral, Literal},
    },
};

mod common;
use common::{check_preprocessing, clause, coprocessor_with, random_formula};

/// A worker holding the live clauses of `atom`.
fn worker_on(the_coprocessor: &Coprocessor, atom: Atom) -> AtomWorker {
    let mut worker = AtomWorker::default();
    for polarity in [true, false] {
        let literal = CLiteral::new(atom, polarity);
        for key in the_coprocessor.formula.list(literal) {
            let stored = &the_coprocessor.arena[*key];
            if !stored.is_deleted() {
                worker
                    .occurrences
                    .push(polarity, *key, stored.is_learnt(), stored.literals());
            }
        }
    }
    worker
}

fn no_gates() -> EliminationConfig {
    let mut config = EliminationConfig::default();
    config.gates.set(false).unwrap();
    config
}

fn without_subsumption() -> Config {
    let mut config = Config::default();
    config.subsumption.set(false).unwrap();
    config
}

mod scenarios {
    use super::*;

    #[test]
    fn unit_resolvent_and_tautology() {
        // x ∨ y, -x ∨ y, x ∨ -y
        let clauses = [clause(&[1, 2]), clause(&[-1, 2]), clause(&[1, -2])];
        let the_coprocessor = coprocessor_with(without_subsumption(), &clauses);
        let y = CLiteral::new(1, true);

        for config in [EliminationConfig::default(), no_gates()] {
            let mut worker = worker_on(&the_coprocessor, 0);
            assert_eq!(worker.decide(0, &config), Ok(Decision::Eliminate));
            assert!(worker.resolvents.is_empty());
            assert!(!worker.units.is_empty());
            assert!(worker.units.iter().all(|unit| *unit == y));
        }

        let mut the_coprocessor = the_coprocessor;
        assert_eq!(the_coprocessor.preprocess(), Ok(Report::Satisfiable));
        assert_eq!(the_coprocessor.clause_count(), 0);
        assert!(!the_coprocessor.formula.extension().is_empty());

        let model = the_coprocessor.extend_model(&[]);
        assert!(clauses.iter().all(|clause| clause.satisfied_on(&model)));
        assert!(model[1]);
    }

    #[test]
    fn blocked_partner_is_removed() {
        // a ∨ b, -a ∨ b, -a ∨ -b
        let clauses = [clause(&[1, 2]), clause(&[-1, 2]), clause(&[-1, -2])];
        let the_coprocessor = coprocessor_with(without_subsumption(), &clauses);

        let mut worker = worker_on(&the_coprocessor, 0);
        assert_eq!(worker.decide(0, &no_gates()), Ok(Decision::Eliminate));

        // Only -a ∨ -b is blocked, as a ∨ b has a (unit) resolvent.
        assert_eq!(worker.blocked.len(), 1);
        let (key, pivot) = worker.blocked[0];
        assert_eq!(the_coprocessor.arena[key].literals(), clause(&[-1, -2]).as_slice());
        assert_eq!(pivot, CLiteral::new(0, false));

        assert!(!worker.units.is_empty());
        assert!(worker.units.iter().all(|unit| *unit == CLiteral::new(1, true)));
    }

    #[test]
    fn blocked_clause_on_a_kept_atom() {
        let clauses = [
            clause(&[1, 2, 3]),
            clause(&[1, 4, 5]),
            clause(&[-1, 6, 7]),
            clause(&[-1, 8, 9]),
            clause(&[-1, -2, -4]),
        ];
        let the_coprocessor = coprocessor_with(without_subsumption(), &clauses);

        let mut worker = worker_on(&the_coprocessor, 0);
        assert_eq!(worker.decide(0, &EliminationConfig::default()), Ok(Decision::Keep));
        assert_eq!(worker.blocked.len(), 1);
        assert_eq!(worker.blocked[0].1, CLiteral::new(0, false));
        assert_eq!(worker.stats.unprofitable, 1);

        let mut unblocked = EliminationConfig::default();
        unblocked.blocked_clauses.set(false).unwrap();
        assert_eq!(worker.decide(0, &unblocked), Ok(Decision::Keep));
        assert!(worker.blocked.is_empty());
    }

    #[test]
    fn forced_elimination() {
        let clauses = [
            clause(&[1, 2, 3]),
            clause(&[1, 4, 5]),
            clause(&[-1, 6, 7]),
            clause(&[-1, 8, 9]),
        ];
        let the_coprocessor = coprocessor_with(without_subsumption(), &clauses);

        let mut worker = worker_on(&the_coprocessor, 0);
        assert_eq!(worker.decide(0, &no_gates()), Ok(Decision::Keep));

        let mut forced = no_gates();
        forced.force.set(true).unwrap();
        assert_eq!(worker.decide(0, &forced), Ok(Decision::Eliminate));
        assert_eq!(worker.resolvents.len(), 4);
        assert!(worker.resolvents.iter().all(|resolvent| resolvent.literals.len() == 4));
    }

    #[test]
    fn pure_literals() {
        let clauses = [clause(&[1, 2]), clause(&[1, -2, 3])];
        let mut the_coprocessor = coprocessor_with(without_subsumption(), &clauses);

        assert_eq!(the_coprocessor.preprocess(), Ok(Report::Satisfiable));
        assert_eq!(the_coprocessor.counters.elimination.pure, 2);
        assert_eq!(the_coprocessor.counters.elimination.eliminated, 0);
        assert_eq!(the_coprocessor.value_of(2), Some(true));
    }

    #[test]
    fn and_gate() {
        // x ↔ a ∧ b, with x used in two further clauses.
        let clauses = [
            clause(&[-1, 2]),
            clause(&[-1, 3]),
            clause(&[1, -2, -3]),
            clause(&[1, 4, 5]),
            clause(&[-1, 6, 7]),
        ];
        let the_coprocessor = coprocessor_with(without_subsumption(), &clauses);

        let mut worker = worker_on(&the_coprocessor, 0);
        assert_eq!(worker.decide(0, &EliminationConfig::default()), Ok(Decision::Eliminate));
        assert_eq!(worker.stats.gates, 1);
        // Only definition clauses are resolved with other clauses.
        let mut resolvents = worker
            .resolvents
            .iter()
            .map(|resolvent| resolvent.literals.as_dimacs(false))
            .collect::<Vec<_>>();
        resolvents.sort();
        assert_eq!(resolvents, vec!["-1 -2 5 6", "1 3 4", "2 3 4"]);
    }
}

mod learnt_clauses {
    use super::*;

    fn setup() -> Coprocessor {
        // x ∨ a and -x ∨ b original, x ∨ c and -x ∨ d learnt.
        let mut the_coprocessor =
            coprocessor_with(without_subsumption(), &[clause(&[1, 2]), clause(&[-1, 3])]);
        assert!(the_coprocessor.add_learnt_clause(clause(&[1, 4])).is_ok());
        assert!(the_coprocessor.add_learnt_clause(clause(&[-1, 5])).is_ok());
        the_coprocessor
    }

    fn resolvents_with(policy: LearntResolution) -> Vec<(String, bool)> {
        let the_coprocessor = setup();
        let mut config = no_gates();
        config.resolve_learnts.set(policy).unwrap();

        let mut worker = worker_on(&the_coprocessor, 0);
        assert_eq!(worker.decide(0, &config), Ok(Decision::Eliminate));
        let mut resolvents = worker
            .resolvents
            .iter()
            .map(|resolvent| (resolvent.literals.as_dimacs(false), resolvent.learnt))
            .collect::<Vec<_>>();
        resolvents.sort();
        resolvents
    }

    #[test]
    fn policies() {
        assert_eq!(resolvents_with(LearntResolution::Off), vec![("1 2".to_string(), false)]);

        assert_eq!(
            resolvents_with(LearntResolution::OriginalLearnt),
            vec![
                ("1 2".to_string(), false),
                ("1 4".to_string(), true),
                ("2 3".to_string(), true),
            ]
        );

        assert_eq!(
            resolvents_with(LearntResolution::All),
            vec![
                ("1 2".to_string(), false),
                ("1 4".to_string(), true),
                ("2 3".to_string(), true),
                ("3 4".to_string(), true),
            ]
        );
    }

    #[test]
    fn growth_bound() {
        let mut the_coprocessor = coprocessor_with(without_subsumption(), &[clause(&[1, 2]), clause(&[-1, 3])]);
        assert!(the_coprocessor.add_learnt_clause(clause(&[1, 4, 5])).is_ok());

        let mut config = no_gates();
        config.resolve_learnts.set(LearntResolution::All).unwrap();

        // With no growth the resolvent 2 ∨ 4 ∨ 5 is within the bound of the larger parent.
        let mut worker = worker_on(&the_coprocessor, 0);
        assert_eq!(worker.decide(0, &config), Ok(Decision::Eliminate));
        assert_eq!(worker.resolvents.len(), 2);

        // And is dropped if the growth is negative.
        config.learnt_growth.set(-1).unwrap();
        assert_eq!(worker.decide(0, &config), Ok(Decision::Eliminate));
        assert_eq!(worker.resolvents.len(), 1);
        assert!(!worker.resolvents[0].learnt);
    }
}

mod whole_formulas {
    use super::*;

    #[test]
    fn cutoff_and_unlimited() {
        let mut rng = MinimalPCG32::from_u64(17);
        for unlimited in [false, true] {
            let mut config = Config::default();
            config.bve.unlimited.set(unlimited).unwrap();
            for _ in 0..10 {
                let clauses = random_formula(&mut rng, 8, 40, 3);
                check_preprocessing(config.clone(), &clauses, 8);
            }
        }
    }

    #[test]
    fn forced_random() {
        let mut rng = MinimalPCG32::from_u64(3);
        let mut config = Config::default();
        config.bve.force.set(true).unwrap();
        for _ in 0..20 {
            let clauses = random_formula(&mut rng, 7, 24, 3);
            check_preprocessing(config.clone(), &clauses, 7);
        }
    }

    #[test]
    fn limits_leave_a_formula() {
        let mut rng = MinimalPCG32::from_u64(5);
        let mut config = Config::default();
        config.bve.step_limit.set(3).unwrap();
        config.bve.round_limit.set(1).unwrap();
        for _ in 0..10 {
            let clauses = random_formula(&mut rng, 8, 30, 3);
            check_preprocessing(config.clone(), &clauses, 8);
        }
    }
}
