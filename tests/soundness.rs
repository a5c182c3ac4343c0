use coprocessor::{
    config::{
        elimination::{HeapOrder, LearntResolution},
        Config,
    },
    generic::minimal_pcg::MinimalPCG32,
    reports::Report,
};

mod common;
use common::{brute_force, check_preprocessing, coprocessor_with, random_formula};

fn sweep(config: &Config, seed: u64, atoms: usize, clauses: usize, width: usize, rounds: usize) {
    let mut rng = MinimalPCG32::from_u64(seed);
    for _ in 0..rounds {
        let formula = random_formula(&mut rng, atoms, clauses, width);
        check_preprocessing(config.clone(), &formula, atoms);
    }
}

mod default_config {
    use super::*;

    #[test]
    fn sparse() {
        sweep(&Config::default(), 1, 10, 20, 3, 50);
    }

    #[test]
    fn near_threshold() {
        sweep(&Config::default(), 2, 10, 43, 3, 50);
    }

    #[test]
    fn dense() {
        sweep(&Config::default(), 3, 8, 60, 3, 30);
    }

    #[test]
    fn binary_clauses() {
        sweep(&Config::default(), 4, 12, 16, 2, 50);
    }

    #[test]
    fn mixed_widths() {
        let mut rng = MinimalPCG32::from_u64(5);
        for _ in 0..40 {
            let mut formula = random_formula(&mut rng, 9, 10, 2);
            formula.extend(random_formula(&mut rng, 9, 12, 3));
            formula.extend(random_formula(&mut rng, 9, 6, 4));
            check_preprocessing(Config::default(), &formula, 9);
        }
    }
}

mod options {
    use super::*;

    #[test]
    fn heap_orders() {
        for order in [HeapOrder::Minimum, HeapOrder::Maximum, HeapOrder::Random] {
            let mut config = Config::default();
            config.bve.heap_order.set(order).unwrap();
            config.random_seed.set(7).unwrap();
            sweep(&config, 6, 10, 40, 3, 20);
        }
    }

    #[test]
    fn without_heap_updates() {
        let mut config = Config::default();
        config.bve.heap_updates.set(false).unwrap();
        sweep(&config, 8, 10, 40, 3, 20);
    }

    #[test]
    fn without_blocked_clauses_or_gates() {
        let mut config = Config::default();
        config.bve.blocked_clauses.set(false).unwrap();
        config.bve.gates.set(false).unwrap();
        sweep(&config, 9, 10, 35, 3, 30);
    }

    #[test]
    fn forced_gates_and_unlimited() {
        let mut config = Config::default();
        config.bve.force_gates.set(true).unwrap();
        config.bve.unlimited.set(true).unwrap();
        sweep(&config, 10, 8, 50, 3, 20);
    }

    #[test]
    fn without_strengthening() {
        let mut config = Config::default();
        config.subsume.strengthen.set(false).unwrap();
        sweep(&config, 12, 10, 40, 3, 20);
    }
}

mod learnt_clauses {
    use super::*;

    /// Learnt clauses taken as resolvents of the formula, so that each is a consequence of the formula.
    #[test]
    fn implied_learnts() {
        let mut rng = MinimalPCG32::from_u64(13);
        for policy in [LearntResolution::Off, LearntResolution::OriginalLearnt, LearntResolution::All] {
            let mut config = Config::default();
            config.bve.resolve_learnts.set(policy).unwrap();

            for _ in 0..20 {
                let formula = random_formula(&mut rng, 9, 30, 3);
                let learnts = random_formula(&mut rng, 9, 8, 4)
                    .into_iter()
                    .filter(|learnt| implied(&formula, learnt, 9))
                    .collect::<Vec<_>>();

                let satisfiable = brute_force(&formula, 9).is_some();
                let mut the_coprocessor = coprocessor_with(config.clone(), &formula);
                for learnt in learnts {
                    assert!(the_coprocessor.add_learnt_clause(learnt).is_ok());
                }
                match the_coprocessor.preprocess() {
                    Ok(Report::Unsatisfiable) => assert!(!satisfiable),
                    Ok(Report::Satisfiable) => assert!(satisfiable),
                    Ok(Report::Unknown) => {}
                    Err(e) => panic!("{e:?}"),
                }
            }
        }
    }

    fn implied(
        formula: &[coprocessor::structures::clause::CClause],
        clause: &[coprocessor::structures::literal::CLiteral],
        atoms: usize,
    ) -> bool {
        let mut extended = formula.to_vec();
        for literal in clause {
            extended.push(vec![-*literal]);
        }
        brute_force(&extended, atoms).is_none()
    }
}
