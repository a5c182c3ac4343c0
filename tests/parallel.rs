use coprocessor::{config::Config, generic::minimal_pcg::MinimalPCG32, reports::Report};

mod common;
use common::{check_preprocessing, clause, coprocessor_with, random_formula};

fn with_threads(threads: usize) -> Config {
    let mut config = Config::default();
    config.threads.set(threads).unwrap();
    config
}

mod parallel {
    use super::*;

    #[test]
    fn single_worker_scenario() {
        let clauses = [clause(&[1, 2]), clause(&[-1, 2]), clause(&[1, -2])];
        let mut the_coprocessor = coprocessor_with(with_threads(1), &clauses);
        assert_eq!(the_coprocessor.preprocess(), Ok(Report::Satisfiable));
        assert_eq!(the_coprocessor.clause_count(), 0);
    }

    #[test]
    fn contradiction() {
        let clauses = [
            clause(&[1, 2]),
            clause(&[-1, -2]),
            clause(&[1, -2]),
            clause(&[-1, 2]),
        ];
        let mut the_coprocessor = coprocessor_with(with_threads(4), &clauses);
        assert_eq!(the_coprocessor.preprocess(), Ok(Report::Unsatisfiable));
    }

    #[test]
    fn verdicts_agree_across_thread_counts() {
        let mut rng = MinimalPCG32::from_u64(31);
        for _ in 0..30 {
            let formula = random_formula(&mut rng, 10, 42, 3);
            let sequential = check_preprocessing(with_threads(0), &formula, 10);
            for threads in [1, 2, 4] {
                // Each report is checked against enumeration, as is the reduced formula.
                let parallel = check_preprocessing(with_threads(threads), &formula, 10);
                assert!(!matches!(
                    (sequential, parallel),
                    (Report::Satisfiable, Report::Unsatisfiable)
                        | (Report::Unsatisfiable, Report::Satisfiable)
                ));
            }
        }
    }

    #[test]
    fn many_workers_on_a_larger_formula() {
        let mut rng = MinimalPCG32::from_u64(37);
        for _ in 0..5 {
            let formula = random_formula(&mut rng, 14, 50, 3);
            check_preprocessing(with_threads(8), &formula, 14);
        }
    }

    #[test]
    fn independent_chains() {
        // Four disjoint implication chains, so workers rarely share a neighbourhood.
        let mut formula = Vec::default();
        for chain in 0..4 {
            let base = chain * 4 + 1;
            for link in 0..3 {
                formula.push(clause(&[-(base + link), base + link + 1]));
            }
            formula.push(clause(&[base, base + 3]));
        }
        let report = check_preprocessing(with_threads(4), &formula, 16);
        assert_ne!(report, Report::Unsatisfiable);
    }
}
