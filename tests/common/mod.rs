#![allow(dead_code)]

use coprocessor::{
    config::Config,
    context::Coprocessor,
    generic::minimal_pcg::MinimalPCG32,
    reports::Report,
    structures::{
        atom::Atom,
        clause::{CClause, Clause},
        literal::{CLiteral, Literal},
    },
};
use rand::Rng;

/// Installs a logger, if the log feature is enabled.
pub fn init_logger() {
    #[cfg(feature = "log")]
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A clause from DIMACS style integers, where the integer *n* is the atom *|n| - 1*.
pub fn clause(ints: &[i32]) -> CClause {
    ints.iter()
        .map(|i| CLiteral::new(i.unsigned_abs() - 1, i.is_positive()))
        .collect()
}

pub fn coprocessor_with(config: Config, clauses: &[CClause]) -> Coprocessor {
    init_logger();
    let mut the_coprocessor = Coprocessor::from_config(config);
    for clause in clauses {
        assert!(the_coprocessor.add_clause(clause.clone()).is_ok());
    }
    the_coprocessor
}

/// Some model of `clauses` over `atom_count` atoms, found by enumeration.
pub fn brute_force(clauses: &[CClause], atom_count: usize) -> Option<Vec<bool>> {
    assert!(atom_count < 20);
    (0..(1_u32 << atom_count)).find_map(|bits| {
        let valuation = (0..atom_count)
            .map(|atom| bits & (1 << atom) != 0)
            .collect::<Vec<_>>();
        match clauses.iter().all(|clause| clause.satisfied_on(&valuation)) {
            true => Some(valuation),
            false => None,
        }
    })
}

/// A random formula of `count` clauses, each of `width` distinct atoms taken from `atom_count` atoms.
pub fn random_formula(
    rng: &mut MinimalPCG32,
    atom_count: usize,
    count: usize,
    width: usize,
) -> Vec<CClause> {
    (0..count)
        .map(|_| {
            let mut clause: CClause = Vec::with_capacity(width);
            while clause.len() < width {
                let atom = rng.random_range(0..atom_count) as Atom;
                if clause.iter().all(|literal| literal.atom() != atom) {
                    clause.push(CLiteral::new(atom, rng.random_bool(0.5)));
                }
            }
            clause
        })
        .collect()
}

/// Preprocesses `clauses` and checks the result against enumeration.
///
/// - The report agrees with the satisfiability of the formula.
/// - If the formula is satisfiable, a model of the reduced formula exists and extends to a model of `clauses`.
pub fn check_preprocessing(config: Config, clauses: &[CClause], atom_count: usize) -> Report {
    let satisfiable = brute_force(clauses, atom_count).is_some();

    let mut the_coprocessor = coprocessor_with(config, clauses);
    let report = the_coprocessor
        .preprocess()
        .unwrap_or_else(|e| panic!("Preprocessing failed: {e:?}"));

    match report {
        Report::Unsatisfiable => assert!(!satisfiable, "Satisfiable formula reported as unsatisfiable"),
        Report::Satisfiable => assert!(satisfiable, "Unsatisfiable formula reported as satisfiable"),
        Report::Unknown => {}
    }

    if report != Report::Unsatisfiable {
        let reduced = the_coprocessor
            .live_clauses()
            .map(|clause| clause.to_vec())
            .collect::<Vec<_>>();
        let count = the_coprocessor.formula.atom_count();
        let reduced_model = brute_force(&reduced, count);
        assert_eq!(reduced_model.is_some(), satisfiable, "Reduced formula differs in satisfiability");

        if let Some(reduced_model) = reduced_model {
            let partial = reduced_model.into_iter().map(Some).collect::<Vec<_>>();
            let model = the_coprocessor.extend_model(&partial);
            for clause in clauses {
                assert!(
                    clause.satisfied_on(&model),
                    "Extended model falsifies {}",
                    clause.as_dimacs(false)
                );
            }
        }
    }

    report
}
