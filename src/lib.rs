//! A preprocessor for boolean formulas written in conjunctive normal form.
//!
//! coprocessor simplifies a formula before (and between) calls to a satisfiability solver, so that the formula given to the solver is smaller while being satisfiable exactly when the original formula is.
//! Every model of the reduced formula can be [extended](crate::context::Coprocessor::extend_model) to a model of the original formula.
//!
//! The core techniques are:
//! - [Bounded variable elimination](crate::procedures::elimination), which removes an atom by replacing the clauses containing the atom with their resolvents, whenever this does not grow the formula.
//!   Blocked clauses are removed along the way, and AND-gate definitions are used to limit the resolvents created.
//! - [Subsumption and strengthening](crate::procedures::subsumption), which removes clauses subsumed by other clauses and removes literals by self-subsuming resolution.
//! - [Unit propagation](crate::procedures::propagation).
//!
//! Elimination is available as a sequential procedure and as a [lock-based parallel](crate::parallel) procedure, where workers eliminate atoms with disjoint neighbourhoods at the same time.
//!
//! # Orientation
//!
//! The library is designed around the structure of a [context](crate::context::Coprocessor).
//!
//! A context is built from a [configuration](crate::config), clauses are added either [programatically](crate::context::Coprocessor::add_clause) or through the [DIMACS](crate::context::Coprocessor::read_dimacs) representation of a formula, and the formula is then [preprocessed](crate::context::Coprocessor::preprocess).
//!
//! Internally, a session is a handful of databases:
//! - Clauses are stored in a [clause arena](crate::db::arena) and accessed through [keys](crate::db::ClauseKey).
//! - The [formula](crate::db::formula) indexes the arena by literal, holds the top-level assignment, and logs the clauses removed by elimination for the extension of models.
//!
//! # Examples
//!
//! + Eliminate an atom, and extend a model of the reduced formula.
//!
//! ```rust
//! # use coprocessor::config::Config;
//! # use coprocessor::context::Coprocessor;
//! # use coprocessor::reports::Report;
//! # use coprocessor::structures::clause::Clause;
//! # use coprocessor::structures::literal::Literal;
//! let mut config = Config::default();
//! config.subsumption.set(false).unwrap();
//!
//! let mut the_coprocessor = Coprocessor::from_config(config);
//!
//! let dimacs = b"
//!  1  2  3 0
//! -1 -2  3 0
//!  1 -3  4 0
//! -1  3 -4 0
//!  2 -3 -4 0
//! -2  3  4 0
//! ";
//! assert!(the_coprocessor.read_dimacs(dimacs.as_slice()).is_ok());
//!
//! let original = the_coprocessor.live_clauses().map(|c| c.to_vec()).collect::<Vec<_>>();
//! let report = the_coprocessor.preprocess().unwrap();
//! assert_ne!(report, Report::Unsatisfiable);
//!
//! // As every remaining clause is satisfied by setting each atom to true…
//! let reduced_model = vec![Some(true); 4];
//! assert!(the_coprocessor.live_clauses().all(|c| c.iter().any(|l| l.polarity())));
//!
//! // … the extension is a model of the original formula.
//! let model = the_coprocessor.extend_model(&reduced_model);
//! assert!(original.iter().all(|clause| clause.satisfied_on(&model)));
//! ```
//!
//! # Logs
//!
//! To help diagnose issues calls to [log!](log) are made throughout the library, and a variety of targets are defined in order to help narrow output to relevant parts of the library.
//!
//! The targets are listed in [misc::log].
//!
//! For example, when used with [env_logger](https://docs.rs/env_logger/latest/env_logger/):
//! - Logs related to elimination can be filtered with `RUST_LOG=elimination …` or,
//! - A summary of each round of elimination, without per-atom decisions, can be found with `RUST_LOG=elimination=info …`

#![allow(clippy::single_match)]
#![allow(clippy::collapsible_else_if)]

pub mod builder;
pub mod procedures;

pub mod config;
pub mod context;
pub mod reports;
pub mod structures;
pub mod types;

pub mod generic;

pub mod db;

pub mod misc;

pub mod parallel;
