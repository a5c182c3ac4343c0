//! Error types used in the library.
//!
//! - Most of these are very unlikely to occur during use.
//! - Some of these are internally expected --- e.g. a propagation conflict is used to control the flow of elimination, and is reported as an unsatisfiable formula rather than an error.
//! - Some are external --- e.g. an option set outside of its range.
//!
//! Names of the error enums --- for the most part --- overlap with corresponding structs.
//  As such, throughout the library err::{self} is often used to prefix use of the types with `err::`.

use crate::structures::literal::CLiteral;

/// The general error type, wrapping the error of some part of the library.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    ClauseArena(ClauseArenaError),
    Config(ConfigError),
    Formula(FormulaError),
    Parallel(ParallelError),
    Parse(ParseError),
    Preprocessing(PreprocessingError),
    Propagation(PropagationError),
}

/// Errors in the clause arena.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClauseArenaError {
    /// Attempt to store the empty clause.
    EmptyClause,

    /// The arena has no more keys to give.
    StorageExhausted,

    /// A key without a clause.
    Missing,

    /// A literal to be removed from a clause is not in the clause.
    NoPivot,
}

impl From<ClauseArenaError> for ErrorKind {
    fn from(e: ClauseArenaError) -> Self {
        ErrorKind::ClauseArena(e)
    }
}

/// Errors when configuring a session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// A value outside of the bounds of an option, with the name of the option.
    OutOfRange(&'static str),
}

impl From<ConfigError> for ErrorKind {
    fn from(e: ConfigError) -> Self {
        ErrorKind::Config(e)
    }
}

/// Errors when building a formula.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FormulaError {
    /// There are no more fresh atoms.
    AtomsExhausted,

    /// A clause mentions an eliminated atom.
    EliminatedAtom,
}

impl From<FormulaError> for ErrorKind {
    fn from(e: FormulaError) -> Self {
        ErrorKind::Formula(e)
    }
}

/// Errors in the parallel variant of elimination.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParallelError {
    /// A lock was poisoned by a panicking worker.
    PoisonedLock,

    /// Some worker panicked.
    WorkerPanic,
}

impl From<ParallelError> for ErrorKind {
    fn from(e: ParallelError) -> Self {
        ErrorKind::Parallel(e)
    }
}

/// Errors when parsing a DIMACS input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// Some issue with the problem specification in a DIMACS input.
    ProblemSpecification,

    /// Some unspecific problem at a specific line.
    Line(usize),
}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        ErrorKind::Parse(e)
    }
}

/// Noted errors during preprocessing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PreprocessingError {
    /// The formula was found to be unsatisfiable.
    Unsatisfiable,

    /// Some clause could not be stored.
    ClauseArena(ClauseArenaError),

    /// Elimination was run in parallel, and some part of the parallel machinery failed.
    Parallel(ParallelError),
}

impl From<PreprocessingError> for ErrorKind {
    fn from(e: PreprocessingError) -> Self {
        ErrorKind::Preprocessing(e)
    }
}

impl From<ClauseArenaError> for PreprocessingError {
    fn from(e: ClauseArenaError) -> Self {
        PreprocessingError::ClauseArena(e)
    }
}

impl From<ParallelError> for PreprocessingError {
    fn from(e: ParallelError) -> Self {
        PreprocessingError::Parallel(e)
    }
}

/// Noted errors during propagation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PropagationError {
    /// Propagation of the literal falsified some clause.
    Conflict(CLiteral),

    /// Propagation was called on a formula already known to be unsatisfiable.
    FailedFormula,
}

impl From<PropagationError> for ErrorKind {
    fn from(e: PropagationError) -> Self {
        ErrorKind::Propagation(e)
    }
}

impl From<PropagationError> for PreprocessingError {
    fn from(_: PropagationError) -> Self {
        PreprocessingError::Unsatisfiable
    }
}
