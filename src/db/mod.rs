//! Databases for holding information relevant to a preprocessing session.
//!
//! - The [clause arena](arena) owns every clause, and hands out [keys](ClauseKey).
//! - The [formula](formula) indexes the clauses of the arena by literal, and holds the trail, the extension log, and the status of the session.
//!
//! The arena and the formula are kept separate, as procedures often read from one while mutating the other.

pub mod arena;
pub mod formula;
mod keys;

pub use keys::{ArenaIndex, ClauseKey};
