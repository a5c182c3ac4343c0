//! Generic structures, not tied to formulas.

pub mod index_heap;
pub mod minimal_pcg;
