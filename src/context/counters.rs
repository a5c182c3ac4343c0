use std::time::Duration;

use crate::procedures::{elimination::EliminationStats, subsumption::SubsumptionStats};

/// Counts for various things which count, roughly.
#[derive(Clone, Debug, Default)]
pub struct Counters {
    /// Counts from elimination.
    pub elimination: EliminationStats,

    /// Counts from subsumption and strengthening.
    pub subsumption: SubsumptionStats,

    /// A count of clauses deleted by propagation, as satisfied.
    pub satisfied: usize,

    /// A count of literals removed from clauses by propagation.
    pub propagated_literals: usize,

    /// The time taken during preprocessing.
    pub time: Duration,
}
