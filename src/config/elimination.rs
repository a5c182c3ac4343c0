//! Configuration of bounded variable elimination.

use super::ConfigOption;

/// The order in which atoms are taken for elimination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeapOrder {
    /// Fewest occurrences first.
    Minimum,

    /// Most occurrences first.
    Maximum,

    /// Some pending atom, chosen at random.
    Random,
}

impl HeapOrder {
    pub const MIN: HeapOrder = HeapOrder::Minimum;
    pub const MAX: HeapOrder = HeapOrder::Random;
}

/// Which pairs with a learnt (derived) parent are resolved.
///
/// Whatever the policy, learnt pairs are always anticipated, as units and the empty clause from a learnt pair are valid consequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LearntResolution {
    /// Only pairs of original clauses.
    Off,

    /// Original clauses with original or learnt clauses.
    OriginalLearnt,

    /// All pairs, including two learnt clauses.
    All,
}

impl LearntResolution {
    pub const MIN: LearntResolution = LearntResolution::Off;
    pub const MAX: LearntResolution = LearntResolution::All;
}

/// Configuration of bounded variable elimination.
#[derive(Clone, Debug)]
pub struct EliminationConfig {
    /// The order in which atoms are taken for elimination.
    pub heap_order: ConfigOption<HeapOrder>,

    /// Which pairs with a learnt parent are resolved.
    pub resolve_learnts: ConfigOption<LearntResolution>,

    /// A resolvent with a learnt parent is kept only if its size is at most the size of the larger parent plus the growth.
    pub learnt_growth: ConfigOption<i32>,

    /// Ignore the occurrence cutoff.
    pub unlimited: ConfigOption<bool>,

    /// Remove clauses blocked on the candidate atom.
    pub blocked_clauses: ConfigOption<bool>,

    /// Search for an and-gate definition of the candidate atom, and if found only resolve definition clauses with other clauses.
    pub gates: ConfigOption<bool>,

    /// Search for gates even on atoms past the occurrence cutoff.
    pub force_gates: ConfigOption<bool>,

    /// Rekey atoms in the elimination order whenever occurrence counts change.
    pub heap_updates: ConfigOption<bool>,

    /// Eliminate without checking the resolvents are no larger than the clauses they replace.
    pub force: ConfigOption<bool>,

    /// The number of rounds of closure iteration.
    pub round_limit: ConfigOption<usize>,

    /// The number of clause pairs anticipation may check before elimination stops.
    pub step_limit: ConfigOption<usize>,
}

impl Default for EliminationConfig {
    fn default() -> Self {
        EliminationConfig {
            heap_order: ConfigOption {
                name: "bve_heap_order",
                min: HeapOrder::MIN,
                max: HeapOrder::MAX,
                value: HeapOrder::Minimum,
            },

            resolve_learnts: ConfigOption {
                name: "bve_resolve_learnts",
                min: LearntResolution::MIN,
                max: LearntResolution::MAX,
                value: LearntResolution::Off,
            },

            learnt_growth: ConfigOption {
                name: "bve_learnt_growth",
                min: -1,
                max: i32::MAX,
                value: 0,
            },

            unlimited: ConfigOption {
                name: "bve_unlimited",
                min: false,
                max: true,
                value: false,
            },

            blocked_clauses: ConfigOption {
                name: "bve_blocked_clauses",
                min: false,
                max: true,
                value: true,
            },

            gates: ConfigOption {
                name: "bve_gates",
                min: false,
                max: true,
                value: true,
            },

            force_gates: ConfigOption {
                name: "bve_force_gates",
                min: false,
                max: true,
                value: false,
            },

            heap_updates: ConfigOption {
                name: "bve_heap_updates",
                min: false,
                max: true,
                value: true,
            },

            force: ConfigOption {
                name: "bve_force",
                min: false,
                max: true,
                value: false,
            },

            round_limit: ConfigOption {
                name: "bve_round_limit",
                min: 1,
                max: usize::MAX,
                value: usize::MAX,
            },

            step_limit: ConfigOption {
                name: "bve_step_limit",
                min: 0,
                max: usize::MAX,
                value: usize::MAX,
            },
        }
    }
}
