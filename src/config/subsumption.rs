//! Configuration of subsumption and strengthening.

use super::ConfigOption;

/// Configuration of subsumption and strengthening.
#[derive(Clone, Debug)]
pub struct SubsumptionConfig {
    /// Strengthen clauses by self-subsuming resolution, in addition to removing subsumed clauses.
    pub strengthen: ConfigOption<bool>,

    /// The number of clause comparisons before the queues are abandoned.
    pub step_limit: ConfigOption<usize>,
}

impl Default for SubsumptionConfig {
    fn default() -> Self {
        SubsumptionConfig {
            strengthen: ConfigOption {
                name: "subsumption_strengthen",
                min: false,
                max: true,
                value: true,
            },

            step_limit: ConfigOption {
                name: "subsumption_step_limit",
                min: 0,
                max: usize::MAX,
                value: usize::MAX,
            },
        }
    }
}
