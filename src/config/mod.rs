/*!
Configuration of a preprocessing session.

All configuration for a session is contained within [Config], and each procedure takes a clone of the part relevant to it when the session is built.
So, revising the configuration after a session has been built has no effect on the session.

```rust
# use coprocessor::config::{Config, elimination::HeapOrder};
let mut config = Config::default();
config.threads.set(4).unwrap();
config.bve.heap_order.set(HeapOrder::Maximum).unwrap();

assert!(config.bve.learnt_growth.set(-2).is_err());
```
*/

mod config_option;
pub use config_option::ConfigOption;

pub mod elimination;
use elimination::EliminationConfig;

pub mod subsumption;
use subsumption::SubsumptionConfig;

/// The primary configuration structure.
#[derive(Clone, Debug)]
pub struct Config {
    /// Configuration of bounded variable elimination.
    pub bve: EliminationConfig,

    /// Configuration of subsumption and strengthening.
    pub subsume: SubsumptionConfig,

    /// Run bounded variable elimination.
    pub elimination: ConfigOption<bool>,

    /// Run subsumption and strengthening before elimination.
    pub subsumption: ConfigOption<bool>,

    /// The number of elimination workers, with 0 for the sequential variant.
    pub threads: ConfigOption<usize>,

    /// The seed of the source of randomness.
    pub random_seed: ConfigOption<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bve: EliminationConfig::default(),
            subsume: SubsumptionConfig::default(),

            elimination: ConfigOption {
                name: "elimination",
                min: false,
                max: true,
                value: true,
            },

            subsumption: ConfigOption {
                name: "subsumption",
                min: false,
                max: true,
                value: true,
            },

            threads: ConfigOption {
                name: "threads",
                min: 0,
                max: 256,
                value: 0,
            },

            random_seed: ConfigOption {
                name: "random_seed",
                min: 0,
                max: u64::MAX,
                value: 0,
            },
        }
    }
}
