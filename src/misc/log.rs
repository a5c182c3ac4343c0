/*!
Miscelanous items related to [logging](log).

Calls to the log macro are made throughout the library.
These are intended to provide useful information for tuning a preprocessing session and/or fixing issues.

Note, no log implementation is provided.
For more details, see [log].
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to [propagation](crate::procedures::propagation)
    pub const PROPAGATION: &str = "propagation";

    /// Logs related to the [clause arena](crate::db::arena)
    pub const CLAUSE_ARENA: &str = "clause_arena";

    /// Logs related to [variable elimination](crate::procedures::elimination)
    pub const ELIMINATION: &str = "elimination";

    /// Logs related to [subsumption](crate::procedures::subsumption)
    pub const SUBSUMPTION: &str = "subsumption";

    /// Logs related to the [parallel](crate::parallel) variant of elimination
    pub const PARALLEL: &str = "parallel";

    /// Logs related to the [extension log](crate::db::formula::extension)
    pub const EXTENSION: &str = "extension";

    /// Logs related to a preprocessing session as a whole
    pub const PREPROCESSING: &str = "preprocessing";
}
