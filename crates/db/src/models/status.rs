//! Status and round-type string constants matching the schema CHECK constraints.

/// Session and round lifecycle statuses.
pub mod lifecycle {
    /// Work in progress. Initial state for sessions and rounds.
    pub const ACTIVE: &str = "active";

    /// Terminal state. Rounds move here when every question is answered or
    /// when the completion webhook confirms the round; sessions move here
    /// once no non-completed rounds remain.
    pub const COMPLETED: &str = "completed";

    /// Present in the schema but never set by the core lifecycle; reserved
    /// for external overrides.
    pub const PAUSED: &str = "paused";
}

/// Round provenance.
pub mod round_type {
    /// Questions produced by the LLM question generator.
    pub const AI_GENERATED: &str = "ai_generated";

    /// Questions supplied directly by the client.
    pub const MANUAL: &str = "manual";
}
