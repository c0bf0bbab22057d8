#![forbid(unsafe_code)]
//! Umbrella crate re-exporting the rowmill workspace members.
//!
//! Downstream callers (a planner or query layer) can depend on this one
//! crate, or pick the member crates individually.

pub use rowmill_core as core;
pub use rowmill_operators as operators;
pub use rowmill_stats as stats;
pub use rowmill_storage as storage;
