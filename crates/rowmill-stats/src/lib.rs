#![forbid(unsafe_code)]
//! rowmill-stats: per-column statistics for an external planner.
//!
//! One long-lived `ColumnStats` per column, fed incrementally as values
//! are ingested and queried many times for cardinality estimates.

pub mod histogram;

pub use histogram::ColumnStats;
