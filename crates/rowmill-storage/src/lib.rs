#![forbid(unsafe_code)]
//! rowmill-storage: the relation seam consumed by the operators, plus an
//! append-only in-memory implementation.
//!
//! Design intent:
//! - Operators see only `Relation`: a forward cursor and an append.
//! - `MemTable` is the whole storage story for this core; durable
//!   backends would implement the same trait.

pub mod mem_table;
pub mod relation;

pub use mem_table::MemTable;
pub use relation::{Relation, Scan};
