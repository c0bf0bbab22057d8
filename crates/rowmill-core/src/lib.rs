#![forbid(unsafe_code)]
//! rowmill-core: value/tuple/schema model, operator descriptors, errors,
//! and configuration for the rowmill execution core.
//!
//! Design intent:
//! - Pure data and small helpers; no IO, no async, no global state.
//! - Every other crate in the workspace depends only on this one.

pub mod config;
pub mod error;
pub mod predicate;
pub mod prelude;
pub mod schema;
pub mod tuple;
pub mod types;
