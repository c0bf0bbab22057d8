#![forbid(unsafe_code)]
//! rowmill-operators: single-pass relational operators over the
//! `Relation` seam.
//!
//! Design intent:
//! - Each operator is synchronous and fully drains its input(s) before
//!   returning; operators never call each other. Pipelining is the
//!   caller's job.
//! - `output_schema(...)` is the planning surface: callers use it to
//!   create the empty output relation handed to `run(...)`.

pub mod aggregate;
pub mod filter;
pub mod join;
pub mod project;

pub use aggregate::Aggregate;
pub use filter::Filter;
pub use join::Join;
pub use project::Projection;
