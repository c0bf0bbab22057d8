//! Convenient re-exports for downstream crates.

pub use crate::config::EngineConfig;
pub use crate::error::{Error, Result};
pub use crate::predicate::{AggregateOp, AggregateSpec, CmpOp, FilterPredicate, JoinPredicate};
pub use crate::schema::{DataType, Field, Schema};
pub use crate::tuple::Tuple;
pub use crate::types::{value_cmp, Value, ValueKey};
