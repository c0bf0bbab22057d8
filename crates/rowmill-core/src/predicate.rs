//! Operator descriptors: comparison predicates, join predicates, and
//! aggregate specs.
//!
//! Pure data, built by a caller (parser/planner, out of scope) and
//! interpreted by the operators and the stats estimator.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    /// Whether a comparison outcome satisfies this operator.
    pub fn matches(&self, ord: Ordering) -> bool {
        match self {
            CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Ne => ord != Ordering::Equal,
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Le => ord != Ordering::Greater,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Ge => ord != Ordering::Less,
        }
    }
}

/// `field OP literal`; the filter operator conjoins a list of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPredicate {
    pub field: String,
    pub op: CmpOp,
    pub value: Value,
}

impl FilterPredicate {
    pub fn new(field: impl Into<String>, op: CmpOp, value: Value) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }
}

/// `left.field OP right.field` for joins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinPredicate {
    pub left: String,
    pub right: String,
    pub op: CmpOp,
}

impl JoinPredicate {
    pub fn new(left: impl Into<String>, right: impl Into<String>, op: CmpOp) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            op,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateOp {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateOp {
    /// Name of the result column in the aggregate's output schema.
    pub fn result_name(&self) -> &'static str {
        match self {
            AggregateOp::Count => "count",
            AggregateOp::Sum => "sum",
            AggregateOp::Avg => "avg",
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
        }
    }
}

/// Aggregation over one field, optionally grouped by another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSpec {
    pub field: String,
    pub op: AggregateOp,
    pub group: Option<String>,
}

impl AggregateSpec {
    pub fn new(field: impl Into<String>, op: AggregateOp) -> Self {
        Self {
            field: field.into(),
            op,
            group: None,
        }
    }

    pub fn grouped_by(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}
