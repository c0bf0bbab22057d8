//! Immutable tuples: one `Value` per schema column.
//!
//! Tuples are copied across operator boundaries, never shared-mutated;
//! whichever relation or operator holds a tuple owns it.

use serde::{Deserialize, Serialize};

use crate::schema::DataType;
use crate::types::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuple {
    values: Vec<Value>,
}

impl Tuple {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Field at `idx`. Callers resolve indices against the schema first;
    /// an out-of-range index is a caller bug and panics.
    pub fn value(&self, idx: usize) -> &Value {
        &self.values[idx]
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn data_type(&self, idx: usize) -> DataType {
        self.values[idx].data_type()
    }
}
