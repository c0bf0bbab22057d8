//! Append-only in-memory relation backed by a `Vec<Tuple>`.

use rowmill_core::error::{Error, Result};
use rowmill_core::schema::Schema;
use rowmill_core::tuple::Tuple;
use serde::{Deserialize, Serialize};

use crate::relation::Relation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemTable {
    schema: Schema,
    rows: Vec<Tuple>,
}

impl MemTable {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Build a table from pre-made rows; each row is arity-checked.
    pub fn from_rows(schema: Schema, rows: Vec<Tuple>) -> Result<Self> {
        let mut table = Self::new(schema);
        for row in rows {
            table.insert(row)?;
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Tuple] {
        &self.rows
    }
}

impl Relation for MemTable {
    type Cursor = usize;

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn begin(&self) -> usize {
        0
    }

    fn is_end(&self, cursor: &usize) -> bool {
        *cursor >= self.rows.len()
    }

    fn advance(&self, cursor: &mut usize) {
        *cursor += 1;
    }

    fn tuple(&self, cursor: &usize) -> Tuple {
        self.rows[*cursor].clone()
    }

    fn insert(&mut self, tuple: Tuple) -> Result<()> {
        if tuple.len() != self.schema.len() {
            return Err(Error::Schema(format!(
                "tuple arity {} does not match schema arity {}",
                tuple.len(),
                self.schema.len()
            )));
        }
        self.rows.push(tuple);
        Ok(())
    }
}
