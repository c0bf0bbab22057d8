//! Projection: keep a requested list of fields, in requested order.

use rowmill_core::error::{Error, Result};
use rowmill_core::schema::{Field, Schema};
use rowmill_core::tuple::Tuple;
use rowmill_storage::Relation;
use serde::{Deserialize, Serialize};

/// Ordered list of field names to keep; repeats are allowed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Projection {
    pub fields: Vec<String>,
}

impl Projection {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Resolve the requested names against `input` and build the output
    /// schema. Output names carry their position (`age_0`) so the schema
    /// stays unique even when the same field is requested twice.
    pub fn output_schema(&self, input: &Schema) -> Result<Schema> {
        let mut fields = Vec::with_capacity(self.fields.len());
        for (pos, name) in self.fields.iter().enumerate() {
            let idx = input
                .index_of(name)
                .ok_or_else(|| Error::FieldNotFound(name.clone()))?;
            fields.push(Field::new(
                format!("{}_{}", name, pos),
                input.fields[idx].data_type,
            ));
        }
        Ok(Schema::new(fields))
    }

    /// One full scan of `input`: every tuple is copied into `out` with
    /// exactly the selected fields in requested order. No deduplication;
    /// output cardinality and order match the input scan.
    pub fn run<I, O>(&self, input: &I, out: &mut O) -> Result<()>
    where
        I: Relation,
        O: Relation,
    {
        let indices = self
            .fields
            .iter()
            .map(|name| {
                input
                    .schema()
                    .index_of(name)
                    .ok_or_else(|| Error::FieldNotFound(name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut emitted = 0u64;
        for tuple in input.scan() {
            let values = indices.iter().map(|&i| tuple.value(i).clone()).collect();
            out.insert(Tuple::new(values))?;
            emitted += 1;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(emitted, fields = self.fields.len(), "projection complete");
        #[cfg(not(feature = "tracing"))]
        let _ = emitted;
        Ok(())
    }
}
