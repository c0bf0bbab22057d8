//! Filter: conjunction of `field OP literal` predicates.

use rowmill_core::prelude::{Error, FilterPredicate, Result, Schema};
use rowmill_core::types::value_cmp;
use rowmill_storage::Relation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Filter {
    pub predicates: Vec<FilterPredicate>,
}

impl Filter {
    pub fn new(predicates: Vec<FilterPredicate>) -> Self {
        Self { predicates }
    }

    /// Filtering never reshapes tuples; the output schema is the input's.
    pub fn output_schema(&self, input: &Schema) -> Result<Schema> {
        for pred in &self.predicates {
            if input.index_of(&pred.field).is_none() {
                return Err(Error::FieldNotFound(pred.field.clone()));
            }
        }
        Ok(input.clone())
    }

    /// A tuple survives only if every predicate holds; evaluation stops
    /// at the first failing predicate. Field indices are resolved once.
    /// Surviving tuples are inserted unchanged, in input scan order.
    pub fn run<I, O>(&self, input: &I, out: &mut O) -> Result<()>
    where
        I: Relation,
        O: Relation,
    {
        let resolved = self
            .predicates
            .iter()
            .map(|pred| {
                input
                    .schema()
                    .index_of(&pred.field)
                    .map(|idx| (idx, pred))
                    .ok_or_else(|| Error::FieldNotFound(pred.field.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut scanned = 0u64;
        let mut emitted = 0u64;
        for tuple in input.scan() {
            scanned += 1;
            let keep = resolved
                .iter()
                .all(|(idx, pred)| pred.op.matches(value_cmp(tuple.value(*idx), &pred.value)));
            if keep {
                out.insert(tuple)?;
                emitted += 1;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            scanned,
            emitted,
            predicates = self.predicates.len(),
            "filter complete"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = (scanned, emitted);
        Ok(())
    }
}
