//! Join: hash join on equality, nested loops for everything else.
//!
//! Output columns are the left relation's (`left_<i>`) followed by the
//! right relation's (`right_<i>`). For equality joins the right join
//! column is dropped, since it duplicates the left key. Every other
//! operator keeps it; the asymmetry is part of the schema contract.

use std::collections::HashMap;

use rowmill_core::error::{Error, Result};
use rowmill_core::predicate::{CmpOp, JoinPredicate};
use rowmill_core::schema::{Field, Schema};
use rowmill_core::tuple::Tuple;
use rowmill_core::types::{value_cmp, ValueKey};
use rowmill_storage::Relation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Join {
    pub predicate: JoinPredicate,
}

impl Join {
    pub fn new(predicate: JoinPredicate) -> Self {
        Self { predicate }
    }

    /// Concatenated output schema. Right column names keep their source
    /// positions, so dropping the join column for `Eq` leaves a gap
    /// (`right_1` with no `right_0` when column 0 was the key).
    pub fn output_schema(&self, left: &Schema, right: &Schema) -> Result<Schema> {
        left.index_of(&self.predicate.left)
            .ok_or_else(|| Error::FieldNotFound(self.predicate.left.clone()))?;
        let right_key = right
            .index_of(&self.predicate.right)
            .ok_or_else(|| Error::FieldNotFound(self.predicate.right.clone()))?;

        let mut fields = Vec::with_capacity(left.len() + right.len());
        for (i, field) in left.fields.iter().enumerate() {
            fields.push(Field::new(format!("left_{}", i), field.data_type));
        }
        for (i, field) in right.fields.iter().enumerate() {
            if self.predicate.op == CmpOp::Eq && i == right_key {
                continue;
            }
            fields.push(Field::new(format!("right_{}", i), field.data_type));
        }
        Ok(Schema::new(fields))
    }

    /// Drains both inputs and emits one concatenated tuple per matching
    /// (left, right) pair; non-matches emit nothing (inner join only).
    /// Fails with `EmptyInput` before touching `out` when either side
    /// has no tuples; this is a kept external contract, not a sampling
    /// requirement (output types come from the schemas).
    pub fn run<L, R, O>(&self, left: &L, right: &R, out: &mut O) -> Result<()>
    where
        L: Relation,
        R: Relation,
        O: Relation,
    {
        if left.is_empty() {
            return Err(Error::EmptyInput("join left side"));
        }
        if right.is_empty() {
            return Err(Error::EmptyInput("join right side"));
        }

        let left_key = left
            .schema()
            .index_of(&self.predicate.left)
            .ok_or_else(|| Error::FieldNotFound(self.predicate.left.clone()))?;
        let right_key = right
            .schema()
            .index_of(&self.predicate.right)
            .ok_or_else(|| Error::FieldNotFound(self.predicate.right.clone()))?;

        match self.predicate.op {
            CmpOp::Eq => self.hash_join(left, right, out, left_key, right_key),
            _ => self.nested_loop(left, right, out, left_key, right_key),
        }
    }

    /// Build a multi-valued index over the left side, then probe it with
    /// one scan of the right side. Duplicate build keys keep every left
    /// tuple; skewed keys degrade toward quadratic output, which is the
    /// join's actual result size.
    fn hash_join<L, R, O>(
        &self,
        left: &L,
        right: &R,
        out: &mut O,
        left_key: usize,
        right_key: usize,
    ) -> Result<()>
    where
        L: Relation,
        R: Relation,
        O: Relation,
    {
        let mut index: HashMap<ValueKey, Vec<Tuple>> = HashMap::new();
        for tuple in left.scan() {
            let key = ValueKey(tuple.value(left_key).clone());
            index.entry(key).or_default().push(tuple);
        }

        let mut emitted = 0u64;
        for right_tuple in right.scan() {
            let probe = ValueKey(right_tuple.value(right_key).clone());
            let Some(matches) = index.get(&probe) else {
                continue;
            };
            for left_tuple in matches {
                let mut values = Vec::with_capacity(left_tuple.len() + right_tuple.len() - 1);
                values.extend_from_slice(left_tuple.values());
                for (i, value) in right_tuple.values().iter().enumerate() {
                    if i == right_key {
                        continue;
                    }
                    values.push(value.clone());
                }
                out.insert(Tuple::new(values))?;
                emitted += 1;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(emitted, build_keys = index.len(), "hash join complete");
        #[cfg(not(feature = "tracing"))]
        let _ = emitted;
        Ok(())
    }

    /// Compare every (left, right) pair with the predicate's operator.
    /// Equality never takes this path; hitting it here means the
    /// dispatch in `run` was bypassed.
    fn nested_loop<L, R, O>(
        &self,
        left: &L,
        right: &R,
        out: &mut O,
        left_key: usize,
        right_key: usize,
    ) -> Result<()>
    where
        L: Relation,
        R: Relation,
        O: Relation,
    {
        if self.predicate.op == CmpOp::Eq {
            return Err(Error::UnsupportedPredicate(
                "equality join must use the hash path".into(),
            ));
        }

        let mut emitted = 0u64;
        for left_tuple in left.scan() {
            let left_value = left_tuple.value(left_key);
            for right_tuple in right.scan() {
                let ord = value_cmp(left_value, right_tuple.value(right_key));
                if !self.predicate.op.matches(ord) {
                    continue;
                }
                let mut values = Vec::with_capacity(left_tuple.len() + right_tuple.len());
                values.extend_from_slice(left_tuple.values());
                values.extend_from_slice(right_tuple.values());
                out.insert(Tuple::new(values))?;
                emitted += 1;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(emitted, "nested-loop join complete");
        #[cfg(not(feature = "tracing"))]
        let _ = emitted;
        Ok(())
    }
}
