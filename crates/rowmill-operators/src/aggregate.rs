//! Grouped and ungrouped aggregation in a single pass.
//!
//! One accumulator per distinct group key (or one implicit group when no
//! grouping field is given), seeded from the first value seen for its
//! key. Output group order is whatever the hash map yields.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use rowmill_core::error::{Error, Result};
use rowmill_core::predicate::{AggregateOp, AggregateSpec};
use rowmill_core::schema::{DataType, Field, Schema};
use rowmill_core::tuple::Tuple;
use rowmill_core::types::{value_cmp, Value, ValueKey};
use rowmill_storage::Relation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aggregate {
    pub spec: AggregateSpec,
}

/// Running state for one group.
struct Accumulator {
    count: u64,
    sum: Value,
    min: Value,
    max: Value,
}

impl Accumulator {
    fn seed(value: &Value) -> Self {
        Self {
            count: 1,
            sum: value.clone(),
            min: value.clone(),
            max: value.clone(),
        }
    }

    fn update(&mut self, value: &Value) {
        self.count += 1;
        match (&mut self.sum, value) {
            (Value::Int(acc), Value::Int(v)) => *acc += *v,
            (Value::Float(acc), Value::Float(v)) => *acc += *v,
            // Sum is only read for SUM/AVG, which reject non-numeric
            // fields before the scan starts.
            _ => {}
        }
        if value_cmp(value, &self.min) == Ordering::Less {
            self.min = value.clone();
        }
        if value_cmp(value, &self.max) == Ordering::Greater {
            self.max = value.clone();
        }
    }

    fn result(&self, op: AggregateOp) -> Result<Value> {
        match op {
            AggregateOp::Count => Ok(Value::Int(self.count as i64)),
            AggregateOp::Sum => match &self.sum {
                Value::Int(v) => Ok(Value::Int(*v)),
                Value::Float(v) => Ok(Value::Float(*v)),
                Value::Str(_) => Err(Error::UnsupportedType("SUM over a string field".into())),
            },
            AggregateOp::Avg => match &self.sum {
                Value::Int(v) => Ok(Value::Float(*v as f64 / self.count as f64)),
                Value::Float(v) => Ok(Value::Float(*v / self.count as f64)),
                Value::Str(_) => Err(Error::UnsupportedType("AVG over a string field".into())),
            },
            AggregateOp::Min => Ok(self.min.clone()),
            AggregateOp::Max => Ok(self.max.clone()),
        }
    }
}

impl Aggregate {
    pub fn new(spec: AggregateSpec) -> Self {
        Self { spec }
    }

    /// `[group field, result]` when grouped, `[result]` otherwise. The
    /// result column carries the aggregate's name (`count`, `sum`, ...)
    /// and the group column keeps its input name. Result types are read
    /// from the input schema, so SUM/AVG over a string field fail here.
    pub fn output_schema(&self, input: &Schema) -> Result<Schema> {
        let agg_idx = input
            .index_of(&self.spec.field)
            .ok_or_else(|| Error::FieldNotFound(self.spec.field.clone()))?;
        let agg_type = input.fields[agg_idx].data_type;

        let mut fields = Vec::with_capacity(2);
        if let Some(group) = &self.spec.group {
            let group_idx = input
                .index_of(group)
                .ok_or_else(|| Error::FieldNotFound(group.clone()))?;
            fields.push(Field::new(group.clone(), input.fields[group_idx].data_type));
        }

        let result_type = match self.spec.op {
            AggregateOp::Count => DataType::Int,
            AggregateOp::Sum | AggregateOp::Avg => {
                if agg_type == DataType::Str {
                    return Err(Error::UnsupportedType(format!(
                        "{} over string field {}",
                        self.spec.op.result_name(),
                        self.spec.field
                    )));
                }
                if self.spec.op == AggregateOp::Avg {
                    DataType::Float
                } else {
                    agg_type
                }
            }
            AggregateOp::Min | AggregateOp::Max => agg_type,
        };
        fields.push(Field::new(self.spec.op.result_name(), result_type));
        Ok(Schema::new(fields))
    }

    /// Single pass over `input`. Fails with `EmptyInput` before touching
    /// `out` when the input has no tuples; this is a kept external
    /// contract, not a sampling requirement (output types come from the
    /// schema). All group results are computed before the first insert,
    /// so `out` is empty on any failure.
    pub fn run<I, O>(&self, input: &I, out: &mut O) -> Result<()>
    where
        I: Relation,
        O: Relation,
    {
        if input.is_empty() {
            return Err(Error::EmptyInput("aggregate"));
        }
        // Rejects unknown fields and SUM/AVG over strings up front.
        self.output_schema(input.schema())?;

        let schema = input.schema();
        let agg_idx = schema
            .index_of(&self.spec.field)
            .ok_or_else(|| Error::FieldNotFound(self.spec.field.clone()))?;
        let group_idx = match &self.spec.group {
            Some(group) => Some(
                schema
                    .index_of(group)
                    .ok_or_else(|| Error::FieldNotFound(group.clone()))?,
            ),
            None => None,
        };

        let results = match group_idx {
            Some(group_idx) => {
                let mut groups: HashMap<ValueKey, Accumulator> = HashMap::new();
                for tuple in input.scan() {
                    let key = ValueKey(tuple.value(group_idx).clone());
                    let value = tuple.value(agg_idx);
                    match groups.entry(key) {
                        Entry::Occupied(mut entry) => entry.get_mut().update(value),
                        Entry::Vacant(entry) => {
                            entry.insert(Accumulator::seed(value));
                        }
                    }
                }
                groups
                    .into_iter()
                    .map(|(key, acc)| Ok(Tuple::new(vec![key.0, acc.result(self.spec.op)?])))
                    .collect::<Result<Vec<_>>>()?
            }
            None => {
                let mut total: Option<Accumulator> = None;
                for tuple in input.scan() {
                    let value = tuple.value(agg_idx);
                    match &mut total {
                        Some(acc) => acc.update(value),
                        None => total = Some(Accumulator::seed(value)),
                    }
                }
                let acc = total.ok_or(Error::EmptyInput("aggregate"))?;
                vec![Tuple::new(vec![acc.result(self.spec.op)?])]
            }
        };

        let mut emitted = 0u64;
        for tuple in results {
            out.insert(tuple)?;
            emitted += 1;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            groups = emitted,
            op = self.spec.op.result_name(),
            "aggregate complete"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = emitted;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowmill_storage::MemTable;

    fn salaries() -> MemTable {
        let schema = Schema::new(vec![
            Field::new("dept", DataType::Str),
            Field::new("sal", DataType::Int),
        ]);
        MemTable::from_rows(
            schema,
            vec![
                Tuple::new(vec![Value::Str("x".into()), Value::Int(10)]),
                Tuple::new(vec![Value::Str("x".into()), Value::Int(20)]),
                Tuple::new(vec![Value::Str("y".into()), Value::Int(5)]),
            ],
        )
        .unwrap()
    }

    fn run_agg(input: &MemTable, spec: AggregateSpec) -> MemTable {
        let agg = Aggregate::new(spec);
        let mut out = MemTable::new(agg.output_schema(input.schema()).unwrap());
        agg.run(input, &mut out).unwrap();
        out
    }

    #[test]
    fn ungrouped_sum_count_min_max() {
        let input = salaries();

        let out = run_agg(&input, AggregateSpec::new("sal", AggregateOp::Sum));
        assert_eq!(out.rows(), &[Tuple::new(vec![Value::Int(35)])]);

        let out = run_agg(&input, AggregateSpec::new("sal", AggregateOp::Count));
        assert_eq!(out.rows(), &[Tuple::new(vec![Value::Int(3)])]);

        let out = run_agg(&input, AggregateSpec::new("sal", AggregateOp::Min));
        assert_eq!(out.rows(), &[Tuple::new(vec![Value::Int(5)])]);

        let out = run_agg(&input, AggregateSpec::new("sal", AggregateOp::Max));
        assert_eq!(out.rows(), &[Tuple::new(vec![Value::Int(20)])]);
    }

    #[test]
    fn avg_widens_integer_sums() {
        let input = salaries();
        let out = run_agg(&input, AggregateSpec::new("sal", AggregateOp::Avg));
        assert_eq!(out.len(), 1);
        let Value::Float(avg) = out.rows()[0].value(0) else {
            panic!("AVG must produce a float");
        };
        assert!((avg - 35.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn grouped_sum_reconstructs_ungrouped_total() {
        let input = salaries();
        let out = run_agg(
            &input,
            AggregateSpec::new("sal", AggregateOp::Sum).grouped_by("dept"),
        );

        assert_eq!(out.schema().fields[0].name, "dept");
        assert_eq!(out.schema().fields[1].name, "sum");
        assert_eq!(out.len(), 2);

        let mut by_dept: HashMap<String, i64> = HashMap::new();
        let mut total = 0i64;
        for row in out.rows() {
            let Value::Str(dept) = row.value(0) else {
                panic!("group key must be the dept string");
            };
            let Value::Int(sum) = row.value(1) else {
                panic!("sum over ints must stay an int");
            };
            by_dept.insert(dept.clone(), *sum);
            total += *sum;
        }
        assert_eq!(by_dept["x"], 30);
        assert_eq!(by_dept["y"], 5);
        assert_eq!(total, 35);
    }

    #[test]
    fn count_and_minmax_work_over_strings() {
        let input = salaries();

        let out = run_agg(&input, AggregateSpec::new("dept", AggregateOp::Count));
        assert_eq!(out.rows(), &[Tuple::new(vec![Value::Int(3)])]);

        let out = run_agg(&input, AggregateSpec::new("dept", AggregateOp::Min));
        assert_eq!(out.rows(), &[Tuple::new(vec![Value::Str("x".into())])]);

        let out = run_agg(&input, AggregateSpec::new("dept", AggregateOp::Max));
        assert_eq!(out.rows(), &[Tuple::new(vec![Value::Str("y".into())])]);
    }

    #[test]
    fn sum_over_strings_is_rejected_with_empty_output() {
        let input = salaries();
        let agg = Aggregate::new(AggregateSpec::new("dept", AggregateOp::Sum));
        assert!(matches!(
            agg.output_schema(input.schema()),
            Err(Error::UnsupportedType(_))
        ));

        let mut out = MemTable::new(Schema::new(vec![Field::new("sum", DataType::Str)]));
        let err = agg.run(&input, &mut out).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
        assert_eq!(out.len(), 0);
    }

    #[test]
    fn empty_input_fails_and_leaves_output_empty() {
        let empty = MemTable::new(salaries().schema().clone());
        let agg = Aggregate::new(AggregateSpec::new("sal", AggregateOp::Sum));
        let mut out = MemTable::new(agg.output_schema(empty.schema()).unwrap());
        let err = agg.run(&empty, &mut out).unwrap_err();
        assert!(matches!(err, Error::EmptyInput(_)));
        assert_eq!(out.len(), 0);
    }

    #[test]
    fn float_aggregation() {
        let schema = Schema::new(vec![Field::new("v", DataType::Float)]);
        let input = MemTable::from_rows(
            schema,
            vec![
                Tuple::new(vec![Value::Float(1.5)]),
                Tuple::new(vec![Value::Float(2.5)]),
            ],
        )
        .unwrap();

        let out = run_agg(&input, AggregateSpec::new("v", AggregateOp::Sum));
        assert_eq!(out.rows(), &[Tuple::new(vec![Value::Float(4.0)])]);

        let out = run_agg(&input, AggregateSpec::new("v", AggregateOp::Avg));
        assert_eq!(out.rows(), &[Tuple::new(vec![Value::Float(2.0)])]);
    }
}
