//! Equi-width histogram over a bounded integer domain.
//!
//! Estimates use truncating integer division throughout. Planners
//! compare these numbers against each other, so the exact rounding is
//! part of the contract, not an implementation detail.

use rowmill_core::config::EngineConfig;
use rowmill_core::error::{Error, Result};
use rowmill_core::predicate::CmpOp;
use serde::{Deserialize, Serialize};

/// Per-column selectivity estimator: fixed-width buckets partitioning
/// `[min, max]` inclusive. The last bucket may cover a shorter span of
/// the domain, but every in-range value lands in some bucket.
///
/// Invariant: `sum(histogram) == tuple_count` at all times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnStats {
    min: i64,
    max: i64,
    bucket_width: i64,
    histogram: Vec<u64>,
    tuple_count: u64,
}

impl ColumnStats {
    /// Requires `buckets >= 1` and `min <= max`.
    pub fn new(buckets: usize, min: i64, max: i64) -> Self {
        assert!(buckets >= 1, "histogram needs at least one bucket");
        assert!(min <= max, "histogram domain is empty: [{}, {}]", min, max);
        let buckets_i = buckets as i64;
        // ceil((max - min + 1) / buckets), never below 1
        let bucket_width = (buckets_i + (max - min)) / buckets_i;
        Self {
            min,
            max,
            bucket_width,
            histogram: vec![0; buckets],
            tuple_count: 0,
        }
    }

    /// Bucket count taken from configuration.
    pub fn from_config(config: &EngineConfig, min: i64, max: i64) -> Self {
        Self::new(config.histogram_buckets, min, max)
    }

    pub fn tuple_count(&self) -> u64 {
        self.tuple_count
    }

    pub fn bucket_width(&self) -> i64 {
        self.bucket_width
    }

    pub fn buckets(&self) -> &[u64] {
        &self.histogram
    }

    fn bucket_index(&self, v: i64) -> Option<usize> {
        if v < self.min || v > self.max {
            return None;
        }
        Some(((v - self.min) / self.bucket_width) as usize)
    }

    /// O(1) ingestion. Out-of-domain values are rejected and leave the
    /// histogram untouched.
    pub fn add_value(&mut self, v: i64) -> Result<()> {
        let index = self.bucket_index(v).ok_or(Error::OutOfRange {
            value: v,
            min: self.min,
            max: self.max,
        })?;
        self.histogram[index] += 1;
        self.tuple_count += 1;
        Ok(())
    }

    /// Estimated number of ingested values satisfying `column OP v`.
    ///
    /// Values are assumed uniformly distributed within the bucket
    /// containing `v`; partial-bucket fractions truncate. `Le` and `Ne`
    /// are composed from `Eq`/`Lt` so the boundary logic lives in one
    /// place.
    pub fn estimate_cardinality(&self, op: CmpOp, v: i64) -> u64 {
        if self.tuple_count == 0 {
            return 0;
        }

        let width = self.bucket_width as u64;
        match op {
            CmpOp::Eq => match self.bucket_index(v) {
                Some(index) => self.histogram[index] / width,
                None => 0,
            },
            CmpOp::Gt => {
                if v < self.min {
                    return self.tuple_count;
                }
                if v >= self.max {
                    return 0;
                }
                // v is now within [min, max), so its bucket exists
                let index = ((v - self.min) / self.bucket_width) as usize;
                let right_edge = self.min + (index as i64 + 1) * self.bucket_width - 1;
                let partial = (right_edge - v) as u64 * self.histogram[index] / width;
                partial + self.histogram[index + 1..].iter().sum::<u64>()
            }
            CmpOp::Ge => {
                if v < self.min {
                    return self.tuple_count;
                }
                if v > self.max {
                    return 0;
                }
                let index = ((v - self.min) / self.bucket_width) as usize;
                let right_edge = self.min + (index as i64 + 1) * self.bucket_width - 1;
                let partial = (right_edge - v + 1) as u64 * self.histogram[index] / width;
                partial + self.histogram[index + 1..].iter().sum::<u64>()
            }
            CmpOp::Lt => {
                if v <= self.min {
                    return 0;
                }
                if v > self.max {
                    return self.tuple_count;
                }
                let index = ((v - self.min) / self.bucket_width) as usize;
                let left_edge = self.min + index as i64 * self.bucket_width;
                let partial = (v - left_edge) as u64 * self.histogram[index] / width;
                partial + self.histogram[..index].iter().sum::<u64>()
            }
            CmpOp::Le => {
                self.estimate_cardinality(CmpOp::Eq, v) + self.estimate_cardinality(CmpOp::Lt, v)
            }
            CmpOp::Ne => self.tuple_count - self.estimate_cardinality(CmpOp::Eq, v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 10 buckets over [1, 100]: width 10, buckets 1-10, 11-20, ...
    fn uniform() -> ColumnStats {
        let mut stats = ColumnStats::new(10, 1, 100);
        for v in 1..=100 {
            stats.add_value(v).unwrap();
        }
        stats
    }

    #[test]
    fn bucket_width_is_ceiling_with_floor_one() {
        assert_eq!(ColumnStats::new(10, 1, 100).bucket_width(), 10);
        assert_eq!(ColumnStats::new(5, 0, 9).bucket_width(), 2);
        assert_eq!(ColumnStats::new(10, 5, 5).bucket_width(), 1);
        assert_eq!(ColumnStats::new(3, 0, 9).bucket_width(), 4);
    }

    #[test]
    fn counts_match_tuple_count() {
        let stats = uniform();
        assert_eq!(stats.tuple_count(), 100);
        assert_eq!(stats.buckets().iter().sum::<u64>(), stats.tuple_count());
        assert!(stats.buckets().iter().all(|&b| b == 10));
    }

    #[test]
    fn out_of_range_is_rejected_without_side_effects() {
        let mut stats = ColumnStats::new(5, 0, 9);
        stats.add_value(3).unwrap();
        let err = stats.add_value(10).unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfRange {
                value: 10,
                min: 0,
                max: 9
            }
        ));
        assert!(stats.add_value(-1).is_err());
        assert_eq!(stats.tuple_count(), 1);
        assert_eq!(stats.buckets().iter().sum::<u64>(), 1);
    }

    #[test]
    fn empty_histogram_estimates_zero() {
        let stats = ColumnStats::new(10, 1, 100);
        for op in [CmpOp::Eq, CmpOp::Ne, CmpOp::Lt, CmpOp::Le, CmpOp::Gt, CmpOp::Ge] {
            assert_eq!(stats.estimate_cardinality(op, 50), 0);
        }
    }

    #[test]
    fn reference_estimates_on_uniform_data() {
        let stats = uniform();

        // v=50 sits in bucket 4 (41..=50); its right edge is 50.
        assert_eq!(stats.estimate_cardinality(CmpOp::Eq, 50), 1);
        assert_eq!(stats.estimate_cardinality(CmpOp::Gt, 50), 50);
        assert_eq!(stats.estimate_cardinality(CmpOp::Ge, 50), 51);
        assert_eq!(stats.estimate_cardinality(CmpOp::Lt, 50), 49);
        assert_eq!(stats.estimate_cardinality(CmpOp::Le, 50), 50);
        assert_eq!(stats.estimate_cardinality(CmpOp::Ne, 50), 99);
    }

    #[test]
    fn boundary_checks() {
        let stats = uniform();

        assert_eq!(stats.estimate_cardinality(CmpOp::Gt, 0), 100);
        assert_eq!(stats.estimate_cardinality(CmpOp::Gt, 100), 0);
        assert_eq!(stats.estimate_cardinality(CmpOp::Ge, 0), 100);
        assert_eq!(stats.estimate_cardinality(CmpOp::Ge, 101), 0);
        assert_eq!(stats.estimate_cardinality(CmpOp::Lt, 1), 0);
        assert_eq!(stats.estimate_cardinality(CmpOp::Lt, 101), 100);
        assert_eq!(stats.estimate_cardinality(CmpOp::Le, 101), 100);
        assert_eq!(stats.estimate_cardinality(CmpOp::Eq, 101), 0);
        assert_eq!(stats.estimate_cardinality(CmpOp::Ne, 101), 100);
    }

    #[test]
    fn truncation_on_skewed_data() {
        // 5 buckets over [0, 9]: width 2. Three 0s and one 9.
        let mut stats = ColumnStats::new(5, 0, 9);
        for _ in 0..3 {
            stats.add_value(0).unwrap();
        }
        stats.add_value(9).unwrap();

        // 3 / width truncates to 1, 1 / width truncates to 0.
        assert_eq!(stats.estimate_cardinality(CmpOp::Eq, 0), 1);
        assert_eq!(stats.estimate_cardinality(CmpOp::Eq, 9), 0);
        assert_eq!(stats.estimate_cardinality(CmpOp::Gt, 4), 1);
        assert_eq!(stats.estimate_cardinality(CmpOp::Lt, 2), 3);
        assert_eq!(stats.estimate_cardinality(CmpOp::Le, 0), 1);
        assert_eq!(stats.estimate_cardinality(CmpOp::Ne, 0), 3);
    }

    #[test]
    fn le_and_ne_compose_from_eq_and_lt() {
        let stats = uniform();
        for v in [0, 1, 17, 50, 99, 100, 101] {
            assert_eq!(
                stats.estimate_cardinality(CmpOp::Le, v),
                stats.estimate_cardinality(CmpOp::Eq, v) + stats.estimate_cardinality(CmpOp::Lt, v)
            );
            assert_eq!(
                stats.estimate_cardinality(CmpOp::Ne, v),
                stats.tuple_count() - stats.estimate_cardinality(CmpOp::Eq, v)
            );
        }
    }

    #[test]
    fn gt_is_monotonically_non_increasing() {
        let mut stats = ColumnStats::new(7, -50, 50);
        for v in (-50..=50).step_by(3) {
            stats.add_value(v).unwrap();
        }

        let mut prev_gt = stats.tuple_count();
        let mut prev_lt = 0;
        for v in -55..=55 {
            let gt = stats.estimate_cardinality(CmpOp::Gt, v);
            let lt = stats.estimate_cardinality(CmpOp::Lt, v);
            assert!(gt <= prev_gt, "GT estimate rose at v={}", v);
            assert!(lt >= prev_lt, "LT estimate fell at v={}", v);
            prev_gt = gt;
            prev_lt = lt;
        }
    }

    #[test]
    fn single_value_domain() {
        let mut stats = ColumnStats::new(10, 5, 5);
        for _ in 0..4 {
            stats.add_value(5).unwrap();
        }
        assert_eq!(stats.estimate_cardinality(CmpOp::Eq, 5), 4);
        assert_eq!(stats.estimate_cardinality(CmpOp::Gt, 5), 0);
        assert_eq!(stats.estimate_cardinality(CmpOp::Lt, 5), 0);
        assert_eq!(stats.estimate_cardinality(CmpOp::Ge, 5), 4);
    }

    #[test]
    fn from_config_uses_configured_bucket_count() {
        let config = EngineConfig {
            histogram_buckets: 4,
        };
        let stats = ColumnStats::from_config(&config, 0, 7);
        assert_eq!(stats.buckets().len(), 4);
        assert_eq!(stats.bucket_width(), 2);
    }
}
