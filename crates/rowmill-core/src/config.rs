//! Engine configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Bucket count for newly created column histograms.
    pub histogram_buckets: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            histogram_buckets: 100,
        }
    }
}

impl EngineConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `ROWMILL_HISTOGRAM_BUCKETS`: histogram bucket count (>= 1)
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("ROWMILL_HISTOGRAM_BUCKETS") {
            if let Ok(v) = s.parse::<usize>() {
                if v >= 1 {
                    cfg.histogram_buckets = v;
                }
            }
        }

        cfg
    }
}
