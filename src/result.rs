use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Ordered raw measurements from one benchmark run. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleSet(Vec<f64>);

impl SampleSet {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Arithmetic mean, `0.0` for an empty set.
    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.iter().sum::<f64>() / self.0.len() as f64
    }

    pub fn min(&self) -> Option<f64> {
        self.0.iter().copied().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.0.iter().copied().reduce(f64::max)
    }
}

/// Reduced output of one benchmark run.
///
/// `primary_metric` is always the arithmetic mean of `raw_samples`.
/// `extra` carries family-specific fields: `cores` for the multi-core CPU
/// benchmark, `min`/`max` for the latency benchmark.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub primary_metric: f64,
    pub unit: String,
    pub raw_samples: SampleSet,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, f64>,
}

impl BenchmarkResult {
    pub fn new(primary_metric: f64, unit: &str, raw_samples: SampleSet) -> Self {
        Self {
            primary_metric,
            unit: unit.to_string(),
            raw_samples,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, name: &str, value: f64) -> Self {
        self.extra.insert(name.to_string(), value);
        self
    }
}

/// One persisted run: RFC 3339 timestamp plus the reduced result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub result: BenchmarkResult,
}

impl HistoryEntry {
    pub fn now(result: BenchmarkResult) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            result,
        }
    }
}

/// Full persisted history, keyed by benchmark key string. Insertion order
/// within a key is chronological.
pub type BenchmarkHistory = BTreeMap<String, Vec<HistoryEntry>>;
