use crate::catalog::BenchmarkKey;
use crate::result::HistoryEntry;

/// One plotted history point. `percent_change` is `None` for the first
/// entry and whenever the previous value was zero or negative (the ratio
/// would be meaningless).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrendPoint {
    pub value: f64,
    pub percent_change: Option<f64>,
}

/// Run-over-run trend for one benchmark key's history.
#[derive(Clone, Debug, PartialEq)]
pub struct TrendSummary {
    pub key: BenchmarkKey,
    /// The "average line": mean of all plotted values.
    pub mean: f64,
    pub points: Vec<TrendPoint>,
    pub lower_is_better: bool,
}

impl TrendSummary {
    pub fn latest(&self) -> Option<&TrendPoint> {
        self.points.last()
    }
}

/// Compute percent-change annotations and the average line for a history.
///
/// Positive percent change always means improvement: for latency the sign
/// is inverted, because lower is better there.
pub fn analyze(key: BenchmarkKey, entries: &[HistoryEntry]) -> TrendSummary {
    let values: Vec<f64> = entries
        .iter()
        .map(|entry| entry.result.primary_metric)
        .collect();
    let mean = if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    };
    let lower_is_better = key.lower_is_better();
    let points = values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let percent_change = if i == 0 {
                None
            } else {
                let prev = values[i - 1];
                if prev <= 0.0 {
                    None
                } else if lower_is_better {
                    Some((prev - value) / prev * 100.0)
                } else {
                    Some((value - prev) / prev * 100.0)
                }
            };
            TrendPoint {
                value,
                percent_change,
            }
        })
        .collect();
    TrendSummary {
        key,
        mean,
        points,
        lower_is_better,
    }
}
