//! Fixed-weight combination of the six metrics.

use crate::config::WeightsConfig;
use crate::types::QualityMetrics;

/// Weighted sum of the metrics, clamped to `[0, 1]`.
///
/// With non-negative weights the result is monotonically non-decreasing in
/// every metric.
pub fn combine(metrics: &QualityMetrics, weights: &WeightsConfig) -> f64 {
    let total: f64 = metrics
        .as_array()
        .iter()
        .zip(weights.as_array())
        .map(|(metric, weight)| metric * weight)
        .sum();
    if total.is_nan() {
        return 0.0;
    }
    total.clamp(0.0, 1.0)
}
