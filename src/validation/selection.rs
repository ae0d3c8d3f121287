//! Best-model selection over validation results.

use crate::models::Method;
use crate::validation::metrics::ForecastMetrics;
use serde::{Deserialize, Serialize};

/// One candidate's validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub method: Method,
    pub metrics: ForecastMetrics,
}

/// Pick the best candidate.
///
/// Lowest MAPE wins; when no candidate has a MAPE, lowest RMSE, then
/// lowest MAE, then the first candidate with any result at all.
pub fn select_best_model(results: &[ValidationResult]) -> Option<&ValidationResult> {
    fn lowest_by<'a>(
        results: &'a [ValidationResult],
        get: fn(&ForecastMetrics) -> Option<f64>,
    ) -> Option<&'a ValidationResult> {
        results
            .iter()
            .filter_map(|r| get(&r.metrics).map(|v| (r, v)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(r, _)| r)
    }

    lowest_by(results, |m| m.mape)
        .or_else(|| lowest_by(results, |m| m.rmse))
        .or_else(|| lowest_by(results, |m| m.mae))
        .or_else(|| results.first())
}
