//! Forecast result structures.

use crate::models::{Method, MethodParams};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Confidence interval bounds attached to a method's forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceIntervals {
    /// Confidence level, e.g. 0.95.
    pub level: f64,
    /// Lower bound per forecast step.
    pub lower: Vec<f64>,
    /// Upper bound per forecast step.
    pub upper: Vec<f64>,
    /// One-step-ahead RMSE the bounds are derived from.
    pub rmse: f64,
}

/// One method's contribution to a forecast result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodForecast {
    pub method: Method,
    /// Point forecast, length equal to the horizon (empty when `error` is set).
    pub values: Vec<f64>,
    /// Half-split holdout MAPE; lower is better. `None` when the series is
    /// too short or has no scorable points.
    pub accuracy: Option<f64>,
    pub params: MethodParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intervals: Option<ConfidenceIntervals>,
    /// Set when this method failed; sibling methods are unaffected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MethodForecast {
    /// A successful forecast entry.
    pub fn new(method: Method, values: Vec<f64>, accuracy: Option<f64>, params: MethodParams) -> Self {
        Self {
            method,
            values,
            accuracy,
            params,
            intervals: None,
            error: None,
        }
    }

    /// An entry recording a per-method failure.
    pub fn failed(method: Method, params: MethodParams, error: String) -> Self {
        Self {
            method,
            values: Vec::new(),
            accuracy: None,
            params,
            intervals: None,
            error: Some(error),
        }
    }
}

/// Combined multi-method forecast output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    pub horizon: usize,
    pub future_timestamps: Vec<DateTime<Utc>>,
    /// Per-method forecasts, keyed by wire name for stable serialization.
    pub methods: BTreeMap<String, MethodForecast>,
    /// Method with the lowest non-null accuracy, when any method has one.
    pub best_method: Option<Method>,
    /// Why no forecasts were produced, when `methods` is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ForecastResult {
    /// An empty result carrying only an explanation.
    pub fn empty(horizon: usize, reason: impl Into<String>) -> Self {
        Self {
            horizon,
            future_timestamps: Vec::new(),
            methods: BTreeMap::new(),
            best_method: None,
            reason: Some(reason.into()),
        }
    }

    /// Get a method's entry.
    pub fn method(&self, method: Method) -> Option<&MethodForecast> {
        self.methods.get(method.name())
    }

    /// Get the best method's entry.
    pub fn best(&self) -> Option<&MethodForecast> {
        self.best_method.and_then(|m| self.method(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_carries_reason() {
        let result = ForecastResult::empty(5, "not enough history");
        assert_eq!(result.horizon, 5);
        assert!(result.methods.is_empty());
        assert!(result.best_method.is_none());
        assert_eq!(result.reason.as_deref(), Some("not enough history"));
    }

    #[test]
    fn best_resolves_through_method_map() {
        let mut result = ForecastResult::empty(2, "");
        result.reason = None;
        result.methods.insert(
            Method::Naive.name().to_string(),
            MethodForecast::new(Method::Naive, vec![1.0, 1.0], Some(4.2), MethodParams::default()),
        );
        result.best_method = Some(Method::Naive);

        let best = result.best().unwrap();
        assert_eq!(best.method, Method::Naive);
        assert_eq!(best.accuracy, Some(4.2));
    }

    #[test]
    fn serializes_null_accuracy_and_omits_missing_intervals() {
        let entry = MethodForecast::new(Method::Naive, vec![1.0], None, MethodParams::default());
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["accuracy"], serde_json::Value::Null);
        assert!(json.get("intervals").is_none());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn failed_entry_records_the_error() {
        let entry = MethodForecast::failed(
            Method::SeasonalNaive,
            MethodParams::default(),
            "insufficient data".to_string(),
        );
        assert!(entry.values.is_empty());
        assert_eq!(entry.error.as_deref(), Some("insufficient data"));
    }
}
