//! Walk-forward cross-validation.
//!
//! Folds are non-overlapping test windows at the tail of the series, each
//! trained on everything that precedes it. Per-method failures inside a
//! fold are recorded and never abort sibling methods or folds.

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::models::{Method, MethodParams};
use crate::validation::metrics::{calculate_metrics, ForecastMetrics};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

/// Cross-validation configuration.
#[derive(Debug, Clone)]
pub struct CvOptions {
    /// Test window length per fold.
    pub horizon: usize,
    /// Number of folds.
    pub num_folds: usize,
    /// Minimum observations the earliest fold must train on.
    pub min_train_size: usize,
    /// Methods to evaluate.
    pub methods: Vec<Method>,
    /// Parameters shared by all evaluated methods.
    pub params: MethodParams,
}

impl Default for CvOptions {
    fn default() -> Self {
        Self {
            horizon: 6,
            num_folds: 3,
            min_train_size: 10,
            methods: Method::ALL.to_vec(),
            params: MethodParams::default(),
        }
    }
}

impl CvOptions {
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_num_folds(mut self, num_folds: usize) -> Self {
        self.num_folds = num_folds;
        self
    }

    pub fn with_methods(mut self, methods: Vec<Method>) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_params(mut self, params: MethodParams) -> Self {
        self.params = params;
        self
    }
}

/// One train/test partition.
///
/// The test window never precedes its training window, and test windows of
/// successive folds never overlap.
#[derive(Debug, Clone)]
pub struct CvFold {
    pub train_timestamps: Vec<DateTime<Utc>>,
    pub train_values: Vec<f64>,
    pub test_timestamps: Vec<DateTime<Utc>>,
    pub test_values: Vec<f64>,
}

/// Per-method cross-validation outcome.
#[derive(Debug, Clone, Default)]
pub struct MethodCvResult {
    /// Metrics averaged across the folds that produced them.
    pub mean_metrics: ForecastMetrics,
    /// Raw metrics per successful fold.
    pub fold_metrics: Vec<ForecastMetrics>,
    /// Failure descriptions, one per failed fold.
    pub errors: Vec<String>,
}

/// Full cross-validation result.
#[derive(Debug, Clone)]
pub struct CvResult {
    pub folds: usize,
    pub methods: BTreeMap<String, MethodCvResult>,
    /// Lowest mean MAPE; RMSE breaks a tie when no method has MAPE.
    pub best_method: Option<Method>,
}

/// Construct walk-forward folds at the tail of the series.
pub fn build_folds(
    series: &TimeSeries,
    horizon: usize,
    num_folds: usize,
    min_train_size: usize,
) -> Result<Vec<CvFold>> {
    if horizon == 0 || num_folds == 0 {
        return Err(ForecastError::InvalidParameter(
            "horizon and fold count must be positive".to_string(),
        ));
    }

    let n = series.len();
    let required = min_train_size + horizon * num_folds;
    if n < required {
        return Err(ForecastError::InsufficientData {
            needed: required,
            got: n,
        });
    }

    let timestamps = series.timestamps();
    let values = series.values();

    Ok((0..num_folds)
        .map(|fold| {
            // Oldest fold first; each test window directly precedes the next.
            let test_start = n - horizon * (num_folds - fold);
            let test_end = test_start + horizon;
            CvFold {
                train_timestamps: timestamps[..test_start].to_vec(),
                train_values: values[..test_start].to_vec(),
                test_timestamps: timestamps[test_start..test_end].to_vec(),
                test_values: values[test_start..test_end].to_vec(),
            }
        })
        .collect())
}

/// Run walk-forward cross-validation over the configured methods.
pub fn cross_validate(series: &TimeSeries, options: &CvOptions) -> Result<CvResult> {
    let folds = build_folds(series, options.horizon, options.num_folds, options.min_train_size)?;

    let mut methods: BTreeMap<String, MethodCvResult> = BTreeMap::new();

    for method in &options.methods {
        let mut outcome = MethodCvResult::default();

        for (i, fold) in folds.iter().enumerate() {
            match method.forecast(&fold.train_values, &options.params, options.horizon) {
                Ok(forecast) => {
                    outcome
                        .fold_metrics
                        .push(calculate_metrics(&fold.test_values, &forecast));
                }
                Err(err) => {
                    debug!(method = %method, fold = i, error = %err, "fold evaluation failed");
                    outcome.errors.push(format!("fold {}: {}", i, err));
                }
            }
        }

        outcome.mean_metrics = mean_metrics(&outcome.fold_metrics);
        methods.insert(method.name().to_string(), outcome);
    }

    let best_method = pick_best(&methods);
    Ok(CvResult {
        folds: folds.len(),
        methods,
        best_method,
    })
}

/// Average each metric over the folds that produced it.
fn mean_metrics(folds: &[ForecastMetrics]) -> ForecastMetrics {
    fn mean_of(folds: &[ForecastMetrics], get: impl Fn(&ForecastMetrics) -> Option<f64>) -> Option<f64> {
        let values: Vec<f64> = folds.iter().filter_map(&get).collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }

    ForecastMetrics {
        mape: mean_of(folds, |m| m.mape),
        rmse: mean_of(folds, |m| m.rmse),
        mae: mean_of(folds, |m| m.mae),
        r_squared: mean_of(folds, |m| m.r_squared),
        mase: mean_of(folds, |m| m.mase),
        smape: mean_of(folds, |m| m.smape),
        bias: mean_of(folds, |m| m.bias),
    }
}

fn pick_best(methods: &BTreeMap<String, MethodCvResult>) -> Option<Method> {
    fn best_by(
        methods: &BTreeMap<String, MethodCvResult>,
        get: fn(&ForecastMetrics) -> Option<f64>,
    ) -> Option<Method> {
        methods
            .iter()
            .filter_map(|(name, outcome)| {
                let method = name.parse::<Method>().ok()?;
                let value = get(&outcome.mean_metrics)?;
                Some((method, value))
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(method, _)| method)
    }

    best_by(methods, |m| m.mape).or_else(|| best_by(methods, |m| m.rmse))
}
