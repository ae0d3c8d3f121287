//! Hyperparameter tuning.
//!
//! Each method exposes a small parameter grid; the full Cartesian product
//! is enumerated and scored by forecasting a held-out tail slice with the
//! configured primary metric. Methods without tunable parameters (naive,
//! linear regression) return their defaults untouched.

use crate::core::Frequency;
use crate::error::{ForecastError, Result};
use crate::models::{Method, MethodParams};
use crate::validation::metrics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Alpha grid shared by the smoothing methods.
const ALPHA_GRID: [f64; 5] = [0.1, 0.3, 0.5, 0.7, 0.9];
/// Beta grid for trend smoothing.
const BETA_GRID: [f64; 4] = [0.05, 0.1, 0.2, 0.3];
/// Gamma grid for seasonal smoothing.
const GAMMA_GRID: [f64; 3] = [0.05, 0.1, 0.3];
/// Window grid for moving averages.
const WINDOW_GRID: [usize; 6] = [3, 5, 7, 10, 14, 30];
/// Candidate periods when neither options nor frequency pin one.
const FALLBACK_PERIODS: [usize; 3] = [4, 7, 12];

/// Metric a grid search optimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TuningMetric {
    #[default]
    Mape,
    Rmse,
    Mae,
    Smape,
    RSquared,
}

impl TuningMetric {
    /// Score a forecast; `None` when the metric is undefined for the data.
    fn score(&self, actual: &[f64], forecast: &[f64]) -> Option<f64> {
        match self {
            TuningMetric::Mape => metrics::mape(actual, forecast),
            TuningMetric::Rmse => metrics::rmse(actual, forecast),
            TuningMetric::Mae => metrics::mae(actual, forecast),
            TuningMetric::Smape => metrics::smape(actual, forecast),
            TuningMetric::RSquared => metrics::r_squared(actual, forecast),
        }
    }

    /// R² is a goodness score; everything else is an error.
    fn maximize(&self) -> bool {
        matches!(self, TuningMetric::RSquared)
    }

    /// True when `candidate` beats `incumbent` under this metric.
    fn improves(&self, candidate: f64, incumbent: f64) -> bool {
        if self.maximize() {
            candidate > incumbent
        } else {
            candidate < incumbent
        }
    }
}

/// Grid search configuration.
#[derive(Debug, Clone)]
pub struct TuningOptions {
    /// Primary metric, minimized (or maximized for R²).
    pub metric: TuningMetric,
    /// Fraction of the series held out for scoring.
    pub validation_fraction: f64,
    /// Base parameters; also the fallback when no candidate scores.
    pub params: MethodParams,
}

impl Default for TuningOptions {
    fn default() -> Self {
        Self {
            metric: TuningMetric::default(),
            validation_fraction: 0.2,
            params: MethodParams::default(),
        }
    }
}

/// Outcome of tuning one method.
#[derive(Debug, Clone)]
pub struct TuningResult {
    pub method: Method,
    /// Best parameters found, or the defaults when nothing scored.
    pub params: MethodParams,
    /// Score of the returned parameters under the primary metric.
    pub score: Option<f64>,
    /// Number of grid combinations evaluated.
    pub evaluated: usize,
}

/// Grid-search one method's parameter space.
pub fn tune_method(
    method: Method,
    values: &[f64],
    frequency: Frequency,
    options: &TuningOptions,
) -> Result<TuningResult> {
    if !(0.0..1.0).contains(&options.validation_fraction) {
        return Err(ForecastError::InvalidParameter(
            "validation fraction must be in [0, 1)".to_string(),
        ));
    }

    let grid = build_grid(method, frequency, &options.params);
    if grid.is_empty() {
        return Ok(TuningResult {
            method,
            params: options.params.clone(),
            score: None,
            evaluated: 0,
        });
    }

    let n = values.len();
    let holdout = ((n as f64) * options.validation_fraction).round().max(1.0) as usize;
    if n <= holdout {
        return Ok(TuningResult {
            method,
            params: options.params.clone(),
            score: None,
            evaluated: 0,
        });
    }
    let (train, test) = values.split_at(n - holdout);

    let mut best: Option<(MethodParams, f64)> = None;
    let mut evaluated = 0;
    for candidate in &grid {
        evaluated += 1;
        let Ok(forecast) = method.forecast(train, candidate, holdout) else {
            continue;
        };
        let Some(score) = options.metric.score(test, &forecast) else {
            continue;
        };
        match &best {
            Some((_, incumbent)) if !options.metric.improves(score, *incumbent) => {}
            _ => best = Some((candidate.clone(), score)),
        }
    }

    debug!(
        method = %method,
        combinations = grid.len(),
        found = best.is_some(),
        "grid search finished"
    );

    match best {
        Some((params, score)) => Ok(TuningResult {
            method,
            params,
            score: Some(score),
            evaluated,
        }),
        None => Ok(TuningResult {
            method,
            params: options.params.clone(),
            score: None,
            evaluated,
        }),
    }
}

/// Tune every method and return results keyed by wire name.
pub fn tune_all(
    values: &[f64],
    frequency: Frequency,
    options: &TuningOptions,
) -> Result<BTreeMap<String, TuningResult>> {
    let mut results = BTreeMap::new();
    for method in Method::ALL {
        let result = tune_method(method, values, frequency, options)?;
        results.insert(method.name().to_string(), result);
    }
    Ok(results)
}

/// Candidate seasonal periods for tuning.
fn period_candidates(frequency: Frequency, params: &MethodParams) -> Vec<usize> {
    if let Some(period) = params.seasonal_period {
        return vec![period];
    }
    match frequency.canonical_period() {
        Some(period) => vec![period],
        None => FALLBACK_PERIODS.to_vec(),
    }
}

/// Full Cartesian parameter grid for a method.
fn build_grid(method: Method, frequency: Frequency, base: &MethodParams) -> Vec<MethodParams> {
    match method {
        // No tunable parameters.
        Method::Naive | Method::LinearRegression => Vec::new(),

        Method::MovingAverage => WINDOW_GRID
            .iter()
            .map(|&window| base.clone().with_window(window))
            .collect(),

        Method::ExponentialSmoothing => ALPHA_GRID
            .iter()
            .map(|&alpha| base.clone().with_alpha(alpha))
            .collect(),

        Method::DoubleExponentialSmoothing => {
            let mut grid = Vec::new();
            for &alpha in &ALPHA_GRID {
                for &beta in &BETA_GRID {
                    grid.push(base.clone().with_alpha(alpha).with_beta(beta));
                }
            }
            grid
        }

        Method::SeasonalNaive => period_candidates(frequency, base)
            .into_iter()
            .map(|period| base.clone().with_seasonal_period(period))
            .collect(),

        Method::HoltWinters => {
            let mut grid = Vec::new();
            for period in period_candidates(frequency, base) {
                for &alpha in &ALPHA_GRID {
                    for &beta in &BETA_GRID {
                        for &gamma in &GAMMA_GRID {
                            grid.push(
                                base.clone()
                                    .with_alpha(alpha)
                                    .with_beta(beta)
                                    .with_gamma(gamma)
                                    .with_seasonal_period(period),
                            );
                        }
                    }
                }
            }
            grid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seasonal_values(n: usize, period: usize) -> Vec<f64> {
        let pattern = [1.0, 1.3, 0.7, 1.0, 0.9, 1.1, 1.0];
        (0..n)
            .map(|i| (100.0 + 0.5 * i as f64) * pattern[i % period.min(7)])
            .collect()
    }

    #[test]
    fn methods_without_grids_keep_their_defaults() {
        let values = seasonal_values(40, 7);
        let options = TuningOptions::default();

        for method in [Method::Naive, Method::LinearRegression] {
            let result = tune_method(method, &values, Frequency::Daily, &options).unwrap();
            assert_eq!(result.params, options.params);
            assert_eq!(result.evaluated, 0);
            assert!(result.score.is_none());
        }
    }

    #[test]
    fn moving_average_tunes_over_window_grid() {
        let values = seasonal_values(50, 7);
        let result = tune_method(
            Method::MovingAverage,
            &values,
            Frequency::Daily,
            &TuningOptions::default(),
        )
        .unwrap();

        assert_eq!(result.evaluated, WINDOW_GRID.len());
        assert!(WINDOW_GRID.contains(&result.params.window));
        assert!(result.score.is_some());
    }

    #[test]
    fn best_candidate_actually_scores_best() {
        let values = seasonal_values(60, 7);
        let options = TuningOptions::default();
        let result =
            tune_method(Method::ExponentialSmoothing, &values, Frequency::Daily, &options).unwrap();

        let best_score = result.score.unwrap();
        let holdout = 12; // 60 * 0.2
        let (train, test) = values.split_at(values.len() - holdout);
        for &alpha in &ALPHA_GRID {
            let params = options.params.clone().with_alpha(alpha);
            let forecast = Method::ExponentialSmoothing
                .forecast(train, &params, holdout)
                .unwrap();
            let score = metrics::mape(test, &forecast).unwrap();
            assert!(best_score <= score + 1e-12);
        }
    }

    #[test]
    fn explicit_period_narrows_the_candidates() {
        let params = MethodParams::default().with_seasonal_period(7);
        assert_eq!(period_candidates(Frequency::Irregular, &params), vec![7]);

        let detected = MethodParams::default();
        assert_eq!(period_candidates(Frequency::Monthly, &detected), vec![12]);
        assert_eq!(
            period_candidates(Frequency::Irregular, &detected),
            FALLBACK_PERIODS.to_vec()
        );
    }

    #[test]
    fn holt_winters_grid_is_full_cartesian_product() {
        let grid = build_grid(
            Method::HoltWinters,
            Frequency::Daily,
            &MethodParams::default(),
        );
        assert_eq!(grid.len(), ALPHA_GRID.len() * BETA_GRID.len() * GAMMA_GRID.len());
    }

    #[test]
    fn r_squared_is_maximized() {
        assert!(TuningMetric::RSquared.improves(0.9, 0.5));
        assert!(!TuningMetric::RSquared.improves(0.2, 0.5));
        assert!(TuningMetric::Mape.improves(1.0, 5.0));
    }

    #[test]
    fn too_short_series_falls_back_to_defaults() {
        let values = vec![1.0, 2.0];
        let options = TuningOptions::default();
        let result =
            tune_method(Method::MovingAverage, &values, Frequency::Daily, &options).unwrap();

        assert_eq!(result.params, options.params);
        assert!(result.score.is_none());
    }

    #[test]
    fn all_zero_holdout_falls_back_to_defaults() {
        // MAPE is undefined against all-zero actuals for every candidate.
        let mut values = vec![5.0; 20];
        for v in values.iter_mut().skip(16) {
            *v = 0.0;
        }
        let options = TuningOptions::default();
        let result =
            tune_method(Method::ExponentialSmoothing, &values, Frequency::Daily, &options).unwrap();

        assert_eq!(result.evaluated, ALPHA_GRID.len());
        assert!(result.score.is_none());
        assert_eq!(result.params, options.params);
    }

    #[test]
    fn invalid_validation_fraction_is_rejected() {
        let options = TuningOptions {
            validation_fraction: 1.5,
            ..Default::default()
        };
        let result = tune_method(Method::Naive, &[1.0; 10], Frequency::Daily, &options);
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn tune_all_covers_every_method() {
        let values = seasonal_values(60, 7);
        let results = tune_all(&values, Frequency::Daily, &TuningOptions::default()).unwrap();
        assert_eq!(results.len(), Method::ALL.len());
        assert!(results.contains_key("holt_winters"));
    }
}
