//! Forecast orchestration.
//!
//! Runs every applicable method against a series, scores them, selects the
//! best performer, and optionally attaches walk-forward confidence
//! intervals to it.

mod walk_forward;

pub use walk_forward::{OneStepForecast, WalkForward};

use crate::core::{
    future_timestamps, ConfidenceIntervals, ForecastResult, Frequency, MethodForecast, TimeSeries,
};
use crate::detection::detect_seasonal_period;
use crate::error::{ForecastError, Result};
use crate::models::{Method, MethodParams};
use crate::utils::quantile_normal;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Fewest observations any method can forecast from.
const MIN_OBSERVATIONS: usize = 3;

/// Per-step widening factor applied to interval bounds.
const INTERVAL_WIDENING: f64 = 0.1;

/// Options for a forecast run.
#[derive(Debug, Clone, Default)]
pub struct ForecastOptions {
    /// Pin a single method instead of running all applicable ones.
    pub method: Option<Method>,
    /// Forecast horizon; the frequency default applies when absent.
    pub horizon: Option<usize>,
    /// Method parameters; the seasonal period is detected when unset.
    pub params: MethodParams,
}

/// Run forecasts from raw request data.
///
/// This is the in-process equivalent of the service boundary: ISO-ish
/// timestamp strings, raw values, a frequency name, and options go in, a
/// JSON-serializable [`ForecastResult`] with confidence intervals on the
/// best method comes out.
pub fn forecast(
    time_values: &[String],
    values: &[f64],
    frequency: &str,
    options: &ForecastOptions,
    confidence_level: f64,
) -> Result<ForecastResult> {
    let frequency: Frequency = frequency.parse().unwrap_or_default();
    let series = TimeSeries::from_strings(time_values, values.to_vec())?;
    let mut result = generate_forecasts(&series, frequency, options)?;
    generate_confidence_intervals(series.values(), &mut result, confidence_level);
    Ok(result)
}

/// Run every applicable method against a series.
///
/// Requires at least 3 observations; shorter input produces an empty
/// method set with a reason rather than an error. Seasonal methods only
/// run when two full seasons are observed, unless explicitly pinned. The
/// best method is the one with the lowest non-null accuracy.
pub fn generate_forecasts(
    series: &TimeSeries,
    frequency: Frequency,
    options: &ForecastOptions,
) -> Result<ForecastResult> {
    let horizon = options.horizon.unwrap_or_else(|| frequency.default_horizon());
    if horizon == 0 {
        return Err(ForecastError::InvalidParameter(
            "horizon must be positive".to_string(),
        ));
    }

    let values = series.values();
    let n = values.len();
    if n < MIN_OBSERVATIONS {
        return Ok(ForecastResult::empty(
            horizon,
            format!(
                "at least {} observations are required, got {}",
                MIN_OBSERVATIONS, n
            ),
        ));
    }

    let mut params = options.params.clone();
    if params.seasonal_period.is_none() {
        params.seasonal_period = Some(detect_seasonal_period(values, frequency));
    }
    let period = params.period();

    let methods: Vec<Method> = match options.method {
        Some(method) => vec![method],
        None => Method::ALL
            .into_iter()
            .filter(|m| !m.is_seasonal() || n >= 2 * period)
            .collect(),
    };

    let mut entries: BTreeMap<String, MethodForecast> = BTreeMap::new();
    for method in methods {
        let entry = match method.forecast(values, &params, horizon) {
            Ok(forecast) => {
                let accuracy = method.accuracy(values, &params);
                MethodForecast::new(method, forecast, accuracy, params.clone())
            }
            Err(err) => {
                debug!(method = %method, error = %err, "method failed; recording error entry");
                MethodForecast::failed(method, params.clone(), err.to_string())
            }
        };
        entries.insert(method.name().to_string(), entry);
    }

    let best_method = entries
        .values()
        .filter(|e| e.error.is_none())
        .filter_map(|e| e.accuracy.map(|a| (e.method, a)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(method, _)| method);

    debug!(
        methods = entries.len(),
        best = best_method.map(|m| m.name()).unwrap_or("none"),
        horizon,
        "generated forecasts"
    );

    Ok(ForecastResult {
        horizon,
        future_timestamps: future_timestamps(series, frequency, horizon),
        methods: entries,
        best_method,
        reason: None,
    })
}

/// Attach confidence intervals to the best method's forecast.
///
/// One-step-ahead errors are estimated by walk-forward re-forecasting over
/// the last third of history; their RMSE is scaled by the normal critical
/// value for `confidence_level` and widened linearly per forecast step.
/// Never fatal: on any failure the result is left unchanged.
pub fn generate_confidence_intervals(
    values: &[f64],
    result: &mut ForecastResult,
    confidence_level: f64,
) {
    if confidence_level <= 0.0 || confidence_level >= 1.0 {
        warn!(confidence_level, "invalid confidence level; skipping intervals");
        return;
    }

    let Some(best) = result.best_method else {
        return;
    };
    let Some(entry) = result.methods.get(best.name()) else {
        return;
    };
    if entry.values.is_empty() || values.len() < 2 {
        return;
    }
    let params = entry.params.clone();

    let steps: Result<Vec<OneStepForecast>> =
        WalkForward::over_last_third(best, &params, values).collect();
    let steps = match steps {
        Ok(steps) if !steps.is_empty() => steps,
        Ok(_) => return,
        Err(err) => {
            warn!(method = %best, error = %err, "interval estimation failed; leaving forecasts unchanged");
            return;
        }
    };

    let rmse = (steps.iter().map(|s| s.error().powi(2)).sum::<f64>() / steps.len() as f64).sqrt();
    let z = quantile_normal((1.0 + confidence_level) / 2.0);

    let entry = result
        .methods
        .get_mut(best.name())
        .expect("best entry exists");
    let mut lower = Vec::with_capacity(entry.values.len());
    let mut upper = Vec::with_capacity(entry.values.len());
    for (step, &value) in entry.values.iter().enumerate() {
        let margin = z * rmse * (1.0 + INTERVAL_WIDENING * step as f64);
        lower.push(value - margin);
        upper.push(value + margin);
    }

    entry.intervals = Some(ConfidenceIntervals {
        level: confidence_level,
        lower,
        upper,
        rmse,
    });
}
