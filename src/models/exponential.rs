//! Single and double exponential smoothing.
//!
//! The single-parameter smoother deliberately produces a flat forecast at
//! the final level: this is textbook simple exponential smoothing, not a
//! trend-aware method. Callers wanting trend continuation should use the
//! double (Holt) variant.

use crate::error::{ForecastError, Result};

/// Simple exponential smoothing.
///
/// Recursion: `level = α·y + (1-α)·level`, initialized with the first
/// observation. The forecast repeats the final level for every step.
pub fn exponential_smoothing_forecast(values: &[f64], alpha: f64, horizon: usize) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let alpha = alpha.clamp(0.0001, 0.9999);
    let mut level = values[0];
    for &y in &values[1..] {
        level = alpha * y + (1.0 - alpha) * level;
    }

    Ok(vec![level; horizon])
}

/// Double exponential smoothing (Holt's linear trend).
///
/// Recursions:
/// - Level: `l_t = α·y_t + (1-α)·(l_{t-1} + b_{t-1})`
/// - Trend: `b_t = β·(l_t - l_{t-1}) + (1-β)·b_{t-1}`
/// - Forecast: `ŷ_{t+h} = l_t + h·b_t`
///
/// A single observation degenerates to repeating that value.
pub fn double_exponential_smoothing_forecast(
    values: &[f64],
    alpha: f64,
    beta: f64,
    horizon: usize,
) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if values.len() < 2 {
        return Ok(vec![values[0]; horizon]);
    }

    let alpha = alpha.clamp(0.0001, 0.9999);
    let beta = beta.clamp(0.0001, 0.9999);

    let mut level = values[0];
    let mut trend = values[1] - values[0];

    for &y in &values[1..] {
        let level_prev = level;
        level = alpha * y + (1.0 - alpha) * (level_prev + trend);
        trend = beta * (level - level_prev) + (1.0 - beta) * trend;
    }

    Ok((1..=horizon)
        .map(|h| level + h as f64 * trend)
        .collect())
}
