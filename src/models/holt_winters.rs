//! Holt-Winters triple exponential smoothing.
//!
//! Tracks level, trend, and multiplicative per-phase seasonal factors.
//! Seasonal factors are estimated from the first two observed seasons and
//! renormalized to mean 1 before the recursive update loop; for noisy
//! short series this two-season initialization is a known accuracy
//! limitation.

use crate::error::{ForecastError, Result};
use crate::models::double_exponential_smoothing_forecast;
use crate::utils::mean;

/// Holt-Winters multiplicative forecast.
///
/// The recursions (with seasonal period `m`, phase `t mod m`):
/// - Level: `l_t = α·(y_t / s_{t-m}) + (1-α)·(l_{t-1} + b_{t-1})`
/// - Trend: `b_t = β·(l_t - l_{t-1}) + (1-β)·b_{t-1}`
/// - Seasonal: `s_t = γ·(y_t / l_t) + (1-γ)·s_{t-m}`
/// - Forecast: `ŷ_{t+h} = (l_t + h·b_t) · s_{t+h-m}`
///
/// Requires at least two full seasons; shorter series fall back to double
/// exponential smoothing with the same `alpha` and `beta`.
pub fn holt_winters_forecast(
    values: &[f64],
    alpha: f64,
    beta: f64,
    gamma: f64,
    period: usize,
    horizon: usize,
) -> Result<Vec<f64>> {
    if period == 0 {
        return Err(ForecastError::InvalidParameter(
            "seasonal period must be positive".to_string(),
        ));
    }
    if values.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let n = values.len();
    if n < 2 * period {
        return double_exponential_smoothing_forecast(values, alpha, beta, horizon);
    }

    let alpha = alpha.clamp(0.0001, 0.9999);
    let beta = beta.clamp(0.0001, 0.9999);
    let gamma = gamma.clamp(0.0001, 0.9999);

    let season1_mean = mean(&values[..period]);
    let season2_mean = mean(&values[period..2 * period]);

    // Initial level and trend from the first two seasons.
    let mut level = season1_mean;
    let mut trend = (0..period)
        .map(|i| (values[period + i] - values[i]) / period as f64)
        .sum::<f64>()
        / period as f64;

    // Seasonal factors: per-phase ratio to the season mean, averaged over
    // both initialization seasons.
    let mut seasonals: Vec<f64> = (0..period)
        .map(|i| {
            let mut sum = 0.0;
            let mut count = 0;
            if season1_mean.abs() > 1e-10 {
                sum += values[i] / season1_mean;
                count += 1;
            }
            if season2_mean.abs() > 1e-10 {
                sum += values[period + i] / season2_mean;
                count += 1;
            }
            if count == 0 {
                1.0
            } else {
                sum / count as f64
            }
        })
        .collect();

    // Renormalize to mean 1.
    let seasonal_mean = mean(&seasonals);
    if seasonal_mean.abs() > 1e-10 {
        for s in seasonals.iter_mut() {
            *s /= seasonal_mean;
        }
    }

    for (t, &y) in values.iter().enumerate().skip(period) {
        let phase = t % period;
        let s = seasonals[phase];
        let s_safe = if s.abs() > 1e-10 { s } else { 1.0 };

        let level_prev = level;
        level = alpha * (y / s_safe) + (1.0 - alpha) * (level_prev + trend);
        trend = beta * (level - level_prev) + (1.0 - beta) * trend;

        let level_safe = if level.abs() > 1e-10 { level } else { 1.0 };
        seasonals[phase] = gamma * (y / level_safe) + (1.0 - gamma) * s;
    }

    Ok((0..horizon)
        .map(|h| {
            let phase = (n + h) % period;
            (level + (h + 1) as f64 * trend) * seasonals[phase]
        })
        .collect())
}
