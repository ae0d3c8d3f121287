//! Seasonal naive forecasting.
//!
//! Each forecast step repeats the observation from the same phase of the
//! last full season.

use crate::error::{ForecastError, Result};

/// Forecast by cycling through the last observed season.
///
/// Step `i` takes `values[n - period + (i mod period)]`, so forecasts
/// beyond one season wrap around the same window.
pub fn seasonal_naive_forecast(values: &[f64], period: usize, horizon: usize) -> Result<Vec<f64>> {
    if period == 0 {
        return Err(ForecastError::InvalidParameter(
            "seasonal period must be positive".to_string(),
        ));
    }
    if values.len() < period {
        return Err(ForecastError::InsufficientData {
            needed: period,
            got: values.len(),
        });
    }

    let n = values.len();
    Ok((0..horizon)
        .map(|i| values[n - period + (i % period)])
        .collect())
}
