//! Naive forecasting.
//!
//! The naive method repeats the last observed value for every future period.

use crate::error::{ForecastError, Result};

/// Forecast by repeating the last observed value.
pub fn naive_forecast(values: &[f64], horizon: usize) -> Result<Vec<f64>> {
    let last = values.last().copied().ok_or(ForecastError::EmptyData)?;
    Ok(vec![last; horizon])
}
