//! Linear regression forecasting.
//!
//! Ordinary least squares over the observation index, extrapolated past
//! the end of the series.

use crate::error::{ForecastError, Result};

/// Fit a least-squares line through (index, value) pairs.
///
/// Returns `(slope, intercept)`. A single observation yields a flat line
/// through it.
pub fn fit_line(values: &[f64]) -> (f64, f64) {
    let n = values.len();
    if n < 2 {
        return (0.0, values.first().copied().unwrap_or(0.0));
    }

    let n_f = n as f64;
    let x_mean = (n_f - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n_f;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }

    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    (slope, y_mean - slope * x_mean)
}

/// Forecast by extrapolating the fitted line beyond the series length.
///
/// With fewer than 2 observations the forecast degenerates to repeating
/// the last value.
pub fn linear_regression_forecast(values: &[f64], horizon: usize) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if values.len() < 2 {
        return Ok(vec![values[0]; horizon]);
    }

    let (slope, intercept) = fit_line(values);
    let n = values.len();
    Ok((0..horizon)
        .map(|i| intercept + slope * (n + i) as f64)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fits_perfectly_linear_input() {
        let (slope, intercept) = fit_line(&[1.0, 3.0, 5.0, 7.0, 9.0]);
        assert_relative_eq!(slope, 2.0, epsilon = 1e-10);
        assert_relative_eq!(intercept, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn extrapolates_beyond_series_end() {
        let forecast = linear_regression_forecast(&[1.0, 3.0, 5.0, 7.0, 9.0], 1).unwrap();
        assert_relative_eq!(forecast[0], 11.0, epsilon = 1e-10);
    }

    #[test]
    fn multi_step_extrapolation_continues_the_line() {
        let forecast = linear_regression_forecast(&[1.0, 3.0, 5.0, 7.0, 9.0], 3).unwrap();
        assert_relative_eq!(forecast[0], 11.0, epsilon = 1e-10);
        assert_relative_eq!(forecast[1], 13.0, epsilon = 1e-10);
        assert_relative_eq!(forecast[2], 15.0, epsilon = 1e-10);
    }

    #[test]
    fn single_observation_repeats_itself() {
        let forecast = linear_regression_forecast(&[4.2], 3).unwrap();
        assert_eq!(forecast, vec![4.2, 4.2, 4.2]);
    }

    #[test]
    fn constant_series_has_zero_slope() {
        let (slope, intercept) = fit_line(&[5.0; 10]);
        assert_relative_eq!(slope, 0.0, epsilon = 1e-10);
        assert_relative_eq!(intercept, 5.0, epsilon = 1e-10);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            linear_regression_forecast(&[], 1),
            Err(ForecastError::EmptyData)
        ));
    }
}
