//! Moving average forecasting.
//!
//! Forecasts the mean of the last `window` observations, repeated for the
//! whole horizon. Windows longer than the series shrink to the series
//! length rather than failing.

use crate::error::{ForecastError, Result};

/// Forecast with the mean of the last `min(window, n)` values.
pub fn moving_average_forecast(values: &[f64], window: usize, horizon: usize) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(ForecastError::InvalidParameter(
            "moving average window must be positive".to_string(),
        ));
    }
    if values.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let w = window.min(values.len());
    let mean = values[values.len() - w..].iter().sum::<f64>() / w as f64;
    Ok(vec![mean; horizon])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn window_of_three_averages_the_tail() {
        let forecast = moving_average_forecast(&[1.0, 2.0, 3.0, 4.0, 5.0], 3, 2).unwrap();
        assert_eq!(forecast.len(), 2);
        assert_relative_eq!(forecast[0], 4.0, epsilon = 1e-10);
        assert_relative_eq!(forecast[1], 4.0, epsilon = 1e-10);
    }

    #[test]
    fn oversized_window_shrinks_to_series_length() {
        let forecast = moving_average_forecast(&[2.0, 4.0], 10, 1).unwrap();
        assert_relative_eq!(forecast[0], 3.0, epsilon = 1e-10);
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(matches!(
            moving_average_forecast(&[1.0, 2.0], 0, 1),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            moving_average_forecast(&[], 3, 1),
            Err(ForecastError::EmptyData)
        ));
    }
}
