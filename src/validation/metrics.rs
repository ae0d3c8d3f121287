//! Forecast accuracy metrics.
//!
//! Every metric shares one contract: pairs with a NaN (or non-finite)
//! actual or forecast are skipped, and the metric is `None` when no valid
//! pair remains. MAPE additionally requires non-zero actuals.

use crate::utils::mean;
use serde::{Deserialize, Serialize};

/// All metrics for one forecast, computed over the same pair set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastMetrics {
    /// Mean Absolute Percentage Error.
    pub mape: Option<f64>,
    /// Root Mean Squared Error.
    pub rmse: Option<f64>,
    /// Mean Absolute Error.
    pub mae: Option<f64>,
    /// Coefficient of determination.
    pub r_squared: Option<f64>,
    /// Mean Absolute Scaled Error.
    pub mase: Option<f64>,
    /// Symmetric Mean Absolute Percentage Error.
    pub smape: Option<f64>,
    /// Mean signed error (forecast minus actual).
    pub bias: Option<f64>,
}

/// Compute all metrics between actual and forecast values.
pub fn calculate_metrics(actual: &[f64], forecast: &[f64]) -> ForecastMetrics {
    ForecastMetrics {
        mape: mape(actual, forecast),
        rmse: rmse(actual, forecast),
        mae: mae(actual, forecast),
        r_squared: r_squared(actual, forecast),
        mase: mase(actual, forecast),
        smape: smape(actual, forecast),
        bias: bias(actual, forecast),
    }
}

/// Pairs where both sides are finite.
fn valid_pairs<'a>(
    actual: &'a [f64],
    forecast: &'a [f64],
) -> impl Iterator<Item = (f64, f64)> + 'a {
    actual
        .iter()
        .zip(forecast.iter())
        .filter(|(a, f)| a.is_finite() && f.is_finite())
        .map(|(&a, &f)| (a, f))
}

/// Mean Absolute Percentage Error over non-zero actuals, in percent.
pub fn mape(actual: &[f64], forecast: &[f64]) -> Option<f64> {
    let errors: Vec<f64> = valid_pairs(actual, forecast)
        .filter(|(a, _)| *a != 0.0)
        .map(|(a, f)| ((a - f) / a).abs())
        .collect();
    if errors.is_empty() {
        return None;
    }
    Some(100.0 * mean(&errors))
}

/// Root Mean Squared Error.
pub fn rmse(actual: &[f64], forecast: &[f64]) -> Option<f64> {
    let squares: Vec<f64> = valid_pairs(actual, forecast)
        .map(|(a, f)| (a - f).powi(2))
        .collect();
    if squares.is_empty() {
        return None;
    }
    Some(mean(&squares).sqrt())
}

/// Mean Absolute Error.
pub fn mae(actual: &[f64], forecast: &[f64]) -> Option<f64> {
    let errors: Vec<f64> = valid_pairs(actual, forecast)
        .map(|(a, f)| (a - f).abs())
        .collect();
    if errors.is_empty() {
        return None;
    }
    Some(mean(&errors))
}

/// Coefficient of determination.
///
/// `None` for a constant actual series that the forecast misses; 1.0 when
/// it is matched exactly.
pub fn r_squared(actual: &[f64], forecast: &[f64]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = valid_pairs(actual, forecast).collect();
    if pairs.is_empty() {
        return None;
    }

    let actual_mean = mean(&pairs.iter().map(|(a, _)| *a).collect::<Vec<_>>());
    let ss_tot: f64 = pairs.iter().map(|(a, _)| (a - actual_mean).powi(2)).sum();
    let ss_res: f64 = pairs.iter().map(|(a, f)| (a - f).powi(2)).sum();

    if ss_tot == 0.0 {
        if ss_res < 1e-12 {
            return Some(1.0);
        }
        return None;
    }
    Some(1.0 - ss_res / ss_tot)
}

/// Mean Absolute Scaled Error.
///
/// Scaled against one-step naive differencing of the actual values:
/// `MAE / mean(|actual[i] - actual[i-1]|)`. `None` when the naive scale is
/// zero or there are fewer than two valid consecutive actuals.
pub fn mase(actual: &[f64], forecast: &[f64]) -> Option<f64> {
    let forecast_mae = mae(actual, forecast)?;

    let naive_errors: Vec<f64> = actual
        .windows(2)
        .filter(|w| w[0].is_finite() && w[1].is_finite())
        .map(|w| (w[1] - w[0]).abs())
        .collect();
    if naive_errors.is_empty() {
        return None;
    }

    let scale = mean(&naive_errors);
    if scale == 0.0 {
        return None;
    }
    Some(forecast_mae / scale)
}

/// Symmetric Mean Absolute Percentage Error, in percent.
///
/// Pairs where both sides are zero contribute zero error.
pub fn smape(actual: &[f64], forecast: &[f64]) -> Option<f64> {
    let errors: Vec<f64> = valid_pairs(actual, forecast)
        .map(|(a, f)| {
            let denom = a.abs() + f.abs();
            if denom == 0.0 {
                0.0
            } else {
                2.0 * (a - f).abs() / denom
            }
        })
        .collect();
    if errors.is_empty() {
        return None;
    }
    Some(100.0 * mean(&errors))
}

/// Mean signed error: positive values mean the forecast runs high.
pub fn bias(actual: &[f64], forecast: &[f64]) -> Option<f64> {
    let errors: Vec<f64> = valid_pairs(actual, forecast)
        .map(|(a, f)| f - a)
        .collect();
    if errors.is_empty() {
        return None;
    }
    Some(mean(&errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_forecast_scores_perfectly() {
        let actual = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let metrics = calculate_metrics(&actual, &actual);

        assert_relative_eq!(metrics.mape.unwrap(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.rmse.unwrap(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.mae.unwrap(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.r_squared.unwrap(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.mase.unwrap(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.smape.unwrap(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.bias.unwrap(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn known_error_values() {
        let actual = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let forecast = vec![1.5, 2.5, 2.5, 4.5, 4.5];
        // Absolute errors are all 0.5.

        assert_relative_eq!(mae(&actual, &forecast).unwrap(), 0.5, epsilon = 1e-10);
        assert_relative_eq!(rmse(&actual, &forecast).unwrap(), 0.5, epsilon = 1e-10);
        // Naive scale is 1.0 (unit steps), so MASE == MAE.
        assert_relative_eq!(mase(&actual, &forecast).unwrap(), 0.5, epsilon = 1e-10);
    }

    #[test]
    fn mape_skips_zero_actuals() {
        let actual = vec![0.0, 2.0, 4.0];
        let forecast = vec![1.0, 1.0, 2.0];
        // Only the non-zero actuals count: |2-1|/2 = 0.5, |4-2|/4 = 0.5.
        assert_relative_eq!(mape(&actual, &forecast).unwrap(), 50.0, epsilon = 1e-10);
    }

    #[test]
    fn mape_none_when_all_actuals_zero() {
        assert!(mape(&[0.0, 0.0], &[1.0, 2.0]).is_none());
    }

    #[test]
    fn mape_is_scale_invariant() {
        let actual = vec![10.0, 20.0, 30.0];
        let forecast = vec![12.0, 18.0, 33.0];
        let base = mape(&actual, &forecast).unwrap();

        for k in [0.5, 2.0, 100.0] {
            let scaled_actual: Vec<f64> = actual.iter().map(|a| a * k).collect();
            let scaled_forecast: Vec<f64> = forecast.iter().map(|f| f * k).collect();
            assert_relative_eq!(
                mape(&scaled_actual, &scaled_forecast).unwrap(),
                base,
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn nan_pairs_are_skipped() {
        let actual = vec![1.0, f64::NAN, 3.0];
        let forecast = vec![2.0, 2.0, f64::NAN];
        // Only the first pair survives.
        assert_relative_eq!(mae(&actual, &forecast).unwrap(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(bias(&actual, &forecast).unwrap(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn all_metrics_none_for_no_valid_pairs() {
        let actual = vec![f64::NAN, f64::NAN];
        let forecast = vec![1.0, 2.0];
        let metrics = calculate_metrics(&actual, &forecast);

        assert!(metrics.mape.is_none());
        assert!(metrics.rmse.is_none());
        assert!(metrics.mae.is_none());
        assert!(metrics.r_squared.is_none());
        assert!(metrics.mase.is_none());
        assert!(metrics.smape.is_none());
        assert!(metrics.bias.is_none());
    }

    #[test]
    fn r_squared_negative_for_poor_model() {
        let actual = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let forecast = vec![5.0, 4.0, 3.0, 2.0, 1.0];
        assert!(r_squared(&actual, &forecast).unwrap() < 0.0);
    }

    #[test]
    fn r_squared_constant_actuals() {
        assert_relative_eq!(
            r_squared(&[3.0, 3.0, 3.0], &[3.0, 3.0, 3.0]).unwrap(),
            1.0,
            epsilon = 1e-10
        );
        assert!(r_squared(&[3.0, 3.0, 3.0], &[3.0, 3.0, 4.0]).is_none());
    }

    #[test]
    fn mase_none_for_constant_actuals() {
        // Naive differencing scale is zero.
        assert!(mase(&[2.0, 2.0, 2.0], &[1.0, 1.0, 1.0]).is_none());
    }

    #[test]
    fn bias_sign_follows_forecast_direction() {
        let actual = vec![10.0, 10.0];
        assert!(bias(&actual, &[12.0, 12.0]).unwrap() > 0.0);
        assert!(bias(&actual, &[8.0, 8.0]).unwrap() < 0.0);
    }

    #[test]
    fn smape_bounded_and_symmetric_at_zero() {
        let s = smape(&[0.0, 1.0], &[0.0, 3.0]).unwrap();
        // Zero/zero pair contributes 0; (1,3) contributes 2*2/4 = 100%.
        assert_relative_eq!(s, 50.0, epsilon = 1e-10);
    }

    #[test]
    fn metrics_serialize_none_as_null() {
        let metrics = ForecastMetrics::default();
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["mape"], serde_json::Value::Null);
        assert_eq!(json["rmse"], serde_json::Value::Null);
    }
}
