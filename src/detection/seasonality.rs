//! Seasonal period detection.
//!
//! Known frequencies short-circuit to their canonical period; irregular
//! data is scanned with the autocorrelation function.

use crate::core::Frequency;
use crate::utils::autocorrelation;

/// Minimum autocorrelation for a lag to count as a seasonal peak.
const ACF_THRESHOLD: f64 = 0.3;

/// Longest lag the ACF scan will consider.
const MAX_SCAN_LAG: usize = 24;

/// Detect the seasonal period of a series.
///
/// A known frequency wins outright, independent of the data: daily→7,
/// weekly→4, monthly→12, quarterly→4, yearly→1. Irregular series with at
/// least 24 points are scanned with the ACF over lags `2..=min(24, n/3)`;
/// the lag with the highest autocorrelation is returned when that peak
/// exceeds 0.3. Everything else falls back to `min(7, n/3)`, floored at 1.
pub fn detect_seasonal_period(values: &[f64], frequency: Frequency) -> usize {
    if let Some(period) = frequency.canonical_period() {
        return period;
    }

    let n = values.len();
    let fallback = (n / 3).min(7).max(1);

    if n < 24 {
        return fallback;
    }

    let max_lag = (n / 3).min(MAX_SCAN_LAG);
    let mut best_lag = 0;
    let mut best_acf = f64::NEG_INFINITY;

    // Lag 1 is excluded: adjacent-point correlation says "smooth", not
    // "seasonal".
    for lag in 2..=max_lag {
        let acf = autocorrelation(values, lag);
        if acf > best_acf {
            best_acf = acf;
            best_lag = lag;
        }
    }

    if best_lag > 0 && best_acf > ACF_THRESHOLD {
        best_lag
    } else {
        fallback
    }
}
