//! Lagged-value features.

use crate::features::Feature;

/// Diff/percent-change lags considered when the series is long enough.
const CHANGE_LAGS: [usize; 3] = [1, 7, 30];

/// Generate lag, trailing moving average, and change features.
///
/// Lags run from 1 to `min(max_lag, n/3)`; moving averages use windows 3,
/// 5, and 7; diffs and percentage changes are produced at lags 1, 7, and
/// 30 where those fit within the effective maximum lag.
pub fn lag_features(values: &[f64], max_lag: usize) -> Vec<Feature> {
    let n = values.len();
    let effective_max = max_lag.min(n / 3);
    let mut features = Vec::new();

    for lag in 1..=effective_max {
        let lagged: Vec<Option<f64>> = (0..n)
            .map(|i| (i >= lag).then(|| values[i - lag]))
            .collect();
        features.push(Feature::numerical(
            format!("lag_{}", lag),
            lagged,
            format!("value {} steps earlier", lag),
        ));
    }

    for window in [3usize, 5, 7] {
        let ma: Vec<Option<f64>> = (0..n)
            .map(|i| {
                (i + 1 >= window).then(|| {
                    values[i + 1 - window..=i].iter().sum::<f64>() / window as f64
                })
            })
            .collect();
        features.push(Feature::numerical(
            format!("ma_{}", window),
            ma,
            format!("trailing {}-point moving average", window),
        ));
    }

    for lag in CHANGE_LAGS.iter().copied().filter(|&l| l <= effective_max) {
        let diff: Vec<Option<f64>> = (0..n)
            .map(|i| (i >= lag).then(|| values[i] - values[i - lag]))
            .collect();
        features.push(Feature::numerical(
            format!("diff_{}", lag),
            diff,
            format!("difference over {} steps", lag),
        ));

        let pct: Vec<Option<f64>> = (0..n)
            .map(|i| {
                if i >= lag && values[i - lag] != 0.0 {
                    Some((values[i] - values[i - lag]) / values[i - lag])
                } else {
                    None
                }
            })
            .collect();
        features.push(Feature::numerical(
            format!("pct_change_{}", lag),
            pct,
            format!("relative change over {} steps", lag),
        ));
    }

    features
}
