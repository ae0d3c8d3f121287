//! Rolling, seasonal, and expanding statistics.

use crate::features::Feature;
use crate::utils::{mean, std_dev};

/// Generate rolling-window, seasonal, and expanding statistical features.
///
/// Rolling statistics use windows 5, 10, and the detected seasonal period;
/// seasonal lag/diff/percent-change appear only when two full seasons are
/// observed.
pub fn statistical_features(values: &[f64], seasonal_period: usize) -> Vec<Feature> {
    let n = values.len();
    let mut features = Vec::new();

    let mut windows = vec![5usize, 10];
    if seasonal_period > 1 && !windows.contains(&seasonal_period) {
        windows.push(seasonal_period);
    }

    for window in windows {
        let stat = |f: fn(&[f64]) -> f64, name: &str, desc: &str| {
            let vals: Vec<Option<f64>> = (0..n)
                .map(|i| (i + 1 >= window).then(|| f(&values[i + 1 - window..=i])))
                .collect();
            Feature::numerical(format!("{}_{}", name, window), vals, desc.to_string())
        };

        features.push(stat(mean, "rolling_mean", "trailing window mean"));
        features.push(stat(std_dev, "rolling_std", "trailing window standard deviation"));
        features.push(stat(slice_min, "rolling_min", "trailing window minimum"));
        features.push(stat(slice_max, "rolling_max", "trailing window maximum"));
    }

    if seasonal_period >= 1 && 2 * seasonal_period <= n {
        let p = seasonal_period;
        let seasonal_lag: Vec<Option<f64>> =
            (0..n).map(|i| (i >= p).then(|| values[i - p])).collect();
        features.push(Feature::numerical(
            "seasonal_lag",
            seasonal_lag,
            format!("value one season ({} steps) earlier", p),
        ));

        let seasonal_diff: Vec<Option<f64>> = (0..n)
            .map(|i| (i >= p).then(|| values[i] - values[i - p]))
            .collect();
        features.push(Feature::numerical(
            "seasonal_diff",
            seasonal_diff,
            "difference against the previous season",
        ));

        let seasonal_pct: Vec<Option<f64>> = (0..n)
            .map(|i| {
                if i >= p && values[i - p] != 0.0 {
                    Some((values[i] - values[i - p]) / values[i - p])
                } else {
                    None
                }
            })
            .collect();
        features.push(Feature::numerical(
            "seasonal_pct_change",
            seasonal_pct,
            "relative change against the previous season",
        ));
    }

    let expanding_mean: Vec<Option<f64>> = (0..n).map(|i| Some(mean(&values[..=i]))).collect();
    features.push(Feature::numerical(
        "expanding_mean",
        expanding_mean,
        "mean of all history up to each point",
    ));

    let expanding_std: Vec<Option<f64>> = (0..n)
        .map(|i| (i >= 1).then(|| std_dev(&values[..=i])))
        .collect();
    features.push(Feature::numerical(
        "expanding_std",
        expanding_std,
        "standard deviation of all history up to each point",
    ));

    features
}

fn slice_min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn slice_max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
