//! Value transforms as aligned features.
//!
//! Each transform is defined only where its domain permits: logarithms and
//! Box-Cox need positive values, square roots non-negative ones. Positions
//! outside the domain hold `None` instead of NaN so the features stay
//! JSON-clean.

use crate::features::Feature;
use crate::utils::{mean, std_dev};

/// Box-Cox lambdas produced as features. Zero degenerates to the natural log.
const BOXCOX_LAMBDAS: [f64; 3] = [0.0, 0.5, 2.0];

/// Generate transform features for a series.
pub fn transform_features(values: &[f64]) -> Vec<Feature> {
    let mut features = Vec::new();

    features.push(Feature::numerical(
        "log",
        values
            .iter()
            .map(|&v| (v > 0.0).then(|| v.ln()))
            .collect(),
        "natural logarithm, positive values only",
    ));

    features.push(Feature::numerical(
        "sqrt",
        values
            .iter()
            .map(|&v| (v >= 0.0).then(|| v.sqrt()))
            .collect(),
        "square root, non-negative values only",
    ));

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    features.push(Feature::numerical(
        "minmax",
        values
            .iter()
            .map(|&v| (range > 0.0).then(|| (v - min) / range))
            .collect(),
        "min-max normalization to [0, 1]",
    ));

    let m = mean(values);
    let sd = std_dev(values);
    features.push(Feature::numerical(
        "zscore",
        values
            .iter()
            .map(|&v| (sd > 0.0).then(|| (v - m) / sd))
            .collect(),
        "standard score against the whole series",
    ));

    for power in [0.5, 2.0, 3.0] {
        let transformed: Vec<Option<f64>> = values
            .iter()
            .map(|&v| signed_power(v, power))
            .collect();
        features.push(Feature::numerical(
            format!("power_{}", format_power(power)),
            transformed,
            format!("value raised to the power {}", power),
        ));
    }

    for lambda in BOXCOX_LAMBDAS {
        let transformed: Vec<Option<f64>> = values
            .iter()
            .map(|&v| {
                if v <= 0.0 {
                    None
                } else if lambda == 0.0 {
                    Some(v.ln())
                } else {
                    Some((v.powf(lambda) - 1.0) / lambda)
                }
            })
            .collect();
        features.push(Feature::numerical(
            format!("boxcox_{}", format_power(lambda)),
            transformed,
            format!("Box-Cox transform with lambda {}", lambda),
        ));
    }

    features
}

/// Power transform preserving the sign of negative inputs for odd integer
/// powers; fractional powers of negatives are undefined.
fn signed_power(value: f64, power: f64) -> Option<f64> {
    if value >= 0.0 {
        return Some(value.powf(power));
    }
    let is_odd_integer = power.fract() == 0.0 && (power as i64) % 2 == 1;
    if is_odd_integer {
        Some(-((-value).powf(power)))
    } else if power.fract() == 0.0 {
        Some(value.powf(power))
    } else {
        None
    }
}

fn format_power(power: f64) -> String {
    if power.fract() == 0.0 {
        format!("{}", power as i64)
    } else {
        format!("{}", power).replace('.', "_")
    }
}
