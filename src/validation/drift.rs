//! Drift detection and retraining triggers.

use crate::utils::{mean, std_dev};
use serde::{Deserialize, Serialize};

/// Thresholds governing when a model should be retrained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrainingPolicy {
    /// New observations required before any data-driven check runs.
    pub min_new_data_points: usize,
    /// Drift score above which retraining triggers.
    pub drift_threshold: f64,
    /// Retrain when recent MAPE reaches this multiple of training MAPE.
    pub mape_degradation_ratio: f64,
    /// Retrain when the model is older than this many days.
    pub max_model_age_days: i64,
}

impl Default for RetrainingPolicy {
    fn default() -> Self {
        Self {
            min_new_data_points: 10,
            drift_threshold: 0.2,
            mape_degradation_ratio: 1.5,
            max_model_age_days: 90,
        }
    }
}

/// Inputs to a retraining check.
#[derive(Debug, Clone, Default)]
pub struct RetrainingCheck<'a> {
    /// Values the model was trained on.
    pub baseline: &'a [f64],
    /// Values observed since training.
    pub recent: &'a [f64],
    /// Unconditional retrain request.
    pub forced: bool,
    /// MAPE recorded at training time.
    pub training_mape: Option<f64>,
    /// MAPE of the model's forecasts against the recent values.
    pub recent_mape: Option<f64>,
    /// Age of the model in days.
    pub model_age_days: Option<i64>,
}

/// Why retraining was (or was not) triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrainingReason {
    Forced,
    DistributionDrift,
    AccuracyDegradation,
    ModelAge,
}

/// Outcome of a retraining check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrainingDecision {
    pub retrain: bool,
    pub reason: Option<RetrainingReason>,
    /// Drift score in [0, 1], when enough new data existed to compute it.
    pub drift_score: Option<f64>,
}

/// Distribution drift between a baseline window and recent data.
///
/// Mean of the relative mean shift and the relative standard deviation
/// shift, clamped to [0, 1]. A zero-valued baseline statistic counts as a
/// full shift whenever the recent statistic moved away from zero.
pub fn drift_score(baseline: &[f64], recent: &[f64]) -> f64 {
    if baseline.is_empty() || recent.is_empty() {
        return 0.0;
    }

    let relative_shift = |old: f64, new: f64| -> f64 {
        if old.abs() > 1e-10 {
            (new - old).abs() / old.abs()
        } else if new.abs() > 1e-10 {
            1.0
        } else {
            0.0
        }
    };

    let mean_shift = relative_shift(mean(baseline), mean(recent));
    let std_shift = relative_shift(std_dev(baseline), std_dev(recent));

    ((mean_shift + std_shift) / 2.0).clamp(0.0, 1.0)
}

/// Decide whether a model needs retraining.
///
/// Checks run in order: forced request, minimum-data gate, distribution
/// drift, accuracy degradation, model age.
pub fn check_retraining_need(
    check: &RetrainingCheck<'_>,
    policy: &RetrainingPolicy,
) -> RetrainingDecision {
    if check.forced {
        return RetrainingDecision {
            retrain: true,
            reason: Some(RetrainingReason::Forced),
            drift_score: None,
        };
    }

    if check.recent.len() < policy.min_new_data_points {
        return RetrainingDecision {
            retrain: false,
            reason: None,
            drift_score: None,
        };
    }

    let score = drift_score(check.baseline, check.recent);
    if score > policy.drift_threshold {
        return RetrainingDecision {
            retrain: true,
            reason: Some(RetrainingReason::DistributionDrift),
            drift_score: Some(score),
        };
    }

    if let (Some(training), Some(recent)) = (check.training_mape, check.recent_mape) {
        if training > 0.0 && recent >= policy.mape_degradation_ratio * training {
            return RetrainingDecision {
                retrain: true,
                reason: Some(RetrainingReason::AccuracyDegradation),
                drift_score: Some(score),
            };
        }
    }

    if let Some(age) = check.model_age_days {
        if age > policy.max_model_age_days {
            return RetrainingDecision {
                retrain: true,
                reason: Some(RetrainingReason::ModelAge),
                drift_score: Some(score),
            };
        }
    }

    RetrainingDecision {
        retrain: false,
        reason: None,
        drift_score: Some(score),
    }
}
