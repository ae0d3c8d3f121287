//! Validation, model selection, and retraining triggers.

pub mod cross_validation;
pub mod drift;
pub mod metrics;
pub mod selection;
pub mod split;

pub use cross_validation::{build_folds, cross_validate, CvFold, CvOptions, CvResult, MethodCvResult};
pub use drift::{
    check_retraining_need, drift_score, RetrainingCheck, RetrainingDecision, RetrainingPolicy,
    RetrainingReason,
};
pub use metrics::{calculate_metrics, ForecastMetrics};
pub use selection::{select_best_model, ValidationResult};
pub use split::{split_stratified, split_time_series, DataSplit, Segment, SplitRatios};
