//! # fincast
//!
//! Time series forecasting engine for financial data: seven classical
//! forecasting methods behind one closed enum, frequency-aware horizon and
//! seasonality handling, feature engineering, walk-forward validation and
//! model selection, grid-search hyperparameter tuning, and a versioned
//! file-backed model registry.

pub mod core;
pub mod detection;
pub mod error;
pub mod features;
pub mod models;
pub mod orchestrator;
pub mod registry;
pub mod tuning;
pub mod utils;
pub mod validation;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{ForecastResult, Frequency, TimeSeries};
    pub use crate::detection::detect_seasonal_period;
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{Method, MethodParams};
    pub use crate::orchestrator::{
        forecast, generate_confidence_intervals, generate_forecasts, ForecastOptions,
    };
    pub use crate::registry::{ModelRecord, Registry, RegistryConfig};
    pub use crate::validation::{
        calculate_metrics, cross_validate, split_time_series, CvOptions, SplitRatios,
    };
}
