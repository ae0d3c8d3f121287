//! Seasonality detection.

mod seasonality;

pub use seasonality::detect_seasonal_period;
