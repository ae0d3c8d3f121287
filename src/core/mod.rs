//! Core data structures: time series, frequency, and forecast results.

mod forecast;
mod series;

pub use forecast::{ConfidenceIntervals, ForecastResult, MethodForecast};
pub use series::{future_timestamps, parse_timestamp, Frequency, TimeSeries};
