//! Utility functions shared across the crate.

pub mod stats;

pub use stats::{autocorrelation, mean, quantile_normal, std_dev, variance};
