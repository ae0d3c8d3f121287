//! Forecasting methods.
//!
//! Seven classical algorithms behind one closed enum, [`Method`], with a
//! uniform interface: [`Method::forecast`] produces a fixed-horizon point
//! forecast and [`Method::accuracy`] scores the method on held-out history.
//! Dispatch is a pattern match, never a string lookup.

mod exponential;
mod holt_winters;
mod linear_regression;
mod moving_average;
mod naive;
mod seasonal_naive;

pub use exponential::{double_exponential_smoothing_forecast, exponential_smoothing_forecast};
pub use holt_winters::holt_winters_forecast;
pub use linear_regression::{fit_line, linear_regression_forecast};
pub use moving_average::moving_average_forecast;
pub use naive::naive_forecast;
pub use seasonal_naive::seasonal_naive_forecast;

use crate::error::{ForecastError, Result};
use crate::validation::metrics::mape;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Seasonal period used when a seasonal method is invoked directly
/// without a resolved period.
const DEFAULT_SEASONAL_PERIOD: usize = 12;

/// Parameters shared across the method family.
///
/// Each method reads only the fields it understands; the rest are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodParams {
    /// Moving average window size.
    pub window: usize,
    /// Level smoothing parameter (0 < alpha < 1).
    pub alpha: f64,
    /// Trend smoothing parameter (0 < beta < 1).
    pub beta: f64,
    /// Seasonal smoothing parameter (0 < gamma < 1).
    pub gamma: f64,
    /// Seasonal period; resolved by the orchestrator when absent.
    pub seasonal_period: Option<usize>,
}

impl Default for MethodParams {
    fn default() -> Self {
        Self {
            window: 3,
            alpha: 0.3,
            beta: 0.1,
            gamma: 0.1,
            seasonal_period: None,
        }
    }
}

impl MethodParams {
    /// Seasonal period to use, falling back to the default.
    pub fn period(&self) -> usize {
        self.seasonal_period.unwrap_or(DEFAULT_SEASONAL_PERIOD)
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_seasonal_period(mut self, period: usize) -> Self {
        self.seasonal_period = Some(period);
        self
    }
}

/// The closed set of forecasting methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Naive,
    MovingAverage,
    LinearRegression,
    ExponentialSmoothing,
    DoubleExponentialSmoothing,
    SeasonalNaive,
    HoltWinters,
}

impl Method {
    /// All methods, in evaluation order.
    pub const ALL: [Method; 7] = [
        Method::Naive,
        Method::MovingAverage,
        Method::LinearRegression,
        Method::ExponentialSmoothing,
        Method::DoubleExponentialSmoothing,
        Method::SeasonalNaive,
        Method::HoltWinters,
    ];

    /// Whether this method requires a seasonal period.
    pub fn is_seasonal(&self) -> bool {
        matches!(self, Method::SeasonalNaive | Method::HoltWinters)
    }

    /// The wire name of this method.
    pub fn name(&self) -> &'static str {
        match self {
            Method::Naive => "naive",
            Method::MovingAverage => "moving_average",
            Method::LinearRegression => "linear_regression",
            Method::ExponentialSmoothing => "exponential_smoothing",
            Method::DoubleExponentialSmoothing => "double_exponential_smoothing",
            Method::SeasonalNaive => "seasonal_naive",
            Method::HoltWinters => "holt_winters",
        }
    }

    /// Generate a point forecast of length `horizon`.
    pub fn forecast(
        &self,
        values: &[f64],
        params: &MethodParams,
        horizon: usize,
    ) -> Result<Vec<f64>> {
        match self {
            Method::Naive => naive_forecast(values, horizon),
            Method::MovingAverage => moving_average_forecast(values, params.window, horizon),
            Method::LinearRegression => linear_regression_forecast(values, horizon),
            Method::ExponentialSmoothing => {
                exponential_smoothing_forecast(values, params.alpha, horizon)
            }
            Method::DoubleExponentialSmoothing => {
                double_exponential_smoothing_forecast(values, params.alpha, params.beta, horizon)
            }
            Method::SeasonalNaive => seasonal_naive_forecast(values, params.period(), horizon),
            Method::HoltWinters => holt_winters_forecast(
                values,
                params.alpha,
                params.beta,
                params.gamma,
                params.period(),
                horizon,
            ),
        }
    }

    /// Score this method on the given history.
    ///
    /// The contract is shared by every method: the series is split in
    /// half, the first half forecasts the second, and the result is the
    /// MAPE over non-zero actuals. Returns `None` for series shorter than
    /// 5 points, when the forecast itself fails, or when no valid pair
    /// remains.
    pub fn accuracy(&self, values: &[f64], params: &MethodParams) -> Option<f64> {
        half_split_accuracy(values, |train, horizon| {
            self.forecast(train, params, horizon)
        })
    }
}

impl FromStr for Method {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "naive" => Ok(Method::Naive),
            "moving_average" => Ok(Method::MovingAverage),
            "linear_regression" => Ok(Method::LinearRegression),
            "exponential_smoothing" => Ok(Method::ExponentialSmoothing),
            "double_exponential_smoothing" => Ok(Method::DoubleExponentialSmoothing),
            "seasonal_naive" => Ok(Method::SeasonalNaive),
            "holt_winters" => Ok(Method::HoltWinters),
            other => Err(ForecastError::InvalidParameter(format!(
                "unknown forecast method '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Half-split holdout accuracy shared by all methods.
fn half_split_accuracy<F>(values: &[f64], forecast_fn: F) -> Option<f64>
where
    F: Fn(&[f64], usize) -> Result<Vec<f64>>,
{
    if values.len() < 5 {
        return None;
    }
    let split = values.len() / 2;
    let (train, test) = values.split_at(split);
    let forecast = forecast_fn(train, test.len()).ok()?;
    mape(test, &forecast)
}
