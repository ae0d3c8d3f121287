//! One-step walk-forward re-forecasting.
//!
//! Interval estimation needs the distribution of one-step-ahead errors,
//! which means re-fitting the method on every prefix of history. That
//! loop lives here as a plain iterator so it can be tested on its own,
//! away from the orchestrator and registry.

use crate::error::Result;
use crate::models::{Method, MethodParams};

/// One step of a walk-forward pass: the forecast made for `index` using
/// only the observations before it, next to what actually happened.
#[derive(Debug, Clone, PartialEq)]
pub struct OneStepForecast {
    pub index: usize,
    pub forecast: f64,
    pub actual: f64,
}

impl OneStepForecast {
    /// Signed forecast error (actual minus forecast).
    pub fn error(&self) -> f64 {
        self.actual - self.forecast
    }
}

/// Finite, restartable iterator of one-step-ahead forecasts.
///
/// At position `t` the method is fitted on `values[..t]` and forecasts
/// `values[t]`; the iterator then advances to `t + 1` until the series is
/// exhausted. Restart from any prefix by constructing with that start
/// position. A forecast failure is yielded once and ends the iteration.
pub struct WalkForward<'a> {
    method: Method,
    params: &'a MethodParams,
    values: &'a [f64],
    position: usize,
}

impl<'a> WalkForward<'a> {
    /// Walk forward from `start` (clamped to 1, since a forecast needs at
    /// least one preceding observation).
    pub fn new(method: Method, params: &'a MethodParams, values: &'a [f64], start: usize) -> Self {
        Self {
            method,
            params,
            values,
            position: start.max(1),
        }
    }

    /// Walk the last third of the series.
    pub fn over_last_third(method: Method, params: &'a MethodParams, values: &'a [f64]) -> Self {
        let n = values.len();
        let start = n.saturating_sub((n / 3).max(1));
        Self::new(method, params, values, start)
    }

    /// Next position to forecast.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl Iterator for WalkForward<'_> {
    type Item = Result<OneStepForecast>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.values.len() {
            return None;
        }

        let target = self.position;
        let prefix = &self.values[..target];
        match self.method.forecast(prefix, self.params, 1) {
            Ok(forecast) => {
                self.position += 1;
                Some(Ok(OneStepForecast {
                    index: target,
                    forecast: forecast[0],
                    actual: self.values[target],
                }))
            }
            Err(err) => {
                // A method that cannot fit this prefix will not fit the
                // longer ones either once it has failed; stop after
                // reporting.
                self.position = self.values.len();
                Some(Err(err))
            }
        }
    }
}
