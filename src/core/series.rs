//! TimeSeries data structure and frequency handling.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sampling frequency of a time series.
///
/// Drives the default forecast horizon, the canonical seasonal period,
/// and future timestamp generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    #[default]
    Irregular,
}

impl Frequency {
    /// Default number of future periods to forecast for this frequency.
    pub fn default_horizon(&self) -> usize {
        match self {
            Frequency::Daily => 30,
            Frequency::Weekly => 12,
            Frequency::Monthly => 12,
            Frequency::Quarterly => 8,
            Frequency::Yearly => 5,
            Frequency::Irregular => 10,
        }
    }

    /// Canonical seasonal period for this frequency, if one exists.
    ///
    /// Daily data repeats weekly (7), weekly data monthly (4), monthly
    /// data yearly (12), quarterly data yearly (4). Yearly data carries no
    /// sub-annual cycle; irregular data has no canonical period at all.
    pub fn canonical_period(&self) -> Option<usize> {
        match self {
            Frequency::Daily => Some(7),
            Frequency::Weekly => Some(4),
            Frequency::Monthly => Some(12),
            Frequency::Quarterly => Some(4),
            Frequency::Yearly => Some(1),
            Frequency::Irregular => None,
        }
    }

    /// Advance a timestamp by one period of this frequency.
    ///
    /// Monthly and coarser steps use calendar-month arithmetic (with
    /// end-of-month day clamping); `spacing_hint` supplies the stride for
    /// irregular data, falling back to one day.
    pub fn step(&self, from: DateTime<Utc>, spacing_hint: Option<Duration>) -> DateTime<Utc> {
        match self {
            Frequency::Daily => from + Duration::days(1),
            Frequency::Weekly => from + Duration::weeks(1),
            Frequency::Monthly => from + Months::new(1),
            Frequency::Quarterly => from + Months::new(3),
            Frequency::Yearly => from + Months::new(12),
            Frequency::Irregular => from + spacing_hint.unwrap_or_else(|| Duration::days(1)),
        }
    }
}

impl FromStr for Frequency {
    type Err = std::convert::Infallible;

    /// Unknown names map to `Irregular` rather than failing, matching the
    /// tolerant handling expected at the service boundary.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "daily" => Frequency::Daily,
            "weekly" => Frequency::Weekly,
            "monthly" => Frequency::Monthly,
            "quarterly" => Frequency::Quarterly,
            "yearly" => Frequency::Yearly,
            _ => Frequency::Irregular,
        })
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
            Frequency::Irregular => "irregular",
        };
        write!(f, "{}", name)
    }
}

/// A univariate time series with timestamps and values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a new time series.
    ///
    /// Timestamps must be chronologically non-decreasing and match the
    /// value count; at least one observation is required.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if timestamps.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }
        for i in 1..timestamps.len() {
            if timestamps[i] < timestamps[i - 1] {
                return Err(ForecastError::TimestampError(
                    "timestamps must be chronologically ordered".to_string(),
                ));
            }
        }
        Ok(Self { timestamps, values })
    }

    /// Create a time series from ISO-ish timestamp strings.
    pub fn from_strings(time_values: &[String], values: Vec<f64>) -> Result<Self> {
        let timestamps = time_values
            .iter()
            .map(|s| parse_timestamp(s))
            .collect::<Result<Vec<_>>>()?;
        Self::new(timestamps, values)
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Get values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the last timestamp.
    pub fn last_timestamp(&self) -> DateTime<Utc> {
        *self.timestamps.last().expect("series is never empty")
    }

    /// Extract a slice of the time series.
    pub fn slice(&self, start: usize, end: usize) -> Result<TimeSeries> {
        if start > end || end > self.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "invalid slice bounds {}..{} for series of length {}",
                start,
                end,
                self.len()
            )));
        }
        if start == end {
            return Err(ForecastError::EmptyData);
        }
        Ok(TimeSeries {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        })
    }

    /// Median spacing between consecutive observations.
    ///
    /// Used as the stride for future timestamps of irregular series.
    pub fn median_spacing(&self) -> Option<Duration> {
        if self.len() < 2 {
            return None;
        }
        let mut diffs: Vec<i64> = self
            .timestamps
            .windows(2)
            .map(|w| (w[1] - w[0]).num_seconds())
            .collect();
        diffs.sort_unstable();
        Some(Duration::seconds(diffs[diffs.len() / 2]))
    }
}

/// Parse an ISO-ish timestamp string into UTC.
///
/// Accepts RFC 3339, `%Y-%m-%dT%H:%M:%S`, `%Y-%m-%d %H:%M:%S`, and bare
/// dates (`%Y-%m-%d`).
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let naive = date.and_hms_opt(0, 0, 0).expect("midnight is valid");
        return Ok(Utc.from_utc_datetime(&naive));
    }
    Err(ForecastError::TimestampError(format!(
        "could not parse timestamp '{}'",
        s
    )))
}

/// Generate `horizon` future timestamps following the end of a series.
pub fn future_timestamps(series: &TimeSeries, frequency: Frequency, horizon: usize) -> Vec<DateTime<Utc>> {
    let spacing = series.median_spacing();
    let mut current = series.last_timestamp();
    let mut out = Vec::with_capacity(horizon);
    for _ in 0..horizon {
        current = frequency.step(current, spacing);
        out.push(current);
    }
    out
}
