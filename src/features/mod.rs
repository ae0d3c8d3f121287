//! Feature engineering for time series.
//!
//! Four generator families (lag, statistical, calendar, transform) plus
//! pluggable external sources. Every generated feature is aligned 1:1
//! with the source series; positions without enough history, or outside a
//! transform's domain, hold `None`.

mod calendar;
mod external;
mod lag;
mod statistical;
mod transform;

pub use calendar::calendar_features;
pub use external::{ExternalFeatureSource, ExternalFeatures, HolidayCalendarSource};
pub use lag::lag_features;
pub use statistical::statistical_features;
pub use transform::transform_features;

use crate::core::{Frequency, TimeSeries};
use crate::detection::detect_seasonal_period;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of values a feature carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Numerical,
    Categorical,
    Binary,
}

/// A named feature vector aligned to a source series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    /// Same length as the source series; `None` marks undefined positions.
    pub values: Vec<Option<f64>>,
    pub description: String,
}

impl Feature {
    pub fn numerical(
        name: impl Into<String>,
        values: Vec<Option<f64>>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Numerical,
            values,
            description: description.into(),
        }
    }

    pub fn categorical(
        name: impl Into<String>,
        values: Vec<Option<f64>>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Categorical,
            values,
            description: description.into(),
        }
    }

    pub fn binary(
        name: impl Into<String>,
        values: Vec<Option<f64>>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Binary,
            values,
            description: description.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Configuration for combined feature generation.
#[derive(Debug, Clone)]
pub struct FeatureOptions {
    pub max_lag: usize,
    pub include_lag: bool,
    pub include_statistical: bool,
    pub include_calendar: bool,
    pub include_transform: bool,
    /// Holiday dates for the calendar flag.
    pub holidays: Vec<NaiveDate>,
    /// Seasonal period override; detected from the data when absent.
    pub seasonal_period: Option<usize>,
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            max_lag: 30,
            include_lag: true,
            include_statistical: true,
            include_calendar: true,
            include_transform: true,
            holidays: Vec::new(),
            seasonal_period: None,
        }
    }
}

/// Run all enabled generators against a series.
pub fn generate_features(
    series: &TimeSeries,
    frequency: Frequency,
    options: &FeatureOptions,
) -> Vec<Feature> {
    let values = series.values();
    let period = options
        .seasonal_period
        .unwrap_or_else(|| detect_seasonal_period(values, frequency));

    let mut features = Vec::new();
    if options.include_lag {
        features.extend(lag_features(values, options.max_lag));
    }
    if options.include_statistical {
        features.extend(statistical_features(values, period));
    }
    if options.include_calendar {
        features.extend(calendar_features(
            series.timestamps(),
            frequency,
            &options.holidays,
        ));
    }
    if options.include_transform {
        features.extend(transform_features(values));
    }
    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn make_series(n: usize) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timestamps = (0..n).map(|i| base + Duration::days(i as i64)).collect();
        let values = (0..n).map(|i| 10.0 + (i % 7) as f64).collect();
        TimeSeries::new(timestamps, values).unwrap()
    }

    #[test]
    fn all_generated_features_align_with_series() {
        let series = make_series(60);
        let features = generate_features(&series, Frequency::Daily, &FeatureOptions::default());

        assert!(!features.is_empty());
        for feature in &features {
            assert_eq!(feature.len(), 60, "feature {}", feature.name);
        }
    }

    #[test]
    fn feature_names_are_unique() {
        let series = make_series(60);
        let features = generate_features(&series, Frequency::Daily, &FeatureOptions::default());

        let mut names: Vec<&str> = features.iter().map(|f| f.name.as_str()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn families_toggle_independently() {
        let series = make_series(60);
        let options = FeatureOptions {
            include_lag: false,
            include_statistical: false,
            include_transform: false,
            ..Default::default()
        };
        let features = generate_features(&series, Frequency::Daily, &options);

        assert!(features.iter().all(|f| !f.name.starts_with("lag_")));
        assert!(features.iter().any(|f| f.name == "day_of_week"));
    }

    #[test]
    fn feature_serializes_none_as_null() {
        let feature = Feature::numerical("lag_1", vec![None, Some(1.0)], "previous value");
        let json = serde_json::to_value(&feature).unwrap();
        assert_eq!(json["values"][0], serde_json::Value::Null);
        assert_eq!(json["values"][1], 1.0);
        assert_eq!(json["type"], serde_json::Value::String("numerical".into()));
    }
}
