//! Time-respecting data splitting.
//!
//! Splits are chronological, never shuffled: the validation window always
//! follows the training window, and the test window follows both.

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// Three-way split ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitRatios {
    pub train: f64,
    pub validation: f64,
    pub test: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.7,
            validation: 0.15,
            test: 0.15,
        }
    }
}

impl SplitRatios {
    pub fn new(train: f64, validation: f64, test: f64) -> Self {
        Self {
            train,
            validation,
            test,
        }
    }

    /// Ratios must be non-negative and sum to 1 within 1e-4.
    pub fn validate(&self) -> Result<()> {
        if self.train < 0.0 || self.validation < 0.0 || self.test < 0.0 {
            return Err(ForecastError::InvalidParameter(
                "split ratios must be non-negative".to_string(),
            ));
        }
        let sum = self.train + self.validation + self.test;
        if (sum - 1.0).abs() > 1e-4 {
            return Err(ForecastError::InvalidParameter(format!(
                "split ratios must sum to 1, got {}",
                sum
            )));
        }
        Ok(())
    }
}

/// One contiguous (or stratified-merged) part of a split.
#[derive(Debug, Clone, Default)]
pub struct Segment {
    pub timestamps: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Train/validation/test partition of a series.
#[derive(Debug, Clone)]
pub struct DataSplit {
    pub train: Segment,
    pub validation: Segment,
    pub test: Segment,
}

/// Split a series chronologically by ratio.
pub fn split_time_series(series: &TimeSeries, ratios: &SplitRatios) -> Result<DataSplit> {
    ratios.validate()?;

    let n = series.len();
    let train_end = ((n as f64) * ratios.train).round() as usize;
    let val_end = (train_end + ((n as f64) * ratios.validation).round() as usize).min(n);
    let train_end = train_end.min(val_end);

    Ok(DataSplit {
        train: segment_of(series, 0, train_end),
        validation: segment_of(series, train_end, val_end),
        test: segment_of(series, val_end, n),
    })
}

/// Split a series with value-binned stratification.
///
/// Observations are assigned to `num_bins` equal-width value bins; each
/// bin is split by ratio in chronological order, and the per-bin parts are
/// merged back in timestamp order. Every bin is therefore represented in
/// every part, while temporal order within each part is preserved.
pub fn split_stratified(
    series: &TimeSeries,
    num_bins: usize,
    ratios: &SplitRatios,
) -> Result<DataSplit> {
    ratios.validate()?;
    if num_bins == 0 {
        return Err(ForecastError::InvalidParameter(
            "number of bins must be positive".to_string(),
        ));
    }

    let values = series.values();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = max - min;

    // Indices per bin, already in chronological order.
    let mut bins: Vec<Vec<usize>> = vec![Vec::new(); num_bins];
    for (i, &v) in values.iter().enumerate() {
        let bin = if width <= 0.0 {
            0
        } else {
            (((v - min) / width) * num_bins as f64).floor() as usize
        };
        bins[bin.min(num_bins - 1)].push(i);
    }

    let mut train_idx = Vec::new();
    let mut val_idx = Vec::new();
    let mut test_idx = Vec::new();

    for bin in bins.iter().filter(|b| !b.is_empty()) {
        let m = bin.len();
        let train_end = ((m as f64) * ratios.train).round() as usize;
        let val_end = (train_end + ((m as f64) * ratios.validation).round() as usize).min(m);
        let train_end = train_end.min(val_end);

        train_idx.extend_from_slice(&bin[..train_end]);
        val_idx.extend_from_slice(&bin[train_end..val_end]);
        test_idx.extend_from_slice(&bin[val_end..]);
    }

    // Timestamps are ordered, so index order is temporal order.
    train_idx.sort_unstable();
    val_idx.sort_unstable();
    test_idx.sort_unstable();

    Ok(DataSplit {
        train: segment_from_indices(series, &train_idx),
        validation: segment_from_indices(series, &val_idx),
        test: segment_from_indices(series, &test_idx),
    })
}

fn segment_of(series: &TimeSeries, start: usize, end: usize) -> Segment {
    Segment {
        timestamps: series.timestamps()[start..end].to_vec(),
        values: series.values()[start..end].to_vec(),
    }
}

fn segment_from_indices(series: &TimeSeries, indices: &[usize]) -> Segment {
    Segment {
        timestamps: indices.iter().map(|&i| series.timestamps()[i]).collect(),
        values: indices.iter().map(|&i| series.values()[i]).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn make_series(n: usize) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timestamps = (0..n).map(|i| base + Duration::days(i as i64)).collect();
        let values = (0..n).map(|i| i as f64).collect();
        TimeSeries::new(timestamps, values).unwrap()
    }

    #[test]
    fn default_ratios_split_100_points_as_70_15_15() {
        let series = make_series(100);
        let split = split_time_series(&series, &SplitRatios::default()).unwrap();

        assert_eq!(split.train.len(), 70);
        assert_eq!(split.validation.len(), 15);
        assert_eq!(split.test.len(), 15);
    }

    #[test]
    fn concatenated_split_reconstructs_the_series() {
        let series = make_series(100);
        let split = split_time_series(&series, &SplitRatios::default()).unwrap();

        let mut timestamps = split.train.timestamps.clone();
        timestamps.extend_from_slice(&split.validation.timestamps);
        timestamps.extend_from_slice(&split.test.timestamps);
        assert_eq!(timestamps, series.timestamps());

        let mut values = split.train.values.clone();
        values.extend_from_slice(&split.validation.values);
        values.extend_from_slice(&split.test.values);
        assert_eq!(values, series.values());
    }

    #[test]
    fn ratios_not_summing_to_one_are_rejected() {
        let series = make_series(20);
        let result = split_time_series(&series, &SplitRatios::new(0.7, 0.2, 0.2));
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn ratios_within_tolerance_are_accepted() {
        let series = make_series(20);
        assert!(split_time_series(&series, &SplitRatios::new(0.70005, 0.15, 0.15)).is_ok());
    }

    #[test]
    fn negative_ratios_are_rejected() {
        let series = make_series(20);
        let result = split_time_series(&series, &SplitRatios::new(1.2, -0.1, -0.1));
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn split_is_chronological() {
        let series = make_series(40);
        let split = split_time_series(&series, &SplitRatios::default()).unwrap();

        let train_last = *split.train.timestamps.last().unwrap();
        let val_first = *split.validation.timestamps.first().unwrap();
        let val_last = *split.validation.timestamps.last().unwrap();
        let test_first = *split.test.timestamps.first().unwrap();

        assert!(train_last < val_first);
        assert!(val_last < test_first);
    }

    #[test]
    fn stratified_split_covers_every_point_once() {
        let series = make_series(60);
        let split = split_stratified(&series, 4, &SplitRatios::default()).unwrap();

        let total = split.train.len() + split.validation.len() + split.test.len();
        assert_eq!(total, 60);
    }

    #[test]
    fn stratified_split_preserves_temporal_order_within_parts() {
        let series = make_series(60);
        let split = split_stratified(&series, 4, &SplitRatios::default()).unwrap();

        for segment in [&split.train, &split.validation, &split.test] {
            for window in segment.timestamps.windows(2) {
                assert!(window[0] <= window[1]);
            }
        }
    }

    #[test]
    fn stratified_split_represents_value_ranges_in_training() {
        let series = make_series(80);
        let split = split_stratified(&series, 4, &SplitRatios::default()).unwrap();

        // With a plain chronological split the top quartile of an
        // increasing series never reaches the training set; stratification
        // must include it.
        assert!(split.train.values.iter().any(|&v| v >= 60.0));
    }

    #[test]
    fn stratified_rejects_zero_bins() {
        let series = make_series(20);
        let result = split_stratified(&series, 0, &SplitRatios::default());
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn constant_series_lands_in_single_bin() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timestamps: Vec<_> = (0..20).map(|i| base + Duration::days(i)).collect();
        let series = TimeSeries::new(timestamps, vec![5.0; 20]).unwrap();

        let split = split_stratified(&series, 4, &SplitRatios::default()).unwrap();
        assert_eq!(
            split.train.len() + split.validation.len() + split.test.len(),
            20
        );
    }
}
