//! Calendar and cyclical time features.

use crate::core::Frequency;
use crate::features::Feature;
use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use std::f64::consts::TAU;

/// Generate calendar features for the given timestamps.
///
/// Plain date parts are always produced. Weekend/holiday flags and the
/// day-of-week encodings only make sense at daily (or irregular)
/// resolution; month encodings are skipped for yearly data where every
/// observation shares the same phase.
pub fn calendar_features(
    timestamps: &[DateTime<Utc>],
    frequency: Frequency,
    holidays: &[NaiveDate],
) -> Vec<Feature> {
    let mut features = Vec::new();

    let map = |f: &dyn Fn(&DateTime<Utc>) -> f64| -> Vec<Option<f64>> {
        timestamps.iter().map(|t| Some(f(t))).collect()
    };

    features.push(Feature::categorical(
        "day_of_week",
        map(&|t| t.weekday().num_days_from_monday() as f64),
        "day of week, 0 = Monday",
    ));
    features.push(Feature::categorical(
        "day_of_month",
        map(&|t| t.day() as f64),
        "day of month",
    ));
    features.push(Feature::categorical(
        "month",
        map(&|t| t.month() as f64),
        "month of year",
    ));
    features.push(Feature::categorical(
        "quarter",
        map(&|t| ((t.month() - 1) / 3 + 1) as f64),
        "quarter of year",
    ));
    features.push(Feature::numerical(
        "year",
        map(&|t| t.year() as f64),
        "calendar year",
    ));

    let daily_resolution = matches!(frequency, Frequency::Daily | Frequency::Irregular);
    if daily_resolution {
        features.push(Feature::binary(
            "is_weekend",
            map(&|t| {
                let weekend = matches!(t.weekday(), Weekday::Sat | Weekday::Sun);
                if weekend {
                    1.0
                } else {
                    0.0
                }
            }),
            "1 on Saturday and Sunday",
        ));
        features.push(Feature::binary(
            "is_holiday",
            map(&|t| {
                if holidays.contains(&t.date_naive()) {
                    1.0
                } else {
                    0.0
                }
            }),
            "1 on configured holiday dates",
        ));
        features.push(Feature::numerical(
            "day_of_week_sin",
            map(&|t| (t.weekday().num_days_from_monday() as f64 * TAU / 7.0).sin()),
            "cyclical day-of-week encoding (sine)",
        ));
        features.push(Feature::numerical(
            "day_of_week_cos",
            map(&|t| (t.weekday().num_days_from_monday() as f64 * TAU / 7.0).cos()),
            "cyclical day-of-week encoding (cosine)",
        ));
    }

    if frequency != Frequency::Yearly {
        features.push(Feature::numerical(
            "month_sin",
            map(&|t| ((t.month() - 1) as f64 * TAU / 12.0).sin()),
            "cyclical month encoding (sine)",
        ));
        features.push(Feature::numerical(
            "month_cos",
            map(&|t| ((t.month() - 1) as f64 * TAU / 12.0).cos()),
            "cyclical month encoding (cosine)",
        ));
    }

    features
}
