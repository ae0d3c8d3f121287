//! External feature sources.
//!
//! Weather, holiday calendars, economic indicators, and custom APIs plug
//! in through [`ExternalFeatureSource`]. Sources are independently
//! togglable, and a failing source degrades to an empty feature set — a
//! broken enrichment feed must never take the forecasting pipeline down.

use crate::error::Result;
use crate::features::Feature;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

/// A provider of features derived from data outside the series itself.
pub trait ExternalFeatureSource {
    /// Stable identifier used for toggling.
    fn name(&self) -> &str;

    /// Produce features aligned to the given timestamps.
    fn fetch(&self, timestamps: &[DateTime<Utc>]) -> Result<Vec<Feature>>;
}

/// A registered source plus its enablement flag.
struct RegisteredSource {
    enabled: bool,
    source: Box<dyn ExternalFeatureSource>,
}

/// Collection of external sources consulted during feature generation.
#[derive(Default)]
pub struct ExternalFeatures {
    sources: Vec<RegisteredSource>,
}

impl ExternalFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source, enabled by default.
    pub fn register(&mut self, source: Box<dyn ExternalFeatureSource>) {
        self.sources.push(RegisteredSource {
            enabled: true,
            source,
        });
    }

    /// Enable or disable a source by name. Returns false when no source
    /// with that name is registered.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        let mut found = false;
        for registered in &mut self.sources {
            if registered.source.name() == name {
                registered.enabled = enabled;
                found = true;
            }
        }
        found
    }

    /// Names of registered sources with their enablement state.
    pub fn sources(&self) -> Vec<(&str, bool)> {
        self.sources
            .iter()
            .map(|r| (r.source.name(), r.enabled))
            .collect()
    }

    /// Collect features from every enabled source.
    ///
    /// A source that errors contributes nothing; the failure is logged and
    /// the remaining sources still run.
    pub fn collect(&self, timestamps: &[DateTime<Utc>]) -> Vec<Feature> {
        let mut features = Vec::new();
        for registered in self.sources.iter().filter(|r| r.enabled) {
            match registered.source.fetch(timestamps) {
                Ok(mut fetched) => features.append(&mut fetched),
                Err(err) => {
                    warn!(
                        source = registered.source.name(),
                        error = %err,
                        "external feature source failed; skipping"
                    );
                }
            }
        }
        features
    }
}

/// Holiday calendar source producing a single binary flag.
pub struct HolidayCalendarSource {
    name: String,
    holidays: Vec<NaiveDate>,
}

impl HolidayCalendarSource {
    pub fn new(name: impl Into<String>, holidays: Vec<NaiveDate>) -> Self {
        Self {
            name: name.into(),
            holidays,
        }
    }
}

impl ExternalFeatureSource for HolidayCalendarSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, timestamps: &[DateTime<Utc>]) -> Result<Vec<Feature>> {
        let values: Vec<Option<f64>> = timestamps
            .iter()
            .map(|t| {
                if self.holidays.contains(&t.date_naive()) {
                    Some(1.0)
                } else {
                    Some(0.0)
                }
            })
            .collect();
        Ok(vec![Feature::binary(
            format!("{}_holiday", self.name),
            values,
            "1 on dates present in the external holiday calendar",
        )])
    }
}
