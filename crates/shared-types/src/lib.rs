//! Shared types for the algae forecast views
//!
//! This crate contains all types that are shared between the data-manager,
//! config-system, and wasm-bridge crates: the daily series model, the bucket
//! model handed to chart renderers, and the error taxonomy.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod data_types;
pub mod errors;

pub use data_types::{
    Bucket, ChartSeries, DailyPoint, PredictionPayload, PredictionRecord, Series, SeriesOptions,
};
pub use errors::{ErrorContext, ErrorResponse, ForecastError, ForecastResult};

/// Inclusive calendar range `[start, end]`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range covering a single day
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Number of calendar days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Bucket width in days. Always at least one day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "i64", into = "u32")]
pub struct WindowDays(u32);

impl WindowDays {
    pub const WEEK: WindowDays = WindowDays(7);
    pub const MONTH: WindowDays = WindowDays(30);

    pub fn new(days: u32) -> ForecastResult<Self> {
        if days == 0 {
            return Err(ForecastError::InvalidWindowDays { days: 0 });
        }
        Ok(Self(days))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Last day of the window that opens on `start`
    pub fn window_end(&self, start: NaiveDate) -> NaiveDate {
        start
            .checked_add_days(Days::new(u64::from(self.0 - 1)))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Range of the window that opens on `start`
    pub fn window_from(&self, start: NaiveDate) -> DateRange {
        DateRange::new(start, self.window_end(start))
    }
}

impl TryFrom<i64> for WindowDays {
    type Error = ForecastError;

    fn try_from(days: i64) -> ForecastResult<Self> {
        match u32::try_from(days) {
            Ok(days) if days > 0 => Ok(Self(days)),
            _ => Err(ForecastError::InvalidWindowDays { days }),
        }
    }
}

impl From<WindowDays> for u32 {
    fn from(window: WindowDays) -> u32 {
        window.0
    }
}

impl fmt::Display for WindowDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days", self.0)
    }
}

/// Granularity a prediction view is rendered at
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Daily, ViewMode::Weekly, ViewMode::Monthly];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Daily => "daily",
            ViewMode::Weekly => "weekly",
            ViewMode::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = ForecastError;

    fn from_str(s: &str) -> ForecastResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(ViewMode::Daily),
            "weekly" => Ok(ViewMode::Weekly),
            "monthly" => Ok(ViewMode::Monthly),
            _ => Err(ForecastError::UnknownViewMode {
                mode: s.to_string(),
            }),
        }
    }
}

/// Locale used for bucket and day labels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    #[serde(rename = "es-MX")]
    EsMx,
    #[serde(rename = "en-US")]
    EnUs,
}

impl Locale {
    pub fn as_tag(&self) -> &'static str {
        match self {
            Locale::EsMx => "es-MX",
            Locale::EnUs => "en-US",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for Locale {
    type Err = ForecastError;

    fn from_str(s: &str) -> ForecastResult<Self> {
        match s.trim().replace('_', "-").to_ascii_lowercase().as_str() {
            "es-mx" | "es" => Ok(Locale::EsMx),
            "en-us" | "en" => Ok(Locale::EnUs),
            _ => Err(ForecastError::UnsupportedLocale {
                locale: s.to_string(),
            }),
        }
    }
}

/// What to do when a series arrives out of date order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderingPolicy {
    /// Stable-sort by date at entry
    #[default]
    Sort,
    /// Fail with `UnsortedInput`
    Reject,
}

/// How the category label of a series is decided
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CategoryPolicy {
    /// First point's category labels the whole series; disagreement is logged
    #[default]
    FirstPoint,
    /// Disagreement fails with `MixedCategories`
    Strict,
    /// Each bucket takes the category of its own first point
    PerBucket,
}
