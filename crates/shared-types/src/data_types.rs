//! Common data types used across the system

use crate::{CategoryPolicy, DateRange, ForecastError, ForecastResult, OrderingPolicy};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One forecasted value for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub value: f64,
    #[serde(default)]
    pub category: Option<String>,
}

impl DailyPoint {
    pub fn new(date: NaiveDate, value: f64, category: Option<String>) -> Self {
        Self {
            date,
            value,
            category,
        }
    }
}

/// Aggregated value over an inclusive date range, ready for charting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub value: f64,
    pub category: Option<String>,
    pub range: DateRange,
}

/// Normalization applied when a series is built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesOptions {
    pub ordering: OrderingPolicy,
    pub categories: CategoryPolicy,
}

/// Daily series produced by one prediction run.
///
/// Points are always in ascending date order and the category is decided
/// once, at construction. Each run gets a fresh `id`, so derived views can be
/// cached per run.
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    id: Uuid,
    category: Option<String>,
    category_policy: CategoryPolicy,
    points: Vec<DailyPoint>,
}

impl Series {
    /// Build a series from boundary records, normalizing per `options`
    pub fn from_points(mut points: Vec<DailyPoint>, options: SeriesOptions) -> ForecastResult<Self> {
        if let Some(i) = first_out_of_order(&points) {
            match options.ordering {
                OrderingPolicy::Sort => {
                    log::debug!(
                        "Series out of date order at index {} ({} after {}), sorting",
                        i,
                        points[i].date,
                        points[i - 1].date
                    );
                    points.sort_by_key(|p| p.date);
                }
                OrderingPolicy::Reject => {
                    return Err(ForecastError::UnsortedInput {
                        previous: points[i - 1].date,
                        next: points[i].date,
                    });
                }
            }
        }

        let category = points.first().and_then(|p| p.category.clone());

        if let Some(stray) = points.iter().find(|p| p.category != category) {
            match options.categories {
                CategoryPolicy::FirstPoint => {
                    log::warn!(
                        "Series mixes categories ({:?} and {:?} on {}); labelling all buckets {:?}",
                        category,
                        stray.category,
                        stray.date,
                        category
                    );
                }
                CategoryPolicy::Strict => {
                    return Err(ForecastError::MixedCategories {
                        expected: category,
                        found: stray.category.clone(),
                        date: stray.date,
                    });
                }
                CategoryPolicy::PerBucket => {}
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            category,
            category_policy: options.categories,
            points,
        })
    }

    /// Build a series whose every point carries `category`
    pub fn with_category(
        category: Option<String>,
        values: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Self {
        let mut points: Vec<DailyPoint> = values
            .into_iter()
            .map(|(date, value)| DailyPoint::new(date, value, category.clone()))
            .collect();
        points.sort_by_key(|p| p.date);

        Self {
            id: Uuid::new_v4(),
            category,
            category_policy: CategoryPolicy::FirstPoint,
            points,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn category_policy(&self) -> CategoryPolicy {
        self.category_policy
    }

    pub fn points(&self) -> &[DailyPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First to last date, `None` when empty
    pub fn date_range(&self) -> Option<DateRange> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some(DateRange::new(first.date, last.date)),
            _ => None,
        }
    }
}

impl Default for Series {
    fn default() -> Self {
        Self::with_category(None, std::iter::empty())
    }
}

fn first_out_of_order(points: &[DailyPoint]) -> Option<usize> {
    points
        .windows(2)
        .position(|pair| pair[1].date < pair[0].date)
        .map(|i| i + 1)
}

/// Parallel projections consumed by the chart renderer; index `i` of every
/// list describes the same bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub categories: Vec<String>,
}

impl ChartSeries {
    pub fn from_buckets(buckets: &[Bucket]) -> Self {
        Self {
            labels: buckets.iter().map(|b| b.label.clone()).collect(),
            values: buckets.iter().map(|b| b.value).collect(),
            categories: buckets
                .iter()
                .map(|b| b.category.clone().unwrap_or_default())
                .collect(),
        }
    }

    /// Round values for display to `precision` decimal places
    pub fn round_values(mut self, precision: u32) -> Self {
        let factor = 10f64.powi(precision as i32);
        for value in &mut self.values {
            *value = (*value * factor).round() / factor;
        }
        self
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl From<&[Bucket]> for ChartSeries {
    fn from(buckets: &[Bucket]) -> Self {
        Self::from_buckets(buckets)
    }
}

/// One row of the prediction service response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub date: String,
    pub biomass: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algae: Option<String>,
}

/// Prediction service response. Only `predictions` is consumed here; the
/// form echo fields are carried for logging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionPayload {
    #[serde(default)]
    pub specie: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub weeks: Option<u32>,
    #[serde(default)]
    pub predictions: Vec<PredictionRecord>,
}
