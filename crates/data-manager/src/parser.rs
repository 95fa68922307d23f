//! Prediction payload parser
//!
//! Turns the prediction service response into typed daily points. The service
//! answers either with the echoed form plus a `predictions` array or with the
//! bare array.

use algae_forecast_shared::{
    DailyPoint, ForecastError, ForecastResult, PredictionPayload, PredictionRecord, Series,
    SeriesOptions,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Naive timestamp layouts accepted after plain dates and RFC 3339
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parser for prediction service responses
pub struct PredictionParser;

impl PredictionParser {
    /// Parse a response body, accepting the payload object or a bare array
    pub fn parse_payload(json: &str) -> ForecastResult<PredictionPayload> {
        let value: serde_json::Value = serde_json::from_str(json)?;

        match value {
            serde_json::Value::Array(_) => Ok(PredictionPayload {
                predictions: serde_json::from_value(value)?,
                ..Default::default()
            }),
            serde_json::Value::Object(_) => Ok(serde_json::from_value(value)?),
            other => Err(ForecastError::DataParse {
                message: format!("Expected an object or an array, got {}", json_kind(&other)),
                offset: None,
            }),
        }
    }

    /// Parse a response body into daily points, in payload order
    pub fn parse_json(json: &str) -> ForecastResult<Vec<DailyPoint>> {
        let payload = Self::parse_payload(json)?;
        log::debug!(
            "Parsed {} predictions (specie: {:?}, site: {:?})",
            payload.predictions.len(),
            payload.specie,
            payload.site
        );
        Self::records_to_points(&payload.predictions)
    }

    /// Parse a response body straight into a normalized series
    pub fn parse_series(json: &str, options: SeriesOptions) -> ForecastResult<Series> {
        Series::from_points(Self::parse_json(json)?, options)
    }

    pub fn records_to_points(records: &[PredictionRecord]) -> ForecastResult<Vec<DailyPoint>> {
        records.iter().map(Self::record_to_point).collect()
    }

    pub fn record_to_point(record: &PredictionRecord) -> ForecastResult<DailyPoint> {
        Ok(DailyPoint {
            date: Self::parse_date(&record.date)?,
            value: record.biomass,
            category: record.algae.clone(),
        })
    }

    /// Calendar date of an ISO-8601 date or timestamp.
    ///
    /// Timestamps keep the date in their own offset; no timezone conversion
    /// happens.
    pub fn parse_date(value: &str) -> ForecastResult<NaiveDate> {
        let trimmed = value.trim();

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(date);
        }

        if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(timestamp.date_naive());
        }

        NAIVE_DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .map(|timestamp| timestamp.date())
            .ok_or_else(|| ForecastError::DateParse {
                value: value.to_string(),
                message: "expected YYYY-MM-DD or an ISO-8601 timestamp".to_string(),
            })
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
