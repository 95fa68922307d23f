//! Common error types used across all forecast crates
//! Provides consistent error handling and reporting

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base error type for all forecast operations
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum ForecastError {
    // Contract errors
    #[error("Invalid window size: {days} days. Must be a positive number of days")]
    InvalidWindowDays { days: i64 },

    #[error("Series is not sorted by date: {next} follows {previous}")]
    UnsortedInput {
        previous: NaiveDate,
        next: NaiveDate,
    },

    #[error("Mixed categories in series: expected {expected:?} but found {found:?} on {date}")]
    MixedCategories {
        expected: Option<String>,
        found: Option<String>,
        date: NaiveDate,
    },

    // Data-related errors
    #[error("Invalid date '{value}': {message}")]
    DateParse { value: String, message: String },

    #[error("Data parse error: {message}")]
    DataParse {
        message: String,
        offset: Option<usize>,
    },

    #[error("Series not found: {id}")]
    SeriesNotFound { id: String },

    // View errors
    #[error("Unknown view mode: {mode}")]
    UnknownViewMode { mode: String },

    #[error("View mode '{mode}' is not offered by preset '{preset}'")]
    UnsupportedViewMode { mode: String, preset: String },

    #[error("Unsupported locale: {locale}")]
    UnsupportedLocale { locale: String },

    // Configuration errors
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        message: String,
        field: Option<String>,
    },

    // Chart registry errors
    #[error("Chart not found: {id}")]
    ChartNotFound { id: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Result type alias for forecast operations
pub type ForecastResult<T> = Result<T, ForecastError>;

/// Error response structure for JavaScript interop
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ForecastError,
    pub timestamp: u64,
    pub context: Option<ErrorContext>,
}

/// Additional context for error reporting
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorContext {
    pub component: String,
    pub operation: String,
    pub metadata: serde_json::Value,
}

impl ErrorResponse {
    pub fn new(error: ForecastError) -> Self {
        Self {
            success: false,
            error,
            timestamp: chrono::Utc::now().timestamp_millis() as u64,
            context: None,
        }
    }

    /// Add context to the error response
    pub fn with_context(mut self, component: &str, operation: &str) -> Self {
        self.context = Some(ErrorContext {
            component: component.to_string(),
            operation: operation.to_string(),
            metadata: serde_json::Value::Null,
        });
        self
    }

    /// Add metadata to the error context. No-op without a context.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        if let Some(ref mut ctx) = self.context {
            ctx.metadata = metadata;
        }
        self
    }

    /// Convert to JSON string for JavaScript
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"error":{"type":"Internal","details":{"message":"Failed to serialize error"}}}"#.to_string()
        })
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::DataParse {
            message: err.to_string(),
            offset: Some(err.column()),
        }
    }
}
