//! Configuration system for the algae forecast views
//! Manages engine settings, display settings and view presets

use algae_forecast_data::{BucketingEngine, EngineOptions, DEFAULT_CACHE_CAPACITY};
use algae_forecast_shared::{
    CategoryPolicy, ForecastError, Locale, OrderingPolicy, SeriesOptions, WindowDays,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod parser;
pub mod presets;
pub mod validation;

pub use parser::{ConfigFormat, ConfigParser, ConfigSerializer, TemplateExpander};
pub use presets::{PresetInfo, PresetManager, ViewPreset};
pub use validation::ConfigValidator;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Engine(#[from] ForecastError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub version: String,
    pub engine: EngineSection,
    pub display: DisplaySection,
    /// Extra presets on top of the built-in ones
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub presets: Vec<ViewPreset>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            engine: EngineSection::default(),
            display: DisplaySection::default(),
            presets: Vec::new(),
        }
    }
}

/// Bucketing and ingestion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    pub locale: Locale,
    pub weekly_window_days: u32,
    pub monthly_window_days: u32,
    pub ordering: OrderingPolicy,
    pub categories: CategoryPolicy,
    pub cache_capacity: usize,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            locale: Locale::EsMx,
            weekly_window_days: WindowDays::WEEK.get(),
            monthly_window_days: WindowDays::MONTH.get(),
            ordering: OrderingPolicy::Sort,
            categories: CategoryPolicy::FirstPoint,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Chart display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// Decimal places shown on chart values; raw values when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    pub default_preset: String,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            precision: None,
            default_preset: presets::WEEK_PREDICTION.to_string(),
        }
    }
}

impl ForecastConfig {
    pub fn engine_options(&self) -> Result<EngineOptions> {
        Ok(EngineOptions {
            locale: self.engine.locale,
            weekly_window: WindowDays::new(self.engine.weekly_window_days)?,
            monthly_window: WindowDays::new(self.engine.monthly_window_days)?,
        })
    }

    pub fn series_options(&self) -> SeriesOptions {
        SeriesOptions {
            ordering: self.engine.ordering,
            categories: self.engine.categories,
        }
    }

    pub fn build_engine(&self) -> Result<BucketingEngine> {
        Ok(BucketingEngine::new(self.engine_options()?))
    }

    /// Built-in presets plus the ones declared in this file
    pub fn preset_manager(&self) -> Result<PresetManager> {
        let mut manager = PresetManager::new();
        for preset in &self.presets {
            manager.add_user_preset(preset.clone())?;
        }
        Ok(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_engine_defaults() {
        let config = ForecastConfig::default();
        assert_eq!(config.engine_options().unwrap(), EngineOptions::default());
        assert_eq!(config.series_options(), SeriesOptions::default());
        assert_eq!(config.engine.cache_capacity, 32);
        assert_eq!(config.display.default_preset, "week-prediction");
    }

    #[test]
    fn test_zero_window_surfaces_engine_error() {
        let mut config = ForecastConfig::default();
        config.engine.weekly_window_days = 0;

        match config.engine_options() {
            Err(ConfigError::Engine(ForecastError::InvalidWindowDays { days })) => {
                assert_eq!(days, 0)
            }
            other => panic!("expected InvalidWindowDays, got {:?}", other),
        }
    }

    #[test]
    fn test_user_presets_join_builtins() {
        let mut config = ForecastConfig::default();
        config.presets.push(ViewPreset {
            name: "season".to_string(),
            chart_id: "seasonChart".to_string(),
            modes: vec![algae_forecast_shared::ViewMode::Monthly],
            dataset_label: "Biomasa".to_string(),
        });

        let manager = config.preset_manager().unwrap();
        assert!(manager.get("season").is_some());
        assert!(manager.get("week-prediction").is_some());
    }
}
