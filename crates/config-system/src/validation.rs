//! Configuration validation utilities

use crate::{ConfigError, DisplaySection, EngineSection, ForecastConfig, PresetManager, Result};
use algae_forecast_shared::Locale;

/// Largest number of decimal places shown on chart values
pub const MAX_PRECISION: u32 = 10;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration
    pub fn validate(config: &ForecastConfig) -> Result<()> {
        Self::validate_engine(&config.engine)?;
        Self::validate_display(&config.display)?;
        Self::validate_cross_field(config)?;
        Ok(())
    }

    fn validate_engine(engine: &EngineSection) -> Result<()> {
        if engine.weekly_window_days == 0 {
            return Err(ConfigError::Validation(
                "Invalid weekly_window_days: 0. Must be at least 1".to_string(),
            ));
        }

        if engine.monthly_window_days == 0 {
            return Err(ConfigError::Validation(
                "Invalid monthly_window_days: 0. Must be at least 1".to_string(),
            ));
        }

        if engine.monthly_window_days < engine.weekly_window_days {
            return Err(ConfigError::Validation(format!(
                "monthly_window_days ({}) must not be shorter than weekly_window_days ({})",
                engine.monthly_window_days, engine.weekly_window_days
            )));
        }

        if engine.cache_capacity == 0 {
            return Err(ConfigError::Validation(
                "Invalid cache_capacity: 0. Must be at least 1".to_string(),
            ));
        }

        if engine.weekly_window_days != 7 || engine.monthly_window_days != 30 {
            log::warn!(
                "Non-standard windows ({} / {} days); labels still read as weeks and months",
                engine.weekly_window_days,
                engine.monthly_window_days
            );
        }

        if engine.locale != Locale::EsMx {
            log::debug!("Labels will be rendered in {}", engine.locale);
        }

        Ok(())
    }

    fn validate_display(display: &DisplaySection) -> Result<()> {
        if let Some(precision) = display.precision {
            if precision > MAX_PRECISION {
                return Err(ConfigError::Validation(format!(
                    "Invalid precision: {}. Must be between 0 and {}",
                    precision, MAX_PRECISION
                )));
            }
        }

        Ok(())
    }

    /// Presets must register cleanly and the default must exist
    fn validate_cross_field(config: &ForecastConfig) -> Result<()> {
        let manager: PresetManager = config.preset_manager()?;

        if !manager.contains(&config.display.default_preset) {
            return Err(ConfigError::Validation(format!(
                "Unknown default_preset: {}",
                config.display.default_preset
            )));
        }

        Ok(())
    }
}
