//! View presets: which chart a prediction screen draws into and which
//! view modes it offers

use crate::{ConfigError, Result};
use algae_forecast_shared::ViewMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const WEEK_PREDICTION: &str = "week-prediction";
pub const MONTH_PREDICTION: &str = "month-prediction";

/// One prediction screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPreset {
    pub name: String,
    /// Id of the chart slot the screen renders into
    pub chart_id: String,
    /// Modes offered by the view switcher, in display order
    pub modes: Vec<ViewMode>,
    pub dataset_label: String,
}

impl ViewPreset {
    pub fn supports(&self, mode: ViewMode) -> bool {
        self.modes.contains(&mode)
    }

    /// Short-horizon screen: daily and weekly views
    pub fn week_prediction() -> Self {
        Self {
            name: WEEK_PREDICTION.to_string(),
            chart_id: "yourChartId".to_string(),
            modes: vec![ViewMode::Daily, ViewMode::Weekly],
            dataset_label: "Biomasa".to_string(),
        }
    }

    /// Long-horizon screen: every view
    pub fn month_prediction() -> Self {
        Self {
            name: MONTH_PREDICTION.to_string(),
            chart_id: "monthChart".to_string(),
            modes: ViewMode::ALL.to_vec(),
            dataset_label: "Biomass".to_string(),
        }
    }
}

/// Preset summary for listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetInfo {
    pub name: String,
    pub chart_id: String,
    pub modes: Vec<ViewMode>,
    pub is_builtin: bool,
}

/// Preset manager for prediction screens
pub struct PresetManager {
    builtin_presets: HashMap<String, ViewPreset>,
    user_presets: HashMap<String, ViewPreset>,
}

impl PresetManager {
    pub fn new() -> Self {
        let builtin_presets = [ViewPreset::week_prediction(), ViewPreset::month_prediction()]
            .into_iter()
            .map(|preset| (preset.name.clone(), preset))
            .collect();

        Self {
            builtin_presets,
            user_presets: HashMap::new(),
        }
    }

    /// Get a preset by name; built-ins win
    pub fn get(&self, name: &str) -> Option<&ViewPreset> {
        self.builtin_presets
            .get(name)
            .or_else(|| self.user_presets.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Add a user preset; built-in names are reserved
    pub fn add_user_preset(&mut self, preset: ViewPreset) -> Result<()> {
        if self.builtin_presets.contains_key(&preset.name) {
            return Err(ConfigError::Validation(format!(
                "Cannot override built-in preset: {}",
                preset.name
            )));
        }

        if preset.modes.is_empty() {
            return Err(ConfigError::Validation(format!(
                "Preset {} offers no view modes",
                preset.name
            )));
        }

        log::debug!("Registered user preset {}", preset.name);
        self.user_presets.insert(preset.name.clone(), preset);
        Ok(())
    }

    pub fn remove_user_preset(&mut self, name: &str) -> Result<Option<ViewPreset>> {
        if self.builtin_presets.contains_key(name) {
            return Err(ConfigError::Validation(format!(
                "Cannot remove built-in preset: {}",
                name
            )));
        }

        Ok(self.user_presets.remove(name))
    }

    /// All presets sorted by name
    pub fn list_presets(&self) -> Vec<PresetInfo> {
        let builtin = self.builtin_presets.values().map(|p| (p, true));
        let user = self.user_presets.values().map(|p| (p, false));

        let mut presets: Vec<PresetInfo> = builtin
            .chain(user)
            .map(|(preset, is_builtin)| PresetInfo {
                name: preset.name.clone(),
                chart_id: preset.chart_id.clone(),
                modes: preset.modes.clone(),
                is_builtin,
            })
            .collect();

        presets.sort_by(|a, b| a.name.cmp(&b.name));
        presets
    }
}

impl Default for PresetManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_presets() {
        let manager = PresetManager::new();

        let week = manager.get(WEEK_PREDICTION).unwrap();
        assert_eq!(week.chart_id, "yourChartId");
        assert!(week.supports(ViewMode::Weekly));
        assert!(!week.supports(ViewMode::Monthly));

        let month = manager.get(MONTH_PREDICTION).unwrap();
        assert_eq!(month.chart_id, "monthChart");
        assert_eq!(month.dataset_label, "Biomass");
        assert!(month.supports(ViewMode::Monthly));
    }

    #[test]
    fn test_cannot_override_builtin() {
        let mut manager = PresetManager::new();
        let mut preset = ViewPreset::week_prediction();
        preset.chart_id = "otherChart".to_string();

        assert!(matches!(
            manager.add_user_preset(preset),
            Err(ConfigError::Validation(_))
        ));
        assert_eq!(manager.get(WEEK_PREDICTION).unwrap().chart_id, "yourChartId");
        assert!(manager.remove_user_preset(WEEK_PREDICTION).is_err());
    }

    #[test]
    fn test_user_preset_lifecycle() {
        let mut manager = PresetManager::new();
        let preset = ViewPreset {
            name: "daily-only".to_string(),
            chart_id: "dailyChart".to_string(),
            modes: vec![ViewMode::Daily],
            dataset_label: "Biomasa".to_string(),
        };

        manager.add_user_preset(preset.clone()).unwrap();
        let names: Vec<String> = manager.list_presets().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["daily-only", "month-prediction", "week-prediction"]);

        assert_eq!(manager.remove_user_preset("daily-only").unwrap(), Some(preset));
        assert!(!manager.contains("daily-only"));
    }

    #[test]
    fn test_preset_without_modes_is_rejected() {
        let mut manager = PresetManager::new();
        let preset = ViewPreset {
            name: "empty".to_string(),
            chart_id: "emptyChart".to_string(),
            modes: Vec::new(),
            dataset_label: String::new(),
        };
        assert!(manager.add_user_preset(preset).is_err());
    }
}
