//! Prediction screen controller
//!
//! Holds the current prediction run of one screen and the view mode picked in
//! its switcher. Loading a new run resets the screen to the daily view.

use crate::registry::{ChartRegistry, RenderedChart};
use algae_forecast_config::{ConfigError, ForecastConfig, ViewPreset};
use algae_forecast_data::DataManager;
use algae_forecast_shared::{ChartSeries, ForecastError, ForecastResult, Series, ViewMode};
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;

pub struct PredictionView {
    manager: Arc<Mutex<DataManager>>,
    preset: ViewPreset,
    precision: Option<u32>,
    series_id: Option<Uuid>,
    mode: ViewMode,
}

impl PredictionView {
    /// Screen sharing `manager` (and its view cache) with other screens
    pub fn new(manager: Arc<Mutex<DataManager>>, preset: ViewPreset) -> Self {
        Self {
            manager,
            preset,
            precision: None,
            series_id: None,
            mode: ViewMode::Daily,
        }
    }

    pub fn standalone(preset: ViewPreset) -> Self {
        Self::new(Arc::new(Mutex::new(DataManager::default())), preset)
    }

    /// Screen configured from a config file; `preset` defaults to the
    /// configured default preset
    pub fn from_config(
        config: &ForecastConfig,
        preset: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let name = preset.unwrap_or(config.display.default_preset.as_str());
        let preset = config
            .preset_manager()?
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::Validation(format!("Unknown preset: {}", name)))?;

        let manager = DataManager::with_cache_capacity(
            config.build_engine()?,
            config.series_options(),
            config.engine.cache_capacity,
        );

        Ok(Self::new(Arc::new(Mutex::new(manager)), preset).with_precision(config.display.precision))
    }

    pub fn with_precision(mut self, precision: Option<u32>) -> Self {
        self.precision = precision;
        self
    }

    pub fn preset(&self) -> &ViewPreset {
        &self.preset
    }

    pub fn current_mode(&self) -> ViewMode {
        self.mode
    }

    pub fn series(&self) -> Option<Arc<Series>> {
        let id = self.series_id?;
        self.manager.lock().get_series(&id)
    }

    /// Show a new prediction run, starting from the daily view
    pub fn load(&mut self, series: Series) -> Arc<Series> {
        let mut manager = self.manager.lock();
        if let Some(previous) = self.series_id.take() {
            manager.release(&previous);
        }

        let series = manager.ingest(series);
        self.series_id = Some(series.id());
        self.mode = ViewMode::Daily;
        series
    }

    /// Parse a prediction response and show it
    pub fn load_json(&mut self, json: &str) -> ForecastResult<Arc<Series>> {
        let options = self.manager.lock().series_options();
        let series = algae_forecast_data::PredictionParser::parse_series(json, options)?;
        Ok(self.load(series))
    }

    /// Switch the view mode and return the chart data for it
    pub fn change_view_mode(&mut self, mode: ViewMode) -> ForecastResult<ChartSeries> {
        if !self.preset.supports(mode) {
            return Err(ForecastError::UnsupportedViewMode {
                mode: mode.to_string(),
                preset: self.preset.name.clone(),
            });
        }

        self.mode = mode;
        self.chart_series()
    }

    /// Chart data for the current mode; empty before anything is loaded
    pub fn chart_series(&self) -> ForecastResult<ChartSeries> {
        let Some(id) = self.series_id else {
            return Ok(ChartSeries::default());
        };

        let buckets = self.manager.lock().view(&id, self.mode)?;
        let series = ChartSeries::from_buckets(&buckets);
        Ok(match self.precision {
            Some(precision) => series.round_values(precision),
            None => series,
        })
    }

    /// Draw the current view into the preset's chart slot, replacing what
    /// was there
    pub fn render(&self, registry: &mut ChartRegistry<RenderedChart>) -> ForecastResult<bool> {
        let chart = RenderedChart::new(
            self.preset.dataset_label.clone(),
            self.mode,
            self.chart_series()?,
        );
        Ok(registry.replace(self.preset.chart_id.clone(), chart))
    }

    /// Drop the current run
    pub fn clear(&mut self) {
        if let Some(id) = self.series_id.take() {
            self.manager.lock().release(&id);
            log::debug!("Cleared series {} from {}", id, self.preset.name);
        }
    }
}

impl Drop for PredictionView {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn run(start: (i32, u32, u32), values: &[f64]) -> Series {
        let start = NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap();
        Series::with_category(
            Some("X".to_string()),
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| (start + Days::new(i as u64), v)),
        )
    }

    #[test]
    fn test_load_resets_to_daily() {
        let mut view = PredictionView::standalone(ViewPreset::month_prediction());
        view.load(run((2025, 1, 1), &[10.0; 14]));
        view.change_view_mode(ViewMode::Weekly).unwrap();
        assert_eq!(view.current_mode(), ViewMode::Weekly);

        view.load(run((2025, 2, 1), &[1.0; 3]));
        assert_eq!(view.current_mode(), ViewMode::Daily);
        assert_eq!(view.chart_series().unwrap().len(), 3);
    }

    #[test]
    fn test_week_screen_has_no_monthly_view() {
        let mut view = PredictionView::standalone(ViewPreset::week_prediction());
        view.load(run((2025, 1, 1), &[10.0; 7]));

        let err = view.change_view_mode(ViewMode::Monthly).unwrap_err();
        assert_eq!(
            err,
            ForecastError::UnsupportedViewMode {
                mode: "monthly".to_string(),
                preset: "week-prediction".to_string(),
            }
        );
        assert_eq!(view.current_mode(), ViewMode::Daily);
    }

    #[test]
    fn test_weekly_chart_series() {
        let mut view = PredictionView::standalone(ViewPreset::week_prediction());
        view.load(run((2025, 1, 1), &[10.0; 7]));

        let chart = view.change_view_mode(ViewMode::Weekly).unwrap();
        assert_eq!(chart.labels, vec!["1-7 ene 25"]);
        assert_eq!(chart.values, vec![10.0]);
        assert_eq!(chart.categories, vec!["X"]);
    }

    #[test]
    fn test_precision_rounds_values() {
        let mut view =
            PredictionView::standalone(ViewPreset::month_prediction()).with_precision(Some(2));
        view.load(run((2025, 1, 1), &[1.0, 1.0, 2.0]));

        let chart = view.change_view_mode(ViewMode::Weekly).unwrap();
        assert_eq!(chart.values, vec![1.33]);
    }

    #[test]
    fn test_render_replaces_slot() {
        let mut registry = ChartRegistry::new();
        let mut view = PredictionView::standalone(ViewPreset::month_prediction());
        view.load(run((2025, 1, 1), &[5.0; 60]));

        assert!(!view.render(&mut registry).unwrap());
        view.change_view_mode(ViewMode::Monthly).unwrap();
        assert!(view.render(&mut registry).unwrap());

        let chart = registry.get("monthChart").unwrap();
        assert_eq!(chart.mode, ViewMode::Monthly);
        assert_eq!(chart.dataset_label, "Biomass");
        assert_eq!(chart.series.len(), 2);
    }

    #[test]
    fn test_screens_share_the_manager() {
        let manager = Arc::new(Mutex::new(DataManager::default()));
        let mut week = PredictionView::new(Arc::clone(&manager), ViewPreset::week_prediction());
        let mut month = PredictionView::new(Arc::clone(&manager), ViewPreset::month_prediction());

        week.load(run((2025, 1, 1), &[1.0; 7]));
        month.load(run((2025, 1, 1), &[1.0; 30]));
        assert_eq!(manager.lock().active_count(), 2);

        week.clear();
        assert!(week.series().is_none());
        assert_eq!(week.chart_series().unwrap(), ChartSeries::default());
        assert_eq!(manager.lock().active_count(), 1);

        drop(month);
        assert_eq!(manager.lock().active_count(), 0);
    }

    #[test]
    fn test_from_config_uses_default_preset() {
        let mut config = ForecastConfig::default();
        config.display.default_preset = "month-prediction".to_string();

        let view = PredictionView::from_config(&config, None).unwrap();
        assert_eq!(view.preset().chart_id, "monthChart");

        assert!(PredictionView::from_config(&config, Some("season")).is_err());
    }
}
