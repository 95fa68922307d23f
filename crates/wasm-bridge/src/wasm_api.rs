//! JavaScript-facing API for one prediction screen
//!
//! Errors cross the boundary as `ErrorResponse` JSON strings.

use crate::registry::{ChartRegistry, RenderedChart};
use crate::view::PredictionView;
use algae_forecast_config::PresetManager;
use algae_forecast_shared::{ErrorResponse, ForecastError, ViewMode};
use wasm_bindgen::prelude::*;

fn to_js_error(error: ForecastError, operation: &str) -> JsValue {
    JsValue::from_str(
        &ErrorResponse::new(error)
            .with_context("WasmPredictionView", operation)
            .to_json(),
    )
}

#[wasm_bindgen]
pub struct WasmPredictionView {
    view: PredictionView,
    charts: ChartRegistry<RenderedChart>,
}

#[wasm_bindgen]
impl WasmPredictionView {
    /// Screen for the built-in preset `preset`
    #[wasm_bindgen(constructor)]
    pub fn new(preset: &str) -> Result<WasmPredictionView, JsValue> {
        console_error_panic_hook::set_once();

        let preset = PresetManager::new().get(preset).cloned().ok_or_else(|| {
            to_js_error(
                ForecastError::InvalidConfig {
                    message: format!("Unknown preset: {}", preset),
                    field: Some("preset".to_string()),
                },
                "new",
            )
        })?;

        Ok(WasmPredictionView {
            view: PredictionView::standalone(preset),
            charts: ChartRegistry::new(),
        })
    }

    /// Load a prediction response; returns the number of days loaded
    #[wasm_bindgen]
    pub fn load_predictions(&mut self, json: &str) -> Result<usize, JsValue> {
        let series = self
            .view
            .load_json(json)
            .map_err(|e| to_js_error(e, "load_predictions"))?;
        Ok(series.len())
    }

    /// Switch views; returns the chart data as JSON
    #[wasm_bindgen]
    pub fn change_view_mode(&mut self, mode: &str) -> Result<String, JsValue> {
        let mode: ViewMode = mode
            .parse()
            .map_err(|e| to_js_error(e, "change_view_mode"))?;
        let series = self
            .view
            .change_view_mode(mode)
            .map_err(|e| to_js_error(e, "change_view_mode"))?;
        self.view
            .render(&mut self.charts)
            .map_err(|e| to_js_error(e, "change_view_mode"))?;

        serde_json::to_string(&series)
            .map_err(|e| to_js_error(ForecastError::from(e), "change_view_mode"))
    }

    #[wasm_bindgen]
    pub fn current_mode(&self) -> String {
        self.view.current_mode().to_string()
    }

    #[wasm_bindgen]
    pub fn available_modes(&self) -> js_sys::Array {
        self.view
            .preset()
            .modes
            .iter()
            .map(|mode| JsValue::from_str(mode.as_str()))
            .collect()
    }

    #[wasm_bindgen]
    pub fn chart_id(&self) -> String {
        self.view.preset().chart_id.clone()
    }

    /// Forget the loaded run and dispose the chart
    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.view.clear();
        self.charts.dispose_all();
    }
}
