//! Chart registry keyed by chart slot id
//!
//! Each prediction screen draws into one slot. Rendering a new chart into an
//! occupied slot disposes the chart that was there, so a slot never holds
//! two live charts.

use algae_forecast_shared::{ChartSeries, ForecastError, ForecastResult, ViewMode};
use serde::Serialize;
use std::collections::HashMap;

/// A live chart owned by the registry
pub trait ChartHandle {
    /// Release whatever the chart holds; called exactly once
    fn dispose(&mut self);
}

/// Live charts by slot id
pub struct ChartRegistry<C: ChartHandle> {
    charts: HashMap<String, C>,
}

impl<C: ChartHandle> ChartRegistry<C> {
    pub fn new() -> Self {
        Self {
            charts: HashMap::new(),
        }
    }

    /// Bind `chart` to `id`, disposing the chart previously bound there.
    /// Returns whether a chart was replaced.
    pub fn replace(&mut self, id: impl Into<String>, chart: C) -> bool {
        let id = id.into();
        match self.charts.insert(id.clone(), chart) {
            Some(mut previous) => {
                previous.dispose();
                log::info!("Replaced chart {}", id);
                true
            }
            None => {
                log::info!("Created chart {}", id);
                false
            }
        }
    }

    /// Dispose and unbind the chart bound to `id`
    pub fn dispose(&mut self, id: &str) -> ForecastResult<()> {
        let mut chart = self
            .charts
            .remove(id)
            .ok_or_else(|| ForecastError::ChartNotFound { id: id.to_string() })?;

        chart.dispose();
        log::info!("Disposed chart {}", id);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&C> {
        self.charts.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.charts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.charts.keys().map(String::as_str)
    }

    pub fn dispose_all(&mut self) {
        let count = self.charts.len();
        for (_, mut chart) in self.charts.drain() {
            chart.dispose();
        }
        if count > 0 {
            log::info!("Disposed {} charts", count);
        }
    }
}

impl<C: ChartHandle> Default for ChartRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ChartHandle> Drop for ChartRegistry<C> {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

/// Chart description handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedChart {
    pub dataset_label: String,
    pub mode: ViewMode,
    pub series: ChartSeries,
    #[serde(skip)]
    disposed: bool,
}

impl RenderedChart {
    pub fn new(dataset_label: impl Into<String>, mode: ViewMode, series: ChartSeries) -> Self {
        Self {
            dataset_label: dataset_label.into(),
            mode,
            series,
            disposed: false,
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl ChartHandle for RenderedChart {
    fn dispose(&mut self) {
        self.series = ChartSeries::default();
        self.disposed = true;
    }
}
