//! Data Manager crate for the algae forecast views
//! Turns prediction payloads into series and derives chart-ready views from them

pub mod aggregation;
pub mod cache;
pub mod labels;
pub mod parser;

use algae_forecast_shared::{Bucket, ForecastError, ForecastResult, Series, SeriesOptions, ViewMode};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub use aggregation::{average, bucketize, select_view, BucketingEngine, EngineOptions};
pub use cache::{CacheStats, ThreadSafeViewCache, ViewCache, ViewKey};
pub use labels::LabelFormatter;
pub use parser::PredictionParser;

/// Default number of memoized views
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// Main data manager that coordinates parsing, bucketing and view caching
pub struct DataManager {
    engine: BucketingEngine,
    series_options: SeriesOptions,
    cache: ViewCache,
    active_series: HashMap<Uuid, Arc<Series>>,
}

impl DataManager {
    pub fn new(engine: BucketingEngine, series_options: SeriesOptions) -> Self {
        Self::with_cache_capacity(engine, series_options, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_cache_capacity(
        engine: BucketingEngine,
        series_options: SeriesOptions,
        cache_capacity: usize,
    ) -> Self {
        Self {
            engine,
            series_options,
            cache: ViewCache::new(cache_capacity),
            active_series: HashMap::new(),
        }
    }

    pub fn engine(&self) -> &BucketingEngine {
        &self.engine
    }

    pub fn series_options(&self) -> SeriesOptions {
        self.series_options
    }

    /// Parse a prediction response and keep the resulting series
    pub fn ingest_json(&mut self, json: &str) -> ForecastResult<Arc<Series>> {
        let series = PredictionParser::parse_series(json, self.series_options)?;
        Ok(self.ingest(series))
    }

    /// Keep `series` until released
    pub fn ingest(&mut self, series: Series) -> Arc<Series> {
        let series = Arc::new(series);
        log::debug!(
            "Ingested series {} ({} points, category {:?})",
            series.id(),
            series.len(),
            series.category()
        );
        self.active_series.insert(series.id(), Arc::clone(&series));
        series
    }

    pub fn get_series(&self, id: &Uuid) -> Option<Arc<Series>> {
        self.active_series.get(id).cloned()
    }

    /// Buckets of one view of a held series, derived once per series and mode
    pub fn view(&mut self, id: &Uuid, mode: ViewMode) -> ForecastResult<Arc<Vec<Bucket>>> {
        let series = self
            .active_series
            .get(id)
            .ok_or_else(|| ForecastError::SeriesNotFound { id: id.to_string() })?;

        Ok(self.cache.get_or_derive(&self.engine, series, mode))
    }

    /// Forget a series and every view derived from it
    pub fn release(&mut self, id: &Uuid) -> Option<Arc<Series>> {
        self.cache.evict_series(*id);
        self.active_series.remove(id)
    }

    pub fn active_count(&self) -> usize {
        self.active_series.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn get_stats(&self) -> CacheStats {
        self.cache.get_stats()
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self::new(BucketingEngine::default(), SeriesOptions::default())
    }
}
