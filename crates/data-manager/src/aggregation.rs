//! Window aggregation for prediction views
//!
//! Re-buckets a daily series into fixed-width day windows and averages each
//! window. Windows are anchored on the first date of the series and cover
//! absolute calendar ranges, so gaps in the input produce fewer buckets rather
//! than shifted ones.

use crate::labels::LabelFormatter;
use algae_forecast_shared::{
    Bucket, CategoryPolicy, DailyPoint, DateRange, ForecastResult, Locale, Series, SeriesOptions,
    ViewMode, WindowDays,
};
use chrono::{Days, NaiveDate};

/// Engine settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub locale: Locale,
    pub weekly_window: WindowDays,
    pub monthly_window: WindowDays,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            locale: Locale::EsMx,
            weekly_window: WindowDays::WEEK,
            monthly_window: WindowDays::MONTH,
        }
    }
}

/// Stateless bucketing engine; every call is a pure function of its inputs
#[derive(Debug, Clone, Default)]
pub struct BucketingEngine {
    options: EngineOptions,
    labels: LabelFormatter,
}

/// Values collected for the window currently open
struct Block<'a> {
    range: DateRange,
    values: Vec<f64>,
    category: Option<&'a str>,
}

impl<'a> Block<'a> {
    fn open(range: DateRange, seed: &'a DailyPoint) -> Self {
        Self {
            range,
            values: vec![seed.value],
            category: seed.category.as_deref(),
        }
    }
}

impl BucketingEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            labels: LabelFormatter::new(options.locale),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn labels(&self) -> &LabelFormatter {
        &self.labels
    }

    /// Window used for `mode`, `None` for the daily view
    pub fn window_for(&self, mode: ViewMode) -> Option<WindowDays> {
        match mode {
            ViewMode::Daily => None,
            ViewMode::Weekly => Some(self.options.weekly_window),
            ViewMode::Monthly => Some(self.options.monthly_window),
        }
    }

    /// Label for the closed range `[start, end]`
    pub fn format_range(&self, start: NaiveDate, end: NaiveDate) -> String {
        self.labels.format_range(start, end)
    }

    /// Group `series` into consecutive `window`-day buckets and average each.
    ///
    /// The first window opens on the first date of the series. A point past
    /// the open window closes it and seeds the window that contains it; no
    /// point is ever dropped and no bucket is ever empty.
    pub fn bucketize(&self, series: &Series, window: WindowDays) -> Vec<Bucket> {
        let points = series.points();
        let Some(first) = points.first() else {
            return Vec::new();
        };

        let span = series
            .date_range()
            .map(|range| range.days() as usize)
            .unwrap_or(0);
        let mut buckets = Vec::with_capacity(span / window.get() as usize + 1);

        let mut block = Block::open(window.window_from(first.date), first);

        for point in &points[1..] {
            if block.range.contains(point.date) {
                block.values.push(point.value);
                continue;
            }

            let next_start = next_window_start(block.range.start, point.date, window);
            buckets.push(self.close(&block, series));
            block = Block::open(window.window_from(next_start), point);
        }

        if !block.values.is_empty() {
            buckets.push(self.close(&block, series));
        }

        log::debug!(
            "Bucketed {} points into {} buckets of {}",
            points.len(),
            buckets.len(),
            window
        );

        buckets
    }

    /// Derive the buckets for one view mode
    pub fn select_view(&self, series: &Series, mode: ViewMode) -> Vec<Bucket> {
        match self.window_for(mode) {
            Some(window) => self.bucketize(series, window),
            None => series
                .points()
                .iter()
                .map(|point| Bucket {
                    label: self.labels.format_day(point.date),
                    value: point.value,
                    category: match series.category_policy() {
                        CategoryPolicy::PerBucket => point.category.clone(),
                        _ => series.category().map(str::to_string),
                    },
                    range: DateRange::single(point.date),
                })
                .collect(),
        }
    }

    fn close(&self, block: &Block<'_>, series: &Series) -> Bucket {
        let category = match series.category_policy() {
            CategoryPolicy::PerBucket => block.category,
            _ => series.category(),
        };

        Bucket {
            label: self.labels.format_range(block.range.start, block.range.end),
            value: average(&block.values),
            category: category.map(str::to_string),
            range: block.range,
        }
    }
}

/// Start of the first window after the one opened on `current_start` that
/// contains `date`. Whole empty windows in between are skipped.
fn next_window_start(current_start: NaiveDate, date: NaiveDate, window: WindowDays) -> NaiveDate {
    let width = i64::from(window.get());
    let offset = (date - current_start).num_days();
    let windows_ahead = (offset / width).max(1);

    if windows_ahead > 1 {
        log::debug!(
            "Gap before {}: skipping {} empty windows",
            date,
            windows_ahead - 1
        );
    }

    current_start
        .checked_add_days(Days::new((windows_ahead * width) as u64))
        .unwrap_or(NaiveDate::MAX)
}

/// Arithmetic mean; `0.0` for an empty slice
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Bucket raw boundary points with the default engine.
///
/// Points are sorted by date first; the category of the first point labels
/// every bucket. Fails only for a zero window.
pub fn bucketize(points: &[DailyPoint], window_days: u32) -> ForecastResult<Vec<Bucket>> {
    let window = WindowDays::new(window_days)?;
    let series = Series::from_points(points.to_vec(), SeriesOptions::default())?;
    Ok(BucketingEngine::default().bucketize(&series, window))
}

/// View raw boundary points with the default engine
pub fn select_view(points: &[DailyPoint], mode: ViewMode) -> ForecastResult<Vec<Bucket>> {
    let series = Series::from_points(points.to_vec(), SeriesOptions::default())?;
    Ok(BucketingEngine::default().select_view(&series, mode))
}
