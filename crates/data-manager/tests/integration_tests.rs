//! Integration tests for the data manager

use algae_forecast_data::{BucketingEngine, DataManager, EngineOptions};
use algae_forecast_shared::{
    CategoryPolicy, ChartSeries, ForecastError, Locale, SeriesOptions, ViewMode, WindowDays,
};
use chrono::{Days, NaiveDate};
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Response body shaped like the prediction service's, one row per day
fn payload(start: &str, values: &[f64], algae: &str) -> String {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    let rows: Vec<serde_json::Value> = values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            serde_json::json!({
                "date": format!("{}T12:00:00.000Z", start + Days::new(i as u64)),
                "biomass": value,
                "algae": algae,
            })
        })
        .collect();

    serde_json::json!({
        "specie": algae,
        "site": "San Juan de la Costa",
        "weeks": (values.len() + 6) / 7,
        "predictions": rows,
    })
    .to_string()
}

#[test]
fn test_payload_to_weekly_chart() {
    let mut manager = DataManager::default();
    let values: Vec<f64> = (1..=10).map(f64::from).collect();

    let series = manager
        .ingest_json(&payload("2025-01-01", &values, "Hypnea sp1"))
        .unwrap();
    let buckets = manager.view(&series.id(), ViewMode::Weekly).unwrap();
    let chart = ChartSeries::from_buckets(&buckets);

    assert_eq!(chart.labels, vec!["1-7 ene 25", "8-14 ene 25"]);
    assert_eq!(chart.values, vec![4.0, 9.0]);
    assert_eq!(chart.categories, vec!["Hypnea sp1", "Hypnea sp1"]);
}

#[test]
fn test_toggling_views_reuses_derivations() {
    init_logging();
    let mut manager = DataManager::default();
    let values: Vec<f64> = (0..336).map(|i| 20.0 + f64::from(i % 5)).collect();
    let series = manager
        .ingest_json(&payload("2025-06-01", &values, "Padina spp"))
        .unwrap();

    let weekly = manager.view(&series.id(), ViewMode::Weekly).unwrap();
    let _daily = manager.view(&series.id(), ViewMode::Daily).unwrap();
    let weekly_again = manager.view(&series.id(), ViewMode::Weekly).unwrap();

    assert!(Arc::ptr_eq(&weekly, &weekly_again));
    assert_eq!(weekly.len(), 48);

    let stats = manager.get_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);
}

#[test]
fn test_daily_view_is_lossless() {
    let mut manager = DataManager::default();
    let values = [12.34, 15.0, 9.99, 11.1];
    let series = manager
        .ingest_json(&payload("2025-02-27", &values, "Codium"))
        .unwrap();

    let daily = manager.view(&series.id(), ViewMode::Daily).unwrap();
    assert_eq!(daily.len(), series.len());
    let raw: Vec<f64> = daily.iter().map(|b| b.value).collect();
    assert_eq!(raw, values.to_vec());
    assert_eq!(daily[2].label, "01 mar 2025");
}

#[test]
fn test_release_forgets_series() {
    let mut manager = DataManager::default();
    let series = manager
        .ingest_json(&payload("2025-01-01", &[1.0, 2.0], "Ceramium"))
        .unwrap();
    let id = series.id();

    assert_eq!(manager.active_count(), 1);
    assert!(manager.release(&id).is_some());
    assert_eq!(manager.active_count(), 0);

    match manager.view(&id, ViewMode::Weekly) {
        Err(ForecastError::SeriesNotFound { id: missing }) => assert_eq!(missing, id.to_string()),
        other => panic!("expected SeriesNotFound, got {:?}", other),
    }
}

#[test]
fn test_strict_categories_reject_concatenated_species() {
    init_logging();
    let options = SeriesOptions {
        categories: CategoryPolicy::Strict,
        ..Default::default()
    };
    let mut manager = DataManager::new(BucketingEngine::default(), options);

    let json = r#"[
        {"date": "2025-01-01", "biomass": 1.0, "algae": "Ulva foliosa"},
        {"date": "2025-01-02", "biomass": 2.0, "algae": "Ulva filamentosa"}
    ]"#;

    assert!(matches!(
        manager.ingest_json(json),
        Err(ForecastError::MixedCategories { .. })
    ));
    assert_eq!(manager.active_count(), 0);
}

#[test]
fn test_english_monthly_view() {
    let engine = BucketingEngine::new(EngineOptions {
        locale: Locale::EnUs,
        ..Default::default()
    });
    let mut manager = DataManager::new(engine, SeriesOptions::default());
    let values = vec![2.0; 60];
    let series = manager
        .ingest_json(&payload("2025-01-01", &values, "Gelidium"))
        .unwrap();

    let monthly = manager.view(&series.id(), ViewMode::Monthly).unwrap();
    let labels: Vec<&str> = monthly.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["1-Jan 30, 25", "31-Mar 1, 25"]);
    assert_eq!(
        manager.engine().window_for(ViewMode::Monthly),
        Some(WindowDays::MONTH)
    );
}
