//! Integration tests for the CLI commands
//!
//! Commands run against JSON files written to a temporary directory.

use chrono::{Duration, TimeZone, Utc};
use foresight_cli::cli::{BenchmarkArgs, ForecastArgs, RiskArgs, TrendArgs};
use foresight_cli::commands::{benchmark, forecast, risk, trend};
use foresight_cli::{CliError, Formatter, OutputFormat};
use foresight_domain::{RiskFactor, RiskLevel, SupplierMetric, TimeSeriesPoint, TrendDirection};
use foresight_engine::{EngineConfig, ErrorKind};
use foresight_forecast::ModelParameters;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_history(dir: &Path, days: usize) -> PathBuf {
    let start = Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap();
    let pattern = [120.0, 110.0, 105.0, 115.0, 150.0, 190.0, 170.0];
    let points: Vec<TimeSeriesPoint> = (0..days)
        .map(|i| {
            TimeSeriesPoint::new(
                "SKU-1",
                start + Duration::days(i as i64),
                pattern[i % 7] + 2.0 * i as f64,
            )
        })
        .collect();
    let path = dir.join("history.json");
    fs::write(&path, serde_json::to_string(&points).unwrap()).unwrap();
    path
}

fn forecast_args(history: PathBuf, horizon: usize) -> ForecastArgs {
    ForecastArgs {
        entity_id: "SKU-1".to_string(),
        history,
        horizon,
        confidence: None,
        no_uncertainty: false,
        holidays: None,
        models: None,
    }
}

#[tokio::test]
async fn test_forecast_from_file() {
    let dir = TempDir::new().unwrap();
    let history = write_history(dir.path(), 30);

    let result = forecast::forecast(forecast_args(history, 7), &EngineConfig::default())
        .await
        .unwrap();

    assert_eq!(result.horizon_points.len(), 7);
    assert!(result.horizon_points.iter().all(|p| p.lower_bound.is_some()));

    let table = Formatter::new(OutputFormat::Table, false)
        .format_forecast(&result)
        .unwrap();
    assert!(table.contains("Estimate"));
    assert!(table.contains("Total forecasted demand"));
}

#[tokio::test]
async fn test_forecast_with_holidays_and_models() {
    let dir = TempDir::new().unwrap();
    let history = write_history(dir.path(), 40);
    let holidays = dir.path().join("holidays.json");
    fs::write(&holidays, r#"["2025-04-14"]"#).unwrap();
    let models = dir.path().join("models.json");
    let params = ModelParameters {
        version: "cli-test".to_string(),
        ..ModelParameters::default()
    };
    fs::write(&models, params.to_json().unwrap()).unwrap();

    let args = ForecastArgs {
        holidays: Some(holidays),
        models: Some(models),
        confidence: Some(0.8),
        ..forecast_args(history, 3)
    };
    let result = forecast::forecast(args, &EngineConfig::default()).await.unwrap();

    assert_eq!(result.model_version, "cli-test");
    assert_eq!(result.confidence_level, 0.8);
}

#[tokio::test]
async fn test_forecast_unknown_entity() {
    let dir = TempDir::new().unwrap();
    let history = write_history(dir.path(), 30);
    let args = ForecastArgs {
        entity_id: "SKU-404".to_string(),
        ..forecast_args(history, 7)
    };

    let err = forecast::forecast(args, &EngineConfig::default()).await.unwrap_err();
    match err {
        CliError::Engine(e) => assert_eq!(e.kind(), ErrorKind::NotFound),
        other => panic!("Expected engine error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_forecast_missing_history_file() {
    let dir = TempDir::new().unwrap();
    let args = forecast_args(dir.path().join("missing.json"), 7);

    let err = forecast::forecast(args, &EngineConfig::default()).await.unwrap_err();
    assert!(err.to_string().contains("missing.json"));
}

#[tokio::test]
async fn test_trend_from_file() {
    let dir = TempDir::new().unwrap();
    let args = TrendArgs {
        entity_id: "SKU-1".to_string(),
        history: write_history(dir.path(), 30),
        forecast: None,
    };

    let analysis = trend::trend(args, &EngineConfig::default()).await.unwrap();
    assert_eq!(analysis.direction, TrendDirection::Up);
    assert_eq!(analysis.points, 30);
    assert!(!analysis.insights.is_empty());
    assert!(analysis.forecast.is_none());
}

#[tokio::test]
async fn test_trend_with_forecast_from_file() {
    let dir = TempDir::new().unwrap();
    let args = TrendArgs {
        entity_id: "SKU-1".to_string(),
        history: write_history(dir.path(), 30),
        forecast: Some(10),
    };

    let analysis = trend::trend(args, &EngineConfig::default()).await.unwrap();
    assert_eq!(analysis.forecast.as_ref().unwrap().horizon_points.len(), 10);

    let table = Formatter::new(OutputFormat::Table, false)
        .format_trend(&analysis)
        .unwrap();
    assert!(table.contains("Direction: up"));
    assert!(table.contains("Total forecasted demand"));
}

#[tokio::test]
async fn test_risk_inline_factors() {
    let args = RiskArgs {
        scope: "supplier:ACME".to_string(),
        factors: vec![
            RiskFactor::new("geopolitical", 80.0, 0.4),
            RiskFactor::new("financial", 20.0, 0.3),
            RiskFactor::new("operational", 50.0, 0.3),
        ],
        file: None,
        days: 30,
    };

    let assessment = risk::assess(args, &EngineConfig::default()).await.unwrap();
    assert_eq!(assessment.risk_level, RiskLevel::High);
    assert_eq!(assessment.top_risks[0].name, "geopolitical");
}

#[tokio::test]
async fn test_risk_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("risk.json");
    fs::write(
        &path,
        r#"{
            "scope": "region:EU",
            "risk_factors": [
                {"name": "financial", "raw_value": 2.0, "normalized_score": 10.0, "weight": 1.0}
            ]
        }"#,
    )
    .unwrap();
    let args = RiskArgs {
        scope: "ignored".to_string(),
        factors: Vec::new(),
        file: Some(path),
        days: 5,
    };

    let assessment = risk::assess(args, &EngineConfig::default()).await.unwrap();
    assert_eq!(assessment.scope, "region:EU");
    assert_eq!(assessment.time_horizon_days, 30);
    assert_eq!(assessment.risk_level, RiskLevel::Low);
}

#[tokio::test]
async fn test_benchmark_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("metrics.json");
    let metrics = vec![
        SupplierMetric::new("ACME", "on_time_rate", 0.98),
        SupplierMetric::new("ACME", "defects_rate", 0.01),
        SupplierMetric::new("Globex", "on_time_rate", 0.90),
        SupplierMetric::new("Globex", "defects_rate", 0.05),
    ];
    fs::write(&path, serde_json::to_string(&metrics).unwrap()).unwrap();

    let args = BenchmarkArgs {
        metrics: path,
        suppliers: Vec::new(),
    };
    let scores = benchmark::benchmark(args, &EngineConfig::default()).await.unwrap();

    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0].supplier_id, "ACME");
    assert_eq!(scores[0].composite_score, 100.0);

    let json = Formatter::new(OutputFormat::Json, false)
        .format_scores(&scores)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[1]["supplier_id"], "Globex");
}
