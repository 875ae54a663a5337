//! Integration tests for foresight-risk

use chrono::{TimeZone, Utc};
use foresight_domain::{RiskFactor, RiskLevel};
use foresight_risk::{RiskConfig, RiskError, RiskScorer};

#[test]
fn test_raw_signals_to_assessment() {
    // days of inventory cover: more cover means less risk, so the range is flipped
    let factors = vec![
        RiskFactor::from_raw("inventory_cover", 3.0, 30.0, 0.0, 0.5),
        RiskFactor::from_raw("lead_time_days", 45.0, 0.0, 60.0, 0.3),
        RiskFactor::from_raw("supplier_concentration", 0.9, 0.0, 1.0, 0.2),
    ];
    let assessed_at = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();

    let assessment = RiskScorer::default()
        .assess("region:EMEA", factors, 90, assessed_at)
        .unwrap();

    // 0.5*90 + 0.3*75 + 0.2*90 = 85.5
    assert!((assessment.composite_score - 85.5).abs() < 1e-9);
    assert_eq!(assessment.risk_level, RiskLevel::Critical);
    assert_eq!(assessment.top_risks[0].name, "inventory_cover");
    assert_eq!((assessment.expires_at - assessment.assessed_at).num_days(), 90);
}

#[test]
fn test_every_level_is_reachable() {
    let scorer = RiskScorer::default();
    let expected = [
        (10.0, RiskLevel::Low),
        (30.0, RiskLevel::Medium),
        (60.0, RiskLevel::High),
        (90.0, RiskLevel::Critical),
    ];
    for (score, level) in expected {
        let result = scorer.score(&[RiskFactor::new("single", score, 1.0)]).unwrap();
        assert_eq!(result.risk_level, level);
    }
}

#[test]
fn test_assessment_serializes_lowercase_level() {
    let assessment = RiskScorer::default()
        .assess(
            "global",
            vec![RiskFactor::new("financial", 20.0, 1.0)],
            7,
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        )
        .unwrap();
    let json = serde_json::to_value(&assessment).unwrap();
    assert_eq!(json["risk_level"], "low");
}

#[test]
fn test_invalid_config_rejected() {
    let config = RiskConfig {
        critical_threshold: 150.0,
        ..RiskConfig::default()
    };
    assert!(matches!(RiskScorer::new(config), Err(RiskError::Config(_))));
}
