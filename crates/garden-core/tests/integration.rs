//! Integration tests exercising the engine the way the service layer does:
//! config from TOML → sample → assess → classify / predict.

use approx::assert_abs_diff_eq;
use chrono::{Duration, TimeZone, Utc};
use garden_core::{
    DEFAULT_PREDICTION_THRESHOLD, DecayConfig, GrowthStage, HealthSample, Status, Thresholds, Tier,
    assess, calculate_health, classify_status, days_until_threshold, default_decay_rate,
    parse_timestamp, round_score,
};

#[derive(serde::Deserialize)]
struct File {
    #[serde(default)]
    decay: DecayConfig,
}

#[test]
fn half_life_at_thirty_days() {
    let rate = std::f64::consts::LN_2 / 30.0;
    let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
    let health = calculate_health(now - Duration::days(30), rate, now, 1.0);
    assert_abs_diff_eq!(health, 0.5, epsilon = 0.05);

    let fern = DecayConfig::default().rates.fern;
    let health = calculate_health(now - Duration::days(30), fern, now, 1.0);
    assert!(health > 0.45 && health < 0.55);
}

#[test]
fn default_threshold_classification() {
    let t = Thresholds::default();
    assert_eq!(classify_status(0.7, &t), Status::Thriving);
    assert_eq!(classify_status(0.4, &t), Status::Cooling);
}

#[test]
fn fern_prediction_is_about_thirty_days() {
    let days = days_until_threshold(1.0, 0.0231, DEFAULT_PREDICTION_THRESHOLD).unwrap();
    assert_abs_diff_eq!(days, 30.0, epsilon = 2.0);
}

#[test]
fn unknown_tier_uses_configured_fern_rate() {
    let cfg = DecayConfig::default();
    assert_eq!(cfg.default_decay_rate("unknown_tier"), cfg.rates.fern);
    assert_eq!(
        default_decay_rate("unknown_tier", &cfg.rates),
        cfg.rates.rate(Tier::Fern)
    );
}

#[test]
fn naive_timestamp_from_storage_is_utc() {
    let now = Utc.with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap();
    let naive = parse_timestamp("2024-01-01T00:00:00").unwrap();
    let offset = parse_timestamp("2024-01-01T00:00:00+00:00").unwrap();
    assert_eq!(naive, offset);
    let health = calculate_health(naive, 0.05, now, 1.0);
    assert_abs_diff_eq!(health, (-0.5f64).exp(), epsilon = 1e-12);
}

#[test]
fn config_from_toml_partial_overrides() {
    let file: File = toml::from_str(
        r#"
        [decay.rates]
        orchid = 0.07

        [decay.thresholds]
        healthy = 0.8
        "#,
    )
    .unwrap();
    let cfg = file.decay;
    assert_eq!(cfg.rates.orchid, 0.07);
    assert_eq!(cfg.rates.fern, 0.0231);
    assert_eq!(cfg.thresholds.healthy, 0.8);
    assert_eq!(cfg.thresholds.cooling, 0.4);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.classify(0.75), Status::Cooling);
}

#[test]
fn config_from_empty_toml_is_default() {
    let file: File = toml::from_str("").unwrap();
    assert_eq!(file.decay, DecayConfig::default());
}

#[test]
fn invalid_thresholds_in_toml_fail_validation() {
    let file: File = toml::from_str(
        r#"
        [decay.thresholds]
        healthy = 0.2
        cooling = 0.4
        "#,
    )
    .unwrap();
    assert!(file.decay.validate().is_err());
}

#[test]
fn a_neglected_garden() {
    let cfg = DecayConfig::default();
    let now = Utc.with_ymd_and_hms(2026, 10, 17, 0, 0, 0).unwrap();

    let cases = [
        (Tier::Orchid, 0, Status::Thriving),
        (Tier::Orchid, 14, Status::Cooling),
        (Tier::Orchid, 30, Status::AtRisk),
        (Tier::Orchid, 60, Status::Dormant),
        (Tier::Succulent, 30, Status::Thriving),
        (Tier::Succulent, 90, Status::Cooling),
        (Tier::Bonsai, 100, Status::AtRisk),
    ];

    for (tier, days, expected) in cases {
        let sample = HealthSample::new(now - Duration::days(days), cfg.rates.rate(tier), now);
        let a = assess(&sample, &cfg);
        assert_eq!(a.status, expected, "{tier} after {days} days: {}", a.health_score);
        if a.status == Status::Thriving || a.status == Status::Cooling {
            assert!(a.days_until_cooling.is_some() || a.health_score <= cfg.thresholds.cooling);
        } else {
            assert!(a.days_until_cooling.is_none());
        }
    }
}

#[test]
fn rounding_and_growth_helpers() {
    assert_eq!(round_score(0.499_96), 0.5);
    assert_eq!(GrowthStage::from_interactions(12), GrowthStage::Sapling);
}
