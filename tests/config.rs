use std::time::Duration;

use gatherwait::{Config, Error, config::DEFAULT_MAX_DELAY};

#[test]
fn defaults_match_classic_timing() {
    let config = Config::default();
    assert_eq!(config.time_unit, Duration::from_secs(1));
    assert_eq!(config.tick, Duration::from_secs(1));
    assert_eq!(config.values_per_drain, 10);
    assert_eq!(config.drains, 4);
    assert_eq!(config.value_bound, 10.0);
    assert_eq!(DEFAULT_MAX_DELAY, 10.0);
}

#[test]
fn from_json_fills_missing_fields_with_defaults() {
    let config = Config::from_json(r#"{"time_unit_ms": 5, "drains": 2}"#).unwrap();
    assert_eq!(
        config,
        Config::default()
            .with_time_unit(Duration::from_millis(5))
            .with_drains(2),
        "Only the provided fields should change"
    );
}

#[test]
fn config_serializes_durations_as_millis() {
    let config = Config::default().with_tick(Duration::from_millis(250));
    let json = serde_json::to_value(config).unwrap();
    assert_eq!(json["tick_ms"], 250);
    assert_eq!(json["time_unit_ms"], 1000);
}

#[test]
fn from_json_rejects_malformed_documents() {
    let err = Config::from_json(r#"{"tick_ms": "soon"}"#).unwrap_err();
    assert!(matches!(err, Error::Config(_)), "Expected a configuration error, got {err}");
}
