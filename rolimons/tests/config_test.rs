//! Tests for loading and validating config.json

use rolimons::{Config, Error, TradeAd};
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;

fn valid_config() -> Value {
    json!({
        "roli_verification": "token",
        "player_id": 123456,
        "trade_ads": [
            {
                "name": "Dominus for upgrade",
                "offer_items": [1, 2],
                "request_items": [],
                "request_tags": ["upgrade"]
            }
        ],
        "min_delay": 15,
        "max_delay": 20
    })
}

fn write_config(value: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{value}").unwrap();
    file
}

#[test]
fn test_load_valid_config() {
    let file = write_config(&valid_config());
    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.verification_token, "token");
    assert_eq!(config.player_id, 123456);
    assert_eq!(config.min_delay, 15);
    assert_eq!(config.max_delay, 20);
    assert_eq!(config.failure_backoff, 2);
    assert_eq!(
        config.trade_ads,
        vec![TradeAd {
            name: "Dominus for upgrade".into(),
            offer_items: vec![1, 2],
            request_items: vec![],
            request_tags: vec!["upgrade".into()],
        }]
    );
}

#[test]
fn test_player_id_string_is_coerced() {
    let mut value = valid_config();
    value["player_id"] = json!(" 987654 ");
    let config = Config::from_json(&value.to_string()).unwrap();
    assert_eq!(config.player_id, 987654);
}

#[test]
fn test_invalid_player_id() {
    for bad in [json!("abc"), json!(1.5), json!(true), json!([1])] {
        let mut value = valid_config();
        value["player_id"] = bad.clone();
        let err = Config::from_json(&value.to_string()).unwrap_err();
        assert!(err.is_config());
        assert_eq!(err.to_string(), "player_id must be a valid integer", "input: {bad}");
    }
}

#[test]
fn test_each_missing_field_is_rejected() {
    for field in ["roli_verification", "player_id", "trade_ads", "min_delay", "max_delay"] {
        let mut value = valid_config();
        value.as_object_mut().unwrap().remove(field);

        let err = Config::from_json(&value.to_string()).unwrap_err();
        assert!(err.is_config(), "{field}: {err}");
        assert!(err.to_string().contains(field), "{field}: {err}");
    }
}

#[test]
fn test_empty_values_count_as_missing() {
    let mut value = valid_config();
    value["roli_verification"] = json!("");
    value["trade_ads"] = json!([]);
    value["min_delay"] = Value::Null;

    let err = Config::from_json(&value.to_string()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing required config fields: roli_verification, trade_ads, min_delay"
    );
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(dir.path().join("config.json")).unwrap_err();
    assert!(matches!(err, Error::ConfigRead { .. }));
    assert!(err.is_config());
}

#[test]
fn test_invalid_json() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::ConfigParse(_)));
}

#[test]
fn test_wrong_field_type() {
    let mut value = valid_config();
    value["min_delay"] = json!("fifteen");
    let err = Config::from_json(&value.to_string()).unwrap_err();
    assert!(matches!(err, Error::ConfigParse(_)));
}

#[test]
fn test_min_delay_above_max_delay() {
    let mut value = valid_config();
    value["min_delay"] = json!(30);
    let err = Config::from_json(&value.to_string()).unwrap_err();
    assert!(err.to_string().contains("must not exceed"));
}

#[test]
fn test_ad_without_offer_items() {
    let mut value = valid_config();
    value["trade_ads"][0]["offer_items"] = json!([]);
    let err = Config::from_json(&value.to_string()).unwrap_err();
    assert!(err.to_string().contains("Dominus for upgrade"));
}

#[test]
fn test_optional_request_fields_default_to_empty() {
    let mut value = valid_config();
    value["trade_ads"] = json!([{ "name": "open", "offer_items": [5] }]);
    value["failure_backoff"] = json!(3);

    let config = Config::from_json(&value.to_string()).unwrap();
    assert!(config.trade_ads[0].request_items.is_empty());
    assert!(config.trade_ads[0].request_tags.is_empty());
    assert_eq!(config.failure_backoff, 3);
}

#[test]
fn test_zero_failure_backoff_is_rejected() {
    let mut value = valid_config();
    value["failure_backoff"] = json!(0);
    assert!(Config::from_json(&value.to_string()).is_err());
}

#[test]
fn test_debug_hides_token() {
    let config = Config::from_json(&valid_config().to_string()).unwrap();
    let debug = format!("{config:?}");
    assert!(!debug.contains("\"token\""));
    assert!(debug.contains("<redacted>"));
}

#[test]
fn test_backoff_overflowing_the_wait_is_rejected() {
    let mut value = valid_config();
    value["failure_backoff"] = json!(u64::MAX / 2);
    let err = Config::from_json(&value.to_string()).unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("too large"), "{err}");

    let mut value = valid_config();
    value["max_delay"] = json!(u64::MAX / 60);
    value["failure_backoff"] = json!(1);
    assert!(Config::from_json(&value.to_string()).is_ok());

    value["failure_backoff"] = json!(2);
    assert!(Config::from_json(&value.to_string()).is_err());
}
