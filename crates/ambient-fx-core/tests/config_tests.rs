use ambient_fx_core::config::{ConfigError, FieldConfig, TypewriterConfig};

#[test]
fn test_field_config_default_values() {
    let config = FieldConfig::default();

    assert_eq!(config.intensity, 0.55);
    assert_eq!(config.max_flakes, 140);
    assert!(config.enabled);
    assert_eq!(config.pool_size(), 77);
}

#[test]
fn test_typewriter_config_default_values() {
    let config = TypewriterConfig::default();

    assert_eq!(config.typing_delay_ms, 60);
    assert_eq!(config.deleting_delay_ms, 28);
    assert_eq!(config.pause_after_typed_ms, 1200);
    assert_eq!(config.pause_after_deleted_ms, 400);
    assert!(config.show_cursor);
}

#[test]
fn test_field_config_partial_json_keeps_defaults() {
    let config = FieldConfig::from_json(r#"{ "intensity": 0.6 }"#).unwrap();

    assert_eq!(config.intensity, 0.6);
    assert_eq!(config.max_flakes, 140);
    assert!(config.enabled);

    let config = FieldConfig::from_json(r#"{ "maxFlakes": 40, "enabled": false }"#).unwrap();
    assert_eq!(config.max_flakes, 40);
    assert!(!config.enabled);
}

#[test]
fn test_typewriter_config_accepts_short_aliases() {
    let config =
        TypewriterConfig::from_json(r#"{ "typingMs": 10, "deletingMs": 5, "cursor": false }"#).unwrap();
    assert_eq!(config.typing_delay_ms, 10);
    assert_eq!(config.deleting_delay_ms, 5);
    assert!(!config.show_cursor);

    let config = TypewriterConfig::from_json(r#"{ "pauseAfterTypedMs": 900 }"#).unwrap();
    assert_eq!(config.pause_after_typed_ms, 900);
    assert_eq!(config.typing_delay_ms, 60);
}

#[test]
fn test_malformed_json_is_an_error() {
    let err = FieldConfig::from_json("{ intensity: ").unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
    assert!(err.to_string().starts_with("malformed options"));

    assert!(TypewriterConfig::from_json(r#"{ "typingMs": -1 }"#).is_err());
}

#[test]
fn test_out_of_range_values_are_accepted_and_clamped_later() {
    let config = FieldConfig::from_json(r#"{ "intensity": 4.0, "maxFlakes": -5 }"#).unwrap();
    assert_eq!(config.pool_size(), 25);
}
