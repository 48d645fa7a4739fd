//! Tests for parser settings persistence
//!
//! Tests cover:
//! - Default settings values
//! - Serialization/deserialization
//! - Save and load through a file

#[path = "../common/mod.rs"]
mod common;

use drivelog::settings::ParserSettings;

// ============================================
// Default Settings Tests
// ============================================

#[test]
fn test_settings_default_values() {
    let settings = ParserSettings::default();
    assert_eq!(settings.version, 1);
    assert_eq!(settings.active_set_window, 6.0);
    assert_eq!(settings.technology_sample_size, 50);
    assert_eq!(settings.level_ceiling, 0.0);
}

// ============================================
// Serialization Tests
// ============================================

#[test]
fn test_settings_serialize_pretty() {
    let json = serde_json::to_string_pretty(&ParserSettings::default()).unwrap();
    assert!(json.contains('\n'));
    assert!(json.contains("active_set_window"));
    assert!(json.contains("level_ceiling"));
}

#[test]
fn test_settings_empty_object_is_default() {
    let settings: ParserSettings = serde_json::from_str("{}").unwrap();
    assert_eq!(settings, ParserSettings::default());
}

#[test]
fn test_settings_unknown_fields_ignored() {
    let settings: ParserSettings =
        serde_json::from_str(r#"{"version": 2, "theme": "dark"}"#).unwrap();
    assert_eq!(settings.version, 2);
}

// ============================================
// File Roundtrip Tests
// ============================================

#[test]
fn test_settings_save_and_load() {
    let path = common::write_temp_log("settings-roundtrip.json", b"");
    let settings = ParserSettings {
        active_set_window: 4.5,
        technology_sample_size: 10,
        ..Default::default()
    };
    settings.save_to(&path).unwrap();
    assert_eq!(ParserSettings::load_from(&path), settings);
}

#[test]
fn test_settings_malformed_file_yields_default() {
    let path = common::write_temp_log("settings-malformed.json", b"{ not json");
    assert_eq!(ParserSettings::load_from(&path), ParserSettings::default());
}

#[test]
fn test_settings_path_ends_with_file_name() {
    if let Some(path) = ParserSettings::get_settings_path() {
        assert!(path.ends_with("settings.json"));
    }
}
