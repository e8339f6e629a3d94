/*!
 * Tests for application configuration functionality
 */

use std::path::PathBuf;
use std::time::Duration;

use hanzi_gloss::app_config::{Config, LogLevel, TranslationProvider};
use hanzi_gloss::phonetic::ToneStyle;
use hanzi_gloss::translation::SessionConfig;

use crate::common::{create_temp_dir, create_test_file};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.translation.provider, TranslationProvider::MyMemory);
    assert_eq!(config.translation.endpoint, "https://api.mymemory.translated.net");
    assert_eq!(config.translation.request_timeout(), Duration::from_secs(30));
    assert!(config.translation.contact_email.is_none());
    assert!(config.phonetic.dictionary_path.is_none());
    assert_eq!(config.phonetic.tone_style, ToneStyle::Marks);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.translation.request_timeout_secs = 0;
    assert!(config.validate().is_err());
    config.translation.request_timeout_secs = 10;

    config.translation.contact_email = Some("nobody".to_string());
    assert!(config.validate().is_err());
    config.translation.contact_email = Some("nobody@example.com".to_string());
    assert!(config.validate().is_ok());

    config.phonetic.dictionary_path = Some(PathBuf::from("/nonexistent/readings.tsv"));
    assert!(config.validate().is_err());
    config.phonetic.dictionary_path = None;

    // The endpoint only matters for the HTTP provider
    config.translation.endpoint = "::".to_string();
    assert!(config.validate().is_err());
    config.translation.provider = TranslationProvider::Mock;
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_from_file_withInvalidJson_shouldFail() {
    let temp_dir = create_temp_dir().unwrap();
    let path = create_test_file(temp_dir.path(), "conf.json", "{ not json").unwrap();
    assert!(Config::load_from_file(&path).is_err());
    assert!(Config::load_from_file(&temp_dir.path().join("missing.json")).is_err());
}

#[test]
fn test_load_from_file_withUnknownTarget_shouldFail() {
    let temp_dir = create_temp_dir().unwrap();
    let json = r#"{"target_language": "fr"}"#;
    let path = create_test_file(temp_dir.path(), "conf.json", json).unwrap();
    assert!(Config::load_from_file(&path).is_err());
}

#[test]
fn test_session_config_fromConfig_shouldCopyTunables() {
    let mut config = Config::default();
    config.grouping.max_group_size = 5;
    config.display.progress_reset_delay_ms = 250;

    let session_config = SessionConfig::from(&config);
    assert_eq!(session_config.max_group_size, 5);
    assert_eq!(session_config.progress_reset_delay, Duration::from_millis(250));
}

#[test]
fn test_provider_display_shouldMatchSerializedName() {
    for provider in [TranslationProvider::MyMemory, TranslationProvider::Mock] {
        let json = serde_json::to_string(&provider).unwrap();
        assert_eq!(json, format!("\"{}\"", provider));
    }
    assert_eq!(TranslationProvider::MyMemory.to_string(), "mymemory");
}
