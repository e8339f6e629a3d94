/*!
 * Tests for the path from a config file to a finished gloss
 */

use std::sync::Arc;

use hanzi_gloss::app_config::{Config, TranslationProvider};
use hanzi_gloss::phonetic::{DictionaryLookup, ToneStyle};
use hanzi_gloss::render::{OutputFormat, render};
use hanzi_gloss::translation::{GlossSession, RunState, SessionConfig, TranslationService};
use hanzi_gloss::TargetLanguage;

use crate::common::{create_temp_dir, create_test_file};

#[tokio::test]
async fn test_gloss_fromConfigFile_shouldUseConfiguredSettings() {
    let temp_dir = create_temp_dir().unwrap();
    let dictionary = create_test_file(temp_dir.path(), "extra.tsv", "你\tnǐ\n龙\tlóng\n").unwrap();
    let config_json = format!(
        r#"{{
            "target_language": "en",
            "grouping": {{ "max_group_size": 2 }},
            "phonetic": {{ "dictionary_path": {:?}, "tone_style": "numbers" }},
            "translation": {{ "provider": "mock" }},
            "display": {{ "progress_reset_delay_ms": 60000 }}
        }}"#,
        dictionary.to_string_lossy()
    );
    let config_path = create_test_file(temp_dir.path(), "conf.json", &config_json).unwrap();

    let config = Config::load_from_file(&config_path).unwrap();
    config.validate().unwrap();
    assert_eq!(config.translation.provider, TranslationProvider::Mock);

    let mut lookup = DictionaryLookup::embedded();
    if let Some(path) = &config.phonetic.dictionary_path {
        lookup.extend_with(DictionaryLookup::from_file(path).unwrap());
    }
    let lookup = lookup.with_tone_style(config.phonetic.tone_style);

    let session = GlossSession::new(
        Arc::new(TranslationService::new(&config.translation)),
        Arc::new(lookup),
        SessionConfig::from(&config),
    );
    session.set_target_language(config.target_language);
    session.set_input_text("龙你好");

    session.run_orchestration().await.unwrap();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, RunState::Succeeded);
    assert_eq!(snapshot.target_language, TargetLanguage::En);
    assert_eq!(snapshot.groups.len(), 2);
    assert_eq!(snapshot.groups[0].reading(), "long2 ni3");
    assert_eq!(snapshot.groups[1].reading(), "hao3");
    assert_eq!(snapshot.main_translation.as_deref(), Some("[en] 龙你好"));

    let text = render(&snapshot, OutputFormat::Text).unwrap();
    assert!(text.starts_with("English: [en] 龙你好\n"));
    assert!(text.contains("  long2 ni3\n  龙你\n  = [en] 龙你\n"));
}

#[test]
fn test_default_config_shouldRoundTripThroughFile() {
    let temp_dir = create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.phonetic.tone_style = ToneStyle::None;
    config.translation.contact_email = Some("reader@example.com".to_string());
    config.save_to_file(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.phonetic.tone_style, ToneStyle::None);
    assert_eq!(loaded.translation.contact_email.as_deref(), Some("reader@example.com"));
    assert_eq!(loaded.grouping.max_group_size, config.grouping.max_group_size);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_service_fromMockConfig_shouldPassConnectionTest() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Mock;

    let service = TranslationService::new(&config.translation);
    assert_eq!(service.provider_name(), "Mock");
    assert!(tokio_test::block_on(service.test_connection()).is_ok());
}
