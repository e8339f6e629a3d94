/*!
 * Tests for language utilities
 */

use hanzi_gloss::TargetLanguage;
use hanzi_gloss::language_utils::{
    SOURCE_LANGUAGE, get_language_name, normalize_to_part1, supported_codes,
};

#[test]
fn test_normalize_to_part1_withPart3Codes_shouldReturnTwoLetterCode() {
    assert_eq!(normalize_to_part1("zho").unwrap(), "zh");
    assert_eq!(normalize_to_part1("SPA").unwrap(), "es");
    assert_eq!(normalize_to_part1("en").unwrap(), "en");
    assert!(normalize_to_part1("english").is_err());
}

#[test]
fn test_supported_codes_shouldListSpanishFirst() {
    assert_eq!(supported_codes(), vec!["es", "en"]);
    assert_eq!(TargetLanguage::default(), TargetLanguage::Es);
}

#[test]
fn test_source_language_shouldBeChinese() {
    assert_eq!(get_language_name(SOURCE_LANGUAGE).unwrap(), "Chinese");
}

#[test]
fn test_target_language_serde_shouldUseLowercaseCodes() {
    assert_eq!(serde_json::to_string(&TargetLanguage::En).unwrap(), "\"en\"");
    let parsed: TargetLanguage = serde_json::from_str("\"es\"").unwrap();
    assert_eq!(parsed, TargetLanguage::Es);
    assert_eq!(TargetLanguage::En.to_string(), "en");
    assert_eq!(TargetLanguage::En.name(), "English");
}

#[test]
fn test_cancelled_message_shouldDifferFromFailureMessage() {
    for language in TargetLanguage::ALL {
        assert_ne!(language.cancelled_message(), language.failure_message());
    }
}
