/*!
 * Language utilities for target language handling.
 *
 * Glosses can be produced in a fixed set of target languages. Codes are
 * accepted in ISO 639-1 (2-letter) or ISO 639-3 (3-letter) form and are
 * always emitted in 2-letter form, which is what translation providers expect.
 */

use anyhow::{Result, anyhow};
use isolang::Language;
use serde::{Deserialize, Serialize};

/// Source language of every gloss (Mandarin Chinese)
pub const SOURCE_LANGUAGE: &str = "zh";

/// Languages a gloss can be translated into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    /// Spanish
    #[default]
    Es,
    /// English
    En,
}

impl TargetLanguage {
    /// Every supported target, in display order
    pub const ALL: [TargetLanguage; 2] = [TargetLanguage::Es, TargetLanguage::En];

    /// ISO 639-1 code sent to providers
    pub fn code(&self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
        }
    }

    /// English name of the language
    pub fn name(&self) -> String {
        get_language_name(self.code()).unwrap_or_else(|_| self.code().to_string())
    }

    /// Message shown to the user when a run fails, in the target language
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Es => "No se pudo completar la traducción.",
            Self::En => "Translation could not be completed.",
        }
    }

    /// Message shown to the user when a run is cancelled, in the target language
    pub fn cancelled_message(&self) -> &'static str {
        match self {
            Self::Es => "La traducción fue cancelada.",
            Self::En => "Translation was cancelled.",
        }
    }
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for TargetLanguage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = normalize_to_part1(s)?;
        TargetLanguage::ALL
            .into_iter()
            .find(|lang| lang.code() == normalized)
            .ok_or_else(|| {
                anyhow!(
                    "Unsupported target language: {} (supported: {})",
                    s,
                    supported_codes().join(", ")
                )
            })
    }
}

/// Codes of every supported target language
pub fn supported_codes() -> Vec<&'static str> {
    TargetLanguage::ALL.iter().map(|lang| lang.code()).collect()
}

/// Normalize a 2- or 3-letter language code to ISO 639-1
pub fn normalize_to_part1(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    let language = match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => Language::from_639_3(&normalized_code),
        _ => None,
    };

    language
        .and_then(|lang| lang.to_639_1())
        .map(|part1| part1.to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part1(code)?;
    let lang = Language::from_639_1(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}
