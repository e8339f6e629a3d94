/*!
 * Translation of glosses.
 *
 * This module contains the translator abstraction and its users:
 *
 * - `service`: `TranslationService`, a `Translator` backed by a configured provider
 * - `orchestrator`: `GlossSession`, which drives tokenizing, grouping and
 *   translation of one input text and publishes its progress
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::TranslationError;
use crate::language_utils::{SOURCE_LANGUAGE, TargetLanguage};

// Re-export main types for easier usage
pub use self::orchestrator::{
    GlossSession, GlossSnapshot, RunOutcome, RunState, SessionConfig, progress,
};
pub use self::service::TranslationService;

// Submodules
pub mod orchestrator;
pub mod service;

/// Result of one translation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedText {
    /// Translated text
    pub text: String,
    /// Language of the input
    pub source_language: String,
    /// Language of `text`
    pub target_language: TargetLanguage,
}

impl TranslatedText {
    pub fn new(text: impl Into<String>, target_language: TargetLanguage) -> Self {
        Self {
            text: text.into(),
            source_language: SOURCE_LANGUAGE.to_string(),
            target_language,
        }
    }
}

/// Translates Chinese text into a target language
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text`, failing when the request cannot be completed
    async fn translate(
        &self,
        text: &str,
        target_language: TargetLanguage,
    ) -> Result<TranslatedText, TranslationError>;
}

#[async_trait]
impl<T: Translator + ?Sized> Translator for Arc<T> {
    async fn translate(
        &self,
        text: &str,
        target_language: TargetLanguage,
    ) -> Result<TranslatedText, TranslationError> {
        (**self).translate(text, target_language).await
    }
}
