/*!
 * Translation service backed by a configured provider.
 *
 * Text longer than one provider query is split into pieces, each sent as its
 * own request. Every request is bounded by the configured timeout. Requests
 * are never retried: a failure is reported to the caller as is.
 */

use async_trait::async_trait;
use log::{debug, error};
use std::time::{Duration, Instant};

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::TranslationError;
use crate::language_utils::{SOURCE_LANGUAGE, TargetLanguage};
use crate::punctuation::{is_punctuation, is_sentence_ender};
use crate::providers::Provider;
use crate::providers::mock::{MockProvider, MockRequest};
use crate::providers::mymemory::{MyMemory, MyMemoryRequest};

use super::{TranslatedText, Translator};

/// Longest query sent in one request, in bytes (the MyMemory `q` limit)
pub const MAX_QUERY_BYTES: usize = 500;

/// Split `text` into pieces of at most `max_bytes` bytes.
///
/// A piece ends after the last line break or sentence ender that fits, else
/// after the last other punctuation mark, else at the last character boundary.
/// The pieces concatenate back to `text`.
pub fn split_query(text: &str, max_bytes: usize) -> Vec<&str> {
    let max_bytes = max_bytes.max(4);
    let mut pieces = Vec::new();
    let mut rest = text;

    while rest.len() > max_bytes {
        let mut end = max_bytes;
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        let window = &rest[..end];
        let cut = last_break_after(window, |c| c == '\n' || is_sentence_ender(c))
            .or_else(|| last_break_after(window, is_punctuation))
            .unwrap_or(end);

        let (piece, tail) = rest.split_at(cut);
        pieces.push(piece);
        rest = tail;
    }

    if !rest.is_empty() {
        pieces.push(rest);
    }
    pieces
}

fn last_break_after(window: &str, is_break: impl Fn(char) -> bool) -> Option<usize> {
    window
        .char_indices()
        .rev()
        .find(|&(_, c)| is_break(c))
        .map(|(index, c)| index + c.len_utf8())
}

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// MyMemory public API
    MyMemory {
        /// Client instance
        client: MyMemory,
    },

    /// Offline mock
    Mock {
        /// Client instance
        client: MockProvider,
    },
}

/// Translator that sends each request to one provider
#[derive(Debug)]
pub struct TranslationService {
    /// The provider
    provider: TranslationProviderImpl,

    /// Upper bound for a single request
    request_timeout: Duration,
}

impl TranslationService {
    /// Create a service for the provider selected in `config`
    pub fn new(config: &TranslationConfig) -> Self {
        let provider = match config.provider {
            ConfigTranslationProvider::MyMemory => TranslationProviderImpl::MyMemory {
                client: MyMemory::new(
                    config.endpoint.clone(),
                    config.contact_email.clone(),
                    config.request_timeout(),
                ),
            },
            ConfigTranslationProvider::Mock => TranslationProviderImpl::Mock {
                client: MockProvider::working(),
            },
        };

        Self {
            provider,
            request_timeout: config.request_timeout(),
        }
    }

    /// Create a service around an existing mock provider
    pub fn with_mock(client: MockProvider, request_timeout: Duration) -> Self {
        Self {
            provider: TranslationProviderImpl::Mock { client },
            request_timeout,
        }
    }

    /// Name of the active provider
    pub fn provider_name(&self) -> &'static str {
        match &self.provider {
            TranslationProviderImpl::MyMemory { .. } => "MyMemory",
            TranslationProviderImpl::Mock { .. } => "Mock",
        }
    }

    /// Check that the provider is reachable
    pub async fn test_connection(&self) -> Result<(), TranslationError> {
        let result = match &self.provider {
            TranslationProviderImpl::MyMemory { client } => client.test_connection().await,
            TranslationProviderImpl::Mock { client } => client.test_connection().await,
        };
        result.map_err(TranslationError::from)
    }

    async fn request(
        &self,
        text: &str,
        target_language: TargetLanguage,
    ) -> Result<String, TranslationError> {
        let target = target_language.code();
        let text = match &self.provider {
            TranslationProviderImpl::MyMemory { client } => {
                let response = client
                    .complete(MyMemoryRequest::new(text, SOURCE_LANGUAGE, target))
                    .await?;
                MyMemory::extract_text(&response)
            }
            TranslationProviderImpl::Mock { client } => {
                let response = client
                    .complete(MockRequest {
                        text: text.to_string(),
                        source_language: SOURCE_LANGUAGE.to_string(),
                        target_language: target.to_string(),
                    })
                    .await?;
                MockProvider::extract_text(&response)
            }
        };
        Ok(text)
    }

    async fn request_with_timeout(
        &self,
        text: &str,
        target_language: TargetLanguage,
    ) -> Result<String, TranslationError> {
        tokio::time::timeout(self.request_timeout, self.request(text, target_language))
            .await
            .unwrap_or(Err(TranslationError::Timeout(self.request_timeout)))
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn translate(
        &self,
        text: &str,
        target_language: TargetLanguage,
    ) -> Result<TranslatedText, TranslationError> {
        if text.trim().is_empty() {
            return Ok(TranslatedText::new("", target_language));
        }

        let pieces: Vec<&str> = split_query(text, MAX_QUERY_BYTES)
            .into_iter()
            .filter(|piece| !piece.trim().is_empty())
            .collect();
        if pieces.len() > 1 {
            debug!("Splitting {} bytes of text into {} requests", text.len(), pieces.len());
        }

        let start = Instant::now();
        let mut translated = Vec::with_capacity(pieces.len());
        for piece in pieces {
            match self.request_with_timeout(piece, target_language).await {
                Ok(translation) => translated.push(translation),
                Err(e) => {
                    error!("{} translation failed: {}", self.provider_name(), e);
                    return Err(e);
                }
            }
        }

        debug!(
            "{} translated {} chars to {} in {:?}",
            self.provider_name(),
            text.chars().count(),
            target_language,
            start.elapsed()
        );
        Ok(TranslatedText::new(translated.join(" "), target_language))
    }
}
