/*!
 * # hanzi-gloss - Interlinear glosses for Chinese text
 *
 * A Rust library for rendering Chinese text as an interlinear gloss.
 *
 * ## Features
 *
 * - Per-character pinyin readings from a built-in table or a user-supplied dictionary
 * - Grouping of characters into short, punctuation-aware phrase groups
 * - Whole-text and per-group translation through a pluggable provider:
 *   - MyMemory public translation API
 *   - Offline mock provider
 * - Monotonic progress reporting and a run lifecycle observable through a
 *   watch channel
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `tokenizer`: one annotated token per character
 * - `grouping`: phrase grouping of tokens
 * - `punctuation`: character classes used by grouping and translation
 * - `phonetic`: reading lookup and tone styles
 * - `translation`: translator trait and its users:
 *   - `translation::service`: provider-backed translator with timeouts
 *   - `translation::orchestrator`: `GlossSession` run lifecycle
 * - `providers`: client implementations for translation providers:
 *   - `providers::mymemory`: MyMemory API client
 *   - `providers::mock`: scripted offline provider
 * - `render`: text and JSON output
 * - `app_config`: configuration management
 * - `language_utils`: supported target languages
 * - `errors`: custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod grouping;
pub mod language_utils;
pub mod phonetic;
pub mod providers;
pub mod punctuation;
pub mod render;
pub mod tokenizer;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{OrchestrationError, ProviderError, TranslationError};
pub use grouping::{PhraseGroup, annotate, group_tokens};
pub use language_utils::TargetLanguage;
pub use phonetic::{DictionaryLookup, PhoneticLookup};
pub use tokenizer::{Token, tokenize};
pub use translation::{GlossSession, GlossSnapshot, TranslationService, Translator};
