/*!
 * Application configuration.
 *
 * Loading, validating and saving the JSON settings file.
 */

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::grouping::DEFAULT_MAX_GROUP_SIZE;
use crate::language_utils::TargetLanguage;
use crate::phonetic::ToneStyle;

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Language the gloss is translated into
    #[serde(default)]
    pub target_language: TargetLanguage,

    /// Phrase grouping config
    #[serde(default)]
    pub grouping: GroupingConfig,

    /// Phonetic reading config
    #[serde(default)]
    pub phonetic: PhoneticConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Progress display config
    #[serde(default)]
    pub display: DisplayConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: MyMemory public translation memory
    #[default]
    MyMemory,
    // @provider: Offline echo provider
    Mock,
}

impl TranslationProvider {
    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::MyMemory => "mymemory".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mymemory" => Ok(Self::MyMemory),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Phrase grouping configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GroupingConfig {
    /// Soft upper bound on tokens per phrase group
    #[serde(default = "default_max_group_size")]
    pub max_group_size: usize,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            max_group_size: default_max_group_size(),
        }
    }
}

/// Phonetic reading configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PhoneticConfig {
    /// Extra `character<TAB>reading` file merged over the built-in table
    #[serde(default)]
    pub dictionary_path: Option<PathBuf>,

    /// How tones are written
    #[serde(default)]
    pub tone_style: ToneStyle,
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Provider used for every request
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Service URL
    #[serde(default = "default_mymemory_endpoint")]
    pub endpoint: String,

    /// Contact address sent to MyMemory for a larger daily quota
    #[serde(default)]
    pub contact_email: Option<String>,

    /// Timeout for a single translation request
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            endpoint: default_mymemory_endpoint(),
            contact_email: None,
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl TranslationConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Progress display configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DisplayConfig {
    /// How long a finished run keeps its progress visible
    #[serde(default = "default_progress_reset_delay_ms")]
    pub progress_reset_delay_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            progress_reset_delay_ms: default_progress_reset_delay_ms(),
        }
    }
}

impl DisplayConfig {
    pub fn progress_reset_delay(&self) -> Duration {
        Duration::from_millis(self.progress_reset_delay_ms)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_max_group_size() -> usize {
    DEFAULT_MAX_GROUP_SIZE
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_progress_reset_delay_ms() -> u64 {
    1000
}

fn default_mymemory_endpoint() -> String {
    "https://api.mymemory.translated.net".to_string()
}

impl Config {
    /// Read a configuration file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Write this configuration as pretty-printed JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let config_json =
            serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.grouping.max_group_size == 0 {
            return Err(anyhow!("grouping.max_group_size must be at least 1"));
        }

        if self.translation.request_timeout_secs == 0 {
            return Err(anyhow!("translation.request_timeout_secs must be at least 1"));
        }

        if self.translation.provider == TranslationProvider::MyMemory {
            let endpoint = &self.translation.endpoint;
            url::Url::parse(endpoint)
                .with_context(|| format!("Invalid translation endpoint: {}", endpoint))?;
        }

        if let Some(email) = &self.translation.contact_email {
            if !email.contains('@') {
                return Err(anyhow!("Invalid contact email: {}", email));
            }
        }

        if let Some(path) = &self.phonetic.dictionary_path {
            if !path.is_file() {
                return Err(anyhow!("Dictionary file does not exist: {:?}", path));
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: TargetLanguage::default(),
            grouping: GroupingConfig::default(),
            phonetic: PhoneticConfig::default(),
            translation: TranslationConfig::default(),
            display: DisplayConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
