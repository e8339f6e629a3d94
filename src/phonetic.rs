/*!
 * Phonetic reading lookup.
 *
 * The pipeline only needs a deterministic `character -> reading` function.
 * `DictionaryLookup` provides one backed by a character table: the pinyin
 * data of the `pinyin` crate, optionally extended by a user dictionary file.
 */

use anyhow::{Context, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use pinyin::ToPinyin;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Blocks covered by the built-in table: Extension A and the Unified Ideographs
const EMBEDDED_BLOCKS: [std::ops::RangeInclusive<char>; 2] =
    ['\u{3400}'..='\u{4DBF}', '\u{4E00}'..='\u{9FFF}'];

static EMBEDDED: Lazy<DictionaryLookup> = Lazy::new(|| {
    let readings: HashMap<char, String> = EMBEDDED_BLOCKS
        .iter()
        .flat_map(|block| block.clone())
        .filter_map(|c| c.to_pinyin().map(|reading| (c, reading.with_tone().to_string())))
        .collect();
    debug!("Built-in table holds {} readings", readings.len());
    DictionaryLookup { readings }
});

/// Maps a single character to its phonetic reading.
///
/// Implementations must be deterministic and free of side effects.
pub trait PhoneticLookup: Send + Sync {
    /// Reading for `character`, or `None` when the character has none
    fn lookup(&self, character: char) -> Option<&str>;
}

impl PhoneticLookup for HashMap<char, String> {
    fn lookup(&self, character: char) -> Option<&str> {
        self.get(&character).map(String::as_str)
    }
}

/// How tones are written in readings
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToneStyle {
    /// Diacritics on the vowel (`hǎo`)
    #[default]
    Marks,
    /// Trailing tone digit (`hao3`); neutral tone has no digit
    Numbers,
    /// No tone information (`hao`)
    None,
}

impl std::str::FromStr for ToneStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "marks" => Ok(Self::Marks),
            "numbers" => Ok(Self::Numbers),
            "none" => Ok(Self::None),
            _ => Err(anyhow::anyhow!("Invalid tone style: {}", s)),
        }
    }
}

/// Split a tone-marked vowel into its base letter and tone number
fn strip_tone_mark(c: char) -> Option<(char, u8)> {
    let split = match c {
        'ā' => ('a', 1), 'á' => ('a', 2), 'ǎ' => ('a', 3), 'à' => ('a', 4),
        'ē' => ('e', 1), 'é' => ('e', 2), 'ě' => ('e', 3), 'è' => ('e', 4),
        'ī' => ('i', 1), 'í' => ('i', 2), 'ǐ' => ('i', 3), 'ì' => ('i', 4),
        'ō' => ('o', 1), 'ó' => ('o', 2), 'ǒ' => ('o', 3), 'ò' => ('o', 4),
        'ū' => ('u', 1), 'ú' => ('u', 2), 'ǔ' => ('u', 3), 'ù' => ('u', 4),
        'ǖ' => ('ü', 1), 'ǘ' => ('ü', 2), 'ǚ' => ('ü', 3), 'ǜ' => ('ü', 4),
        'ń' => ('n', 2), 'ň' => ('n', 3), 'ǹ' => ('n', 4),
        'ḿ' => ('m', 2), 'ế' => ('ê', 2), 'ề' => ('ê', 4),
        _ => return None,
    };
    Some(split)
}

/// Tone of a combining mark, as in `m̀` or `ê̄`
fn combining_tone(c: char) -> Option<u8> {
    match c {
        '\u{0304}' => Some(1),
        '\u{0301}' => Some(2),
        '\u{030C}' => Some(3),
        '\u{0300}' => Some(4),
        _ => None,
    }
}

/// Rewrite a tone-marked reading in the requested style
pub fn convert_reading(reading: &str, style: ToneStyle) -> String {
    if style == ToneStyle::Marks {
        return reading.to_string();
    }

    let mut tone = None;
    let mut plain: String = reading
        .chars()
        .filter_map(|c| match (strip_tone_mark(c), combining_tone(c)) {
            (Some((base, number)), _) => {
                tone = Some(number);
                Some(base)
            }
            (None, Some(number)) => {
                tone = Some(number);
                None
            }
            (None, None) => Some(c),
        })
        .collect();

    if style == ToneStyle::Numbers {
        if let Some(number) = tone {
            plain.push(char::from(b'0' + number));
        }
    }
    plain
}

/// Reading table keyed by character
#[derive(Debug, Clone, Default)]
pub struct DictionaryLookup {
    readings: HashMap<char, String>,
}

impl DictionaryLookup {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in table with a reading for every ideograph in the CJK
    /// Unified Ideographs block and Extension A
    pub fn embedded() -> Self {
        EMBEDDED.clone()
    }

    /// Parse `character<TAB>reading` lines.
    ///
    /// Blank lines and `#` comments are ignored. Malformed lines are skipped
    /// with a warning. When a character appears twice the first reading wins.
    pub fn parse(source: &str) -> Self {
        let mut readings = HashMap::new();

        for (index, line) in source.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let key = fields.next().unwrap_or_default();
            let reading = fields.next();

            let mut key_chars = key.chars();
            match (key_chars.next(), key_chars.next(), reading) {
                (Some(character), None, Some(reading)) => {
                    readings.entry(character).or_insert_with(|| reading.to_string());
                }
                _ => warn!("Skipping malformed dictionary line {}: {:?}", index + 1, line),
            }
        }

        Self { readings }
    }

    /// Load a dictionary file in the same format as [`DictionaryLookup::parse`]
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dictionary file: {:?}", path))?;
        let dictionary = Self::parse(&content);
        debug!("Loaded {} readings from {:?}", dictionary.len(), path);
        Ok(dictionary)
    }

    /// Add the entries of `other`, replacing readings this table already has
    pub fn extend_with(&mut self, other: DictionaryLookup) {
        self.readings.extend(other.readings);
    }

    /// Rewrite every reading in the requested tone style
    pub fn with_tone_style(mut self, style: ToneStyle) -> Self {
        if style != ToneStyle::Marks {
            for reading in self.readings.values_mut() {
                *reading = convert_reading(reading, style);
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl PhoneticLookup for DictionaryLookup {
    fn lookup(&self, character: char) -> Option<&str> {
        self.readings.get(&character).map(String::as_str)
    }
}
