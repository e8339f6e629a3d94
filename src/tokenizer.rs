use serde::{Deserialize, Serialize};

use crate::phonetic::PhoneticLookup;

/// One character of input text with its phonetic reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// A single Unicode code point
    pub character: char,
    /// Reading from the phonetic lookup, empty when there is none
    pub phonetic_reading: String,
}

impl Token {
    pub fn new(character: char, phonetic_reading: impl Into<String>) -> Self {
        Self {
            character,
            phonetic_reading: phonetic_reading.into(),
        }
    }
}

/// Split `text` into one token per code point, in input order
pub fn tokenize(text: &str, lookup: &dyn PhoneticLookup) -> Vec<Token> {
    text.chars()
        .map(|character| Token::new(character, lookup.lookup(character).unwrap_or_default()))
        .collect()
}
