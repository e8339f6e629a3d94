/*!
 * Phrase grouping.
 *
 * Tokens are clustered into short phrase groups for display and translation.
 * Groups close at sentence boundaries, at the size limit (unless punctuation
 * follows, which stays attached), and at non-opening punctuation once the
 * group holds at least `MIN_PUNCTUATED_GROUP` tokens. A trailing run without
 * ideographs is folded into the previous group.
 */

use serde::{Deserialize, Serialize};

use crate::phonetic::PhoneticLookup;
use crate::punctuation::{
    is_cjk_ideograph, is_droppable_whitespace, is_opening_mark, is_punctuation, is_sentence_ender,
};
use crate::tokenizer::{Token, tokenize};

/// Group size used when none is configured
pub const DEFAULT_MAX_GROUP_SIZE: usize = 8;

/// Smallest group a non-terminal punctuation mark may close
const MIN_PUNCTUATED_GROUP: usize = 4;

/// A contiguous run of tokens displayed and translated as one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseGroup {
    /// Tokens in input order, never empty
    pub tokens: Vec<Token>,
    /// Translation of the group text, if one was attached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

impl PhraseGroup {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            translation: None,
        }
    }

    /// Plain text of the group
    pub fn text(&self) -> String {
        self.tokens.iter().map(|token| token.character).collect()
    }

    /// Readings of the group joined by spaces, skipping characters without one
    pub fn reading(&self) -> String {
        self.tokens
            .iter()
            .filter(|token| !token.phonetic_reading.is_empty())
            .map(|token| token.phonetic_reading.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn has_ideograph(tokens: &[Token]) -> bool {
        tokens.iter().any(|token| is_cjk_ideograph(token.character))
    }
}

/// Partition `tokens` into phrase groups of roughly `max_group_size` tokens.
///
/// Concatenating the groups reproduces the input minus whitespace other than
/// the literal space. A `max_group_size` of 0 is treated as 1.
pub fn group_tokens(tokens: &[Token], max_group_size: usize) -> Vec<PhraseGroup> {
    let max_group_size = max_group_size.max(1);
    let mut groups: Vec<PhraseGroup> = Vec::new();
    let mut current: Vec<Token> = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        let character = token.character;
        if is_droppable_whitespace(character) {
            continue;
        }

        current.push(token.clone());

        // Lookahead uses the raw sequence, dropped whitespace included.
        let next_is_punctuation = tokens
            .get(index + 1)
            .is_some_and(|next| is_punctuation(next.character));

        let end_of_sentence = is_sentence_ender(character);
        let full = current.len() >= max_group_size && !next_is_punctuation;
        let punctuated = is_punctuation(character)
            && current.len() >= MIN_PUNCTUATED_GROUP
            && !is_opening_mark(character);

        if end_of_sentence || full || punctuated {
            groups.push(PhraseGroup::new(std::mem::take(&mut current)));
        }
    }

    if !current.is_empty() {
        match groups.last_mut() {
            Some(last) if !PhraseGroup::has_ideograph(&current) => last.tokens.append(&mut current),
            _ => groups.push(PhraseGroup::new(current)),
        }
    }

    groups
}

/// Tokenize `text` and group the tokens in one step
pub fn annotate(
    text: &str,
    lookup: &dyn PhoneticLookup,
    max_group_size: usize,
) -> Vec<PhraseGroup> {
    group_tokens(&tokenize(text, lookup), max_group_size)
}
