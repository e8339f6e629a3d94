/*!
 * Character classes used by the grouping engine and the orchestrator.
 *
 * All classes are explicit code-point sets so they can be reviewed at a glance.
 */

/// Punctuation that keeps a phrase group together.
///
/// The literal space is part of the set: it behaves like a soft separator.
pub const PUNCTUATION: &[char] = &[
    // CJK
    '。', '！', '？', '；', '，', '、', '：', '“', '”', '‘', '’', '（', '）', '【', '】', '—', '…',
    // ASCII
    '.', '!', '?', ';', ',', ':', '"', '\'', '(', ')', '[', ']', '-', ' ',
];

/// Marks that always end a group
pub const SENTENCE_ENDERS: &[char] = &['。', '！', '？', '.', '!', '?'];

/// Marks that belong to the text that follows them
pub const OPENING_MARKS: &[char] = &['“', '‘', '（', '【'];

/// Start and end of the CJK Unified Ideographs block
const CJK_IDEOGRAPHS: std::ops::RangeInclusive<char> = '\u{4E00}'..='\u{9FFF}';

pub fn is_punctuation(c: char) -> bool {
    PUNCTUATION.contains(&c)
}

pub fn is_sentence_ender(c: char) -> bool {
    SENTENCE_ENDERS.contains(&c)
}

pub fn is_opening_mark(c: char) -> bool {
    OPENING_MARKS.contains(&c)
}

/// True for characters in the CJK Unified Ideographs block
pub fn is_cjk_ideograph(c: char) -> bool {
    CJK_IDEOGRAPHS.contains(&c)
}

/// Whitespace that the grouping engine drops.
///
/// The literal space is kept. The byte-order mark counts as whitespace.
pub fn is_droppable_whitespace(c: char) -> bool {
    c != ' ' && (c.is_whitespace() || c == '\u{FEFF}')
}

/// True when `text` has nothing worth translating: every character is from
/// the punctuation set, ASCII punctuation, or whitespace.
///
/// Empty text is not considered punctuation.
pub fn is_pure_punctuation(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| is_punctuation(c) || c.is_ascii_punctuation() || c.is_whitespace())
}
