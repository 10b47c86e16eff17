//! # Tokenization
//!
//! Splits raw text into tokens (words, punctuation, contraction pieces). Every
//! token keeps its byte span in the original text so later stages and callers
//! can map annotations back onto the input without re-scanning it.
//!
//! ## Bundled tokenizers
//!
//! - [`IterTokenizer`] (the default): splits on whitespace, then peels leading
//!   and trailing punctuation off each chunk. Abbreviations ("Dr.", "U.S.",
//!   initials) keep their period and English contractions are split the Penn
//!   Treebank way ("don't" -> "do", "n't").
//! - [`UnicodeTokenizer`]: UAX #29 word boundaries, whitespace dropped.
//!
//! ## Example
//!
//! ```rust
//! use prose_core::tokenizer::{IterTokenizer, Tokenizer};
//!
//! let tokens = IterTokenizer.tokenize("Dr. Smith didn't go.").unwrap();
//! let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, ["Dr.", "Smith", "did", "n't", "go", "."]);
//! ```

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::BoxError;
use crate::extract::EntityTag;

/// A token extracted from the original text.
///
/// `start` and `end` are byte offsets into the document text (half-open), so
/// `&text[token.start..token.end] == token.text` always holds for tokens
/// produced by the bundled tokenizers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface form (e.g. "Smith", ",", "n't").
    pub text: String,
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
    /// Position in the document's token sequence (0, 1, 2...).
    pub index: usize,
    /// Part-of-speech tag, present only if the tagging stage ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// BIO entity label, present only if the extraction stage ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<EntityTag>,
}

impl Token {
    /// Creates an untagged token starting at byte `start`.
    pub fn new(text: impl Into<String>, start: usize) -> Self {
        let text = text.into();
        let end = start + text.len();
        Self {
            text,
            start,
            end,
            index: 0,
            tag: None,
            label: None,
        }
    }

    pub fn is_tagged(&self) -> bool {
        self.tag.is_some()
    }
}

/// Splits text into tokens.
///
/// Implementations must be a pure function of the input text and return tokens
/// in document order.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, BoxError>;
}

/// Renumbers `index` so it matches each token's position.
pub fn reindex(tokens: &mut [Token]) {
    for (i, token) in tokens.iter_mut().enumerate() {
        token.index = i;
    }
}

/// Abbreviations whose trailing period belongs to the word (lowercase, no period).
pub(crate) const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "gen", "col", "lt",
    "sgt", "capt", "rep", "sen", "gov", "pres", "rev", "hon", "inc", "corp",
    "ltd", "co", "vs", "etc", "jan", "feb", "aug", "sept", "oct", "nov", "dec",
    "approx", "dept", "est", "fig", "no",
];

/// Returns true if `word` ends with a period that is part of an abbreviation:
/// a listed abbreviation, a single initial ("J.") or a dotted form ("U.S.", "e.g.").
pub(crate) fn is_abbreviation(word: &str) -> bool {
    let Some(body) = word.strip_suffix('.') else {
        return false;
    };
    if body.is_empty() {
        return false;
    }
    if ABBREVIATIONS.contains(&body.to_lowercase().as_str()) {
        return true;
    }
    body.split('.').all(|part| {
        let mut chars = part.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
    })
}

/// Characters split off the front of a chunk.
const PREFIXES: &[char] = &['(', '[', '{', '"', '\u{201C}', '\u{2018}', '$', '`'];

/// Characters split off the end of a chunk.
const SUFFIXES: &[char] = &[
    ',', '.', '!', '?', ';', ':', ')', ']', '}', '"', '\u{201D}', '\u{2019}', '\'', '%',
    '\u{2026}',
];

/// Contraction endings split into their own token, longest first.
const CONTRACTIONS: &[&str] = &[
    "n't", "n\u{2019}t", "'ll", "\u{2019}ll", "'re", "\u{2019}re", "'ve", "\u{2019}ve", "'s",
    "\u{2019}s", "'m", "\u{2019}m", "'d", "\u{2019}d",
];

/// The default tokenizer: whitespace chunks with punctuation peeled off.
#[derive(Debug, Clone, Copy, Default)]
pub struct IterTokenizer;

impl Tokenizer for IterTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, BoxError> {
        Ok(iter_tokenize(text))
    }
}

/// Tokenizes `text` with the [`IterTokenizer`] rules.
pub fn iter_tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (offset, chunk) in whitespace_chunks(text) {
        split_chunk(chunk, offset, &mut tokens);
    }
    reindex(&mut tokens);
    tokens
}

/// Maximal runs of non-whitespace, with their byte offsets.
fn whitespace_chunks(text: &str) -> Vec<(usize, &str)> {
    let mut chunks = Vec::new();
    let mut start = None;
    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                chunks.push((s, &text[s..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        chunks.push((s, &text[s..]));
    }
    chunks
}

fn split_chunk(chunk: &str, offset: usize, tokens: &mut Vec<Token>) {
    let mut begin = 0;
    let mut end = chunk.len();

    while let Some(ch) = chunk[begin..end].chars().next() {
        let len = ch.len_utf8();
        if !PREFIXES.contains(&ch) || end - begin == len {
            break;
        }
        tokens.push(Token::new(&chunk[begin..begin + len], offset + begin));
        begin += len;
    }

    // Collected back to front.
    let mut suffixes: Vec<(usize, usize)> = Vec::new();
    loop {
        let word = &chunk[begin..end];
        if word.len() > 3 && word.ends_with("...") {
            suffixes.push((end - 3, end));
            end -= 3;
            continue;
        }
        if let Some(len) = contraction_len(word) {
            suffixes.push((end - len, end));
            end -= len;
            continue;
        }
        let Some(ch) = word.chars().next_back() else {
            break;
        };
        let len = ch.len_utf8();
        if word.len() == len || !SUFFIXES.contains(&ch) {
            break;
        }
        if ch == '.' && is_abbreviation(word) {
            break;
        }
        suffixes.push((end - len, end));
        end -= len;
    }

    if begin < end {
        tokens.push(Token::new(&chunk[begin..end], offset + begin));
    }
    for (s, e) in suffixes.into_iter().rev() {
        tokens.push(Token::new(&chunk[s..e], offset + s));
    }
}

/// Byte length of a contraction ending on `word`, if it has one and something precedes it.
fn contraction_len(word: &str) -> Option<usize> {
    let lower = word.to_lowercase();
    // Lowercasing can change byte lengths for some scripts.
    if lower.len() != word.len() {
        return None;
    }
    CONTRACTIONS
        .iter()
        .find(|c| lower.len() > c.len() && lower.ends_with(*c))
        .map(|c| c.len())
}

/// Tokenizer following Unicode word boundaries (UAX #29).
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeTokenizer;

impl Tokenizer for UnicodeTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, BoxError> {
        let mut tokens: Vec<Token> = text
            .split_word_bound_indices()
            .filter(|(_, word)| !word.trim().is_empty())
            .map(|(start, word)| Token::new(word, start))
            .collect();
        reindex(&mut tokens);
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_iter_tokenize_basic() {
        let tokens = iter_tokenize("Dr. Smith went home. He slept.");
        assert_eq!(
            texts(&tokens),
            ["Dr.", "Smith", "went", "home", ".", "He", "slept", "."]
        );
    }

    #[test]
    fn test_offsets_point_into_text() {
        let text = "  \u{201C}Caf\u{e9}s,\u{201D} she said (twice)!";
        let tokens = iter_tokenize(text);
        for (i, token) in tokens.iter().enumerate() {
            assert_eq!(&text[token.start..token.end], token.text);
            assert_eq!(token.index, i);
        }
        assert_eq!(
            texts(&tokens),
            ["\u{201C}", "Caf\u{e9}s", ",", "\u{201D}", "she", "said", "(", "twice", ")", "!"]
        );
    }

    #[test]
    fn test_contractions() {
        let tokens = iter_tokenize("I can't say it's John's.");
        assert_eq!(
            texts(&tokens),
            ["I", "ca", "n't", "say", "it", "'s", "John", "'s", "."]
        );
    }

    #[test]
    fn test_dotted_abbreviation_and_ellipsis() {
        let tokens = iter_tokenize("The U.S. economy grew... slowly.");
        assert_eq!(
            texts(&tokens),
            ["The", "U.S.", "economy", "grew", "...", "slowly", "."]
        );
    }

    #[test]
    fn test_currency_and_percent() {
        let tokens = iter_tokenize("$5 is 50%");
        assert_eq!(texts(&tokens), ["$", "5", "is", "50", "%"]);
    }

    #[test]
    fn test_lone_punctuation_is_a_token() {
        let tokens = iter_tokenize("! ?");
        assert_eq!(texts(&tokens), ["!", "?"]);
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(iter_tokenize("").is_empty());
        assert!(iter_tokenize(" \n\t ").is_empty());
    }

    #[test]
    fn test_is_abbreviation() {
        assert!(is_abbreviation("Dr."));
        assert!(is_abbreviation("J."));
        assert!(is_abbreviation("e.g."));
        assert!(!is_abbreviation("home."));
        assert!(!is_abbreviation("Dr"));
        assert!(!is_abbreviation("."));
    }

    #[test]
    fn test_unicode_tokenizer() {
        let tokens = UnicodeTokenizer.tokenize("Hello, world!").unwrap();
        assert_eq!(texts(&tokens), ["Hello", ",", "world", "!"]);
        assert_eq!(tokens[2].start, 7);
        assert_eq!(tokens[2].index, 2);
    }
}
