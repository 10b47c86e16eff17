//! # Sentence segmentation
//!
//! Splits raw text into sentence spans. Segmentation is independent of
//! tokenization: it reads the text directly and never looks at tokens or tags.
//!
//! The bundled [`RuleSegmenter`] breaks after sentence terminators
//! (`.`, `!`, `?`, `…`) when the next word starts like a sentence (uppercase
//! letter, digit, opening quote or bracket), and after blank lines. A period
//! that closes an abbreviation ("Dr.", "U.S.", "J.") is not a boundary.

use serde::{Deserialize, Serialize};

use crate::error::BoxError;
use crate::tokenizer::is_abbreviation;

/// A contiguous sentence span over the document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

/// Splits text into sentences.
///
/// Implementations must be total and deterministic: the same text always
/// yields the same spans, in document order, non-overlapping.
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Result<Vec<Sentence>, BoxError>;
}

const TERMINATORS: &[char] = &['.', '!', '?', '\u{2026}'];

/// Closing punctuation that stays attached to the sentence it ends.
const CLOSERS: &[char] = &['"', '\'', ')', ']', '}', '\u{201D}', '\u{2019}'];

/// Characters that may open a new sentence besides letters and digits.
const OPENERS: &[char] = &['"', '\'', '(', '[', '\u{201C}', '\u{2018}', '-', '*'];

/// The default rule-based segmenter.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleSegmenter;

impl Segmenter for RuleSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<Sentence>, BoxError> {
        Ok(segment_text(text))
    }
}

/// Segments `text` with the [`RuleSegmenter`] rules.
pub fn segment_text(text: &str) -> Vec<Sentence> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, ch) = chars[i];

        if ch == '\n' && is_blank_line_break(&chars, i) {
            push_sentence(text, start, pos, &mut sentences);
            start = pos;
            i += 1;
            continue;
        }

        if !TERMINATORS.contains(&ch) {
            i += 1;
            continue;
        }

        // Absorb runs like "?!" or "..." plus closing quotes and brackets.
        let mut j = i + 1;
        while j < chars.len() && (TERMINATORS.contains(&chars[j].1) || CLOSERS.contains(&chars[j].1)) {
            j += 1;
        }
        let end = chars.get(j).map(|&(p, _)| p).unwrap_or(text.len());

        if j < chars.len() && !chars[j].1.is_whitespace() {
            i = j;
            continue;
        }
        if ch == '.' && j == i + 1 && is_abbreviation(preceding_word(text, pos + 1)) {
            i = j;
            continue;
        }
        if !starts_sentence(&chars, j) {
            i = j;
            continue;
        }

        push_sentence(text, start, end, &mut sentences);
        start = end;
        i = j;
    }

    push_sentence(text, start, text.len(), &mut sentences);
    sentences
}

/// True if the newline at `i` is followed by another newline with only
/// whitespace between them.
fn is_blank_line_break(chars: &[(usize, char)], i: usize) -> bool {
    chars[i + 1..]
        .iter()
        .take_while(|(_, c)| c.is_whitespace())
        .any(|(_, c)| *c == '\n')
}

/// The whitespace-delimited word ending at byte `end`.
fn preceding_word(text: &str, end: usize) -> &str {
    let head = &text[..end];
    let begin = head
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let word = &head[begin..];
    word.trim_start_matches(|c: char| OPENERS.contains(&c))
}

/// True if the first non-whitespace character at or after `j` can open a sentence.
/// End of text counts as a boundary.
fn starts_sentence(chars: &[(usize, char)], j: usize) -> bool {
    match chars[j..].iter().find(|(_, c)| !c.is_whitespace()) {
        None => true,
        Some(&(_, c)) => c.is_uppercase() || c.is_numeric() || OPENERS.contains(&c),
    }
}

/// Pushes `text[start..end]` trimmed of surrounding whitespace, if anything remains.
fn push_sentence(text: &str, start: usize, end: usize, sentences: &mut Vec<Sentence>) {
    let raw = &text[start..end];
    let trimmed_start = raw.trim_start();
    let trimmed = trimmed_start.trim_end();
    if trimmed.is_empty() {
        return;
    }
    let s = start + (raw.len() - trimmed_start.len());
    sentences.push(Sentence {
        text: trimmed.to_string(),
        start: s,
        end: s + trimmed.len(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(sentences: &[Sentence]) -> Vec<&str> {
        sentences.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_abbreviation_does_not_split() {
        let sentences = segment_text("Dr. Smith went home. He slept.");
        assert_eq!(texts(&sentences), ["Dr. Smith went home.", "He slept."]);
    }

    #[test]
    fn test_spans_match_text() {
        let text = "  First one!  Second one?\tThird.";
        let sentences = segment_text(text);
        assert_eq!(sentences.len(), 3);
        for s in &sentences {
            assert_eq!(&text[s.start..s.end], s.text);
        }
        assert!(sentences.windows(2).all(|w| w[0].end <= w[1].start));
    }

    #[test]
    fn test_closing_quote_stays_with_sentence() {
        let sentences = segment_text("He said \"Stop.\" Then he left.");
        assert_eq!(texts(&sentences), ["He said \"Stop.\"", "Then he left."]);
    }

    #[test]
    fn test_lowercase_continuation_is_not_a_boundary() {
        let sentences = segment_text("The value is approx. three. Fine?! yes it is.");
        assert_eq!(texts(&sentences), ["The value is approx. three.", "Fine?! yes it is."]);
    }

    #[test]
    fn test_decimal_numbers() {
        let sentences = segment_text("It costs 3.50 dollars. Cheap.");
        assert_eq!(texts(&sentences), ["It costs 3.50 dollars.", "Cheap."]);
    }

    #[test]
    fn test_blank_line_breaks_sentence() {
        let sentences = segment_text("Title without period\n\nBody text here.");
        assert_eq!(texts(&sentences), ["Title without period", "Body text here."]);
    }

    #[test]
    fn test_no_terminator() {
        let sentences = segment_text("just words");
        assert_eq!(texts(&sentences), ["just words"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(segment_text("").is_empty());
        assert!(segment_text("   \n ").is_empty());
    }
}
