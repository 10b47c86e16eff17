//! # Features for the perceptron tagger
//!
//! For each token the perceptron sees a sparse set of binary features: the
//! normalized word, affixes, orthographic shape and a window of context (the
//! two previous *predicted* tags plus the neighbouring words). Features are
//! plain strings such as `"suffix3=ing"` or `"prev_tag=DT"`.
//!
//! Features are kept in a `Vec` rather than a set so scoring always sums
//! weights in the same order.

use crate::tokenizer::Token;

/// Pseudo-tags used as context before the first token.
pub const START: &str = "-START-";
pub const START2: &str = "-START2-";

/// The active features of one token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureVector {
    pub features: Vec<String>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>) {
        self.features.push(key.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.features.iter().any(|f| f == key)
    }
}

/// Normalizes a word for lexical features: numbers and hyphenated words are
/// collapsed into classes, everything else is lowercased.
pub fn normalize(word: &str) -> String {
    if word.len() == 4 && word.chars().all(|c| c.is_ascii_digit()) {
        "!YEAR".to_string()
    } else if word.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        "!DIGITS".to_string()
    } else if word.contains('-') && !word.starts_with('-') {
        "!HYPHEN".to_string()
    } else {
        word.to_lowercase()
    }
}

fn suffix(word: &str, n: usize) -> &str {
    let start = word
        .char_indices()
        .rev()
        .nth(n.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    &word[start..]
}

fn prefix(word: &str) -> &str {
    word.chars().next().map(|c| &word[..c.len_utf8()]).unwrap_or("")
}

/// Features for `tokens[i]`, given the tags already predicted for the two
/// previous positions.
pub fn token_features(tokens: &[Token], i: usize, prev_tag: &str, prev2_tag: &str) -> FeatureVector {
    let mut fv = FeatureVector::new();
    let word = normalize(&tokens[i].text);
    let raw = tokens[i].text.as_str();

    fv.insert("bias");
    fv.insert(format!("word={}", word));
    fv.insert(format!("suffix3={}", suffix(&word, 3)));
    fv.insert(format!("prefix1={}", prefix(&word)));
    fv.insert(format!("prev_tag={}", prev_tag));
    fv.insert(format!("prev2_tag={}", prev2_tag));
    fv.insert(format!("prev_tags={}+{}", prev_tag, prev2_tag));
    fv.insert(format!("prev_tag+word={}+{}", prev_tag, word));

    if raw.chars().next().is_some_and(char::is_uppercase) {
        fv.insert("is_capitalized");
    }
    if raw.chars().any(|c| c.is_ascii_digit()) {
        fv.insert("has_digit");
    }

    match i.checked_sub(1).map(|p| normalize(&tokens[p].text)) {
        Some(prev) => {
            fv.insert(format!("prev_suffix3={}", suffix(&prev, 3)));
            fv.insert(format!("prev_word={}", prev));
        }
        None => fv.insert("prev_word=-START-"),
    }
    match tokens.get(i + 1).map(|t| normalize(&t.text)) {
        Some(next) => {
            fv.insert(format!("next_suffix3={}", suffix(&next, 3)));
            fv.insert(format!("next_word={}", next));
        }
        None => fv.insert("next_word=-END-"),
    }

    fv
}
