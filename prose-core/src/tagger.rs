//! # Part-of-speech tagging
//!
//! A [`Tagger`] annotates tokens with part-of-speech tags in place: it receives
//! the token slice produced by tokenization and sets `tag` on every token. It
//! cannot add, drop or reorder tokens, so callers can rely on the token count
//! and order being the same before and after tagging.
//!
//! The default model uses [`LexiconTagger`], a deterministic tagger built from
//! a closed-class lexicon, orthographic patterns and suffix rules with one
//! token of left context. It emits Penn Treebank style tags. A trainable
//! alternative lives in [`crate::perceptron`].

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::BoxError;
use crate::tokenizer::{is_abbreviation, Token};

/// Annotates tokens with part-of-speech tags.
///
/// Implementations must be total over any token sequence, including an empty
/// one, and must set `tag` on every token they are given.
pub trait Tagger: Send + Sync {
    fn tag(&self, tokens: &mut [Token]) -> Result<(), BoxError>;
}

static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+([.,:/-]\d+)*|\d*\.\d+)(st|nd|rd|th|s)?$").expect("number pattern is valid")
});

/// Closed-class words and frequent irregular forms, by tag.
const LEXICON: &[(&str, &[&str])] = &[
    ("DT", &["the", "a", "an", "this", "that", "these", "those", "every", "each", "some", "any", "no", "all", "both", "another", "either", "neither"]),
    ("IN", &["of", "in", "on", "at", "by", "for", "with", "from", "about", "into", "over", "after", "before", "under", "between", "through", "during", "without", "against", "among", "since", "until", "because", "while", "if", "although", "though", "as", "than", "upon", "within", "across", "behind", "beyond", "near", "toward", "towards", "via", "per", "whether"]),
    ("TO", &["to"]),
    ("CC", &["and", "or", "but", "nor", "yet", "plus", "&"]),
    ("PRP", &["i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "myself", "yourself", "himself", "herself", "itself", "ourselves", "themselves"]),
    ("PRP$", &["my", "your", "his", "her", "its", "our", "their"]),
    ("MD", &["can", "could", "will", "would", "shall", "should", "may", "might", "must", "'ll", "\u{2019}ll", "'d", "\u{2019}d", "ca", "wo"]),
    ("VB", &["be", "do", "go", "run", "get", "make", "take", "see", "come", "say", "know", "think", "give", "find", "tell", "ask", "try", "leave", "call", "keep", "let", "begin", "help", "eat", "stop", "look"]),
    ("VBZ", &["is", "has", "does", "goes", "says", "gets", "makes"]),
    ("VBP", &["am", "are", "have", "'re", "\u{2019}re", "'ve", "\u{2019}ve", "'m", "\u{2019}m"]),
    ("VBD", &["was", "were", "had", "did", "went", "said", "made", "took", "came", "saw", "got", "gave", "ran", "slept", "knew", "thought", "told", "found", "left", "felt", "became", "began", "kept", "held", "brought", "wrote", "sat", "stood", "ate", "spoke"]),
    ("VBN", &["been", "gone", "done", "taken", "seen", "given", "known", "written", "eaten", "spoken"]),
    ("VBG", &["being", "having", "doing", "going"]),
    ("RB", &["not", "n't", "n\u{2019}t", "very", "also", "never", "always", "often", "just", "too", "so", "now", "then", "here", "soon", "already", "still", "again", "quite", "rather", "really", "almost", "only", "even", "ever", "yesterday", "today", "tomorrow"]),
    ("EX", &["there"]),
    ("WDT", &["which", "whatever", "whichever"]),
    ("WP", &["who", "whom", "what", "whoever"]),
    ("WP$", &["whose"]),
    ("WRB", &["when", "where", "why", "how"]),
    ("UH", &["oh", "yes", "hello", "hi", "hey", "wow", "ok", "okay"]),
    ("JJ", &["good", "new", "first", "last", "long", "great", "little", "own", "other", "old", "right", "big", "high", "different", "small", "large", "next", "early", "young", "important", "few", "public", "bad", "same", "able", "late"]),
    ("NN", &["home", "time", "way", "day", "man", "thing", "woman", "life", "child", "world", "school", "state", "family", "group", "country", "problem", "hand", "part", "place", "case", "week", "system", "program", "question", "work", "government", "number", "night", "point", "house", "water", "room", "money", "story", "fact", "month", "lot", "book", "job", "word", "business", "side", "kind", "head", "friend", "power", "hour", "game", "line", "end", "law", "car", "city", "name", "team", "idea", "body", "information", "office", "door", "health", "person", "war", "history", "party", "morning", "reason", "text", "dog", "cat", "%"]),
    ("NNS", &["people", "children", "men", "women", "years", "days", "times", "things"]),
];

/// Auxiliaries after which a word ending in "-ed" is a past participle.
const PERFECT_AUXILIARIES: &[&str] = &[
    "has", "have", "had", "'ve", "is", "are", "was", "were", "be", "been", "being", "'s", "'re",
];

const ADJECTIVE_SUFFIXES: &[&str] = &["able", "ible", "ful", "ous", "ive", "less", "ical", "ish", "al", "ic"];

const NOUN_SUFFIXES: &[&str] = &[
    "tion", "sion", "ment", "ness", "ity", "ship", "ance", "ence", "ism", "ist", "hood", "dom", "er", "or",
];

/// Lexicon and rule based tagger.
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    lexicon: HashMap<String, String>,
}

impl LexiconTagger {
    /// An empty lexicon; only the orthographic and suffix rules apply.
    pub fn new() -> Self {
        Self {
            lexicon: HashMap::new(),
        }
    }

    /// The bundled English lexicon.
    pub fn english() -> Self {
        let mut tagger = Self::new();
        for (tag, words) in LEXICON {
            for word in *words {
                tagger.add_word(word, tag);
            }
        }
        tagger
    }

    /// Adds or overrides the tag of a (case-insensitive) word.
    pub fn add_word(&mut self, word: &str, tag: &str) {
        self.lexicon.insert(word.to_lowercase(), tag.to_string());
    }

    fn tag_word(&self, word: &str, prev_word: Option<&str>, prev_tag: Option<&str>) -> String {
        if let Some(tag) = punctuation_tag(word) {
            return tag.to_string();
        }
        if NUMBER.is_match(word) {
            return "CD".to_string();
        }

        let lower = word.to_lowercase();
        let at_start = prev_tag.map_or(true, |t| t == ".");
        let capitalized = word.chars().next().is_some_and(char::is_uppercase);

        if lower == "'s" || lower == "\u{2019}s" {
            let possessive = prev_tag.is_some_and(|t| t.starts_with("NN"));
            let tag = if possessive { "POS" } else { "VBZ" };
            return tag.to_string();
        }
        if capitalized && is_abbreviation(word) {
            return "NNP".to_string();
        }
        if let Some(tag) = self.lexicon.get(&lower) {
            if !capitalized || at_start || !tag.starts_with("NN") {
                return tag.clone();
            }
        }
        if capitalized && !at_start {
            return "NNP".to_string();
        }
        if word.len() > 1 && word.chars().all(|c| !c.is_alphabetic() || c.is_uppercase()) && word.chars().any(char::is_alphabetic) {
            return "NNP".to_string();
        }

        if let Some(tag) = suffix_tag(&lower, prev_word, prev_tag) {
            return tag.to_string();
        }

        if capitalized {
            "NNP".to_string()
        } else if prev_tag == Some("PRP") {
            "VBP".to_string()
        } else {
            "NN".to_string()
        }
    }
}

impl Default for LexiconTagger {
    fn default() -> Self {
        Self::english()
    }
}

impl Tagger for LexiconTagger {
    fn tag(&self, tokens: &mut [Token]) -> Result<(), BoxError> {
        let mut prev_word: Option<String> = None;
        let mut prev_tag: Option<String> = None;
        for token in tokens.iter_mut() {
            let tag = self.tag_word(&token.text, prev_word.as_deref(), prev_tag.as_deref());
            prev_word = Some(token.text.to_lowercase());
            prev_tag = Some(tag.clone());
            token.tag = Some(tag);
        }
        Ok(())
    }
}

fn punctuation_tag(word: &str) -> Option<&'static str> {
    let tag = match word {
        "." | "!" | "?" | "..." | "\u{2026}" | "?!" => ".",
        "," => ",",
        ":" | ";" | "-" | "--" | "\u{2013}" | "\u{2014}" => ":",
        "(" | "[" | "{" => "(",
        ")" | "]" | "}" => ")",
        "\"" | "\u{201C}" | "``" | "`" | "\u{2018}" => "``",
        "\u{201D}" | "''" | "'" | "\u{2019}" => "''",
        "$" => "$",
        "#" => "#",
        _ if word.chars().all(|c| !c.is_alphanumeric()) && word != "%" && word != "&" => "SYM",
        _ => return None,
    };
    Some(tag)
}

/// Suffix rules for words the lexicon does not know.
fn suffix_tag(lower: &str, prev_word: Option<&str>, prev_tag: Option<&str>) -> Option<&'static str> {
    if matches!(prev_tag, Some("TO") | Some("MD")) {
        return Some("VB");
    }
    if lower.len() > 4 && lower.ends_with("ly") {
        return Some("RB");
    }
    if lower.len() > 4 && lower.ends_with("ing") {
        return Some("VBG");
    }
    if lower.len() > 3 && lower.ends_with("ed") {
        let perfect = prev_word.is_some_and(|w| PERFECT_AUXILIARIES.contains(&w));
        return Some(if perfect { "VBN" } else { "VBD" });
    }
    if lower.len() > 5 && ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return Some("JJ");
    }
    if lower.len() > 4 && NOUN_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return Some("NN");
    }
    if lower.len() > 5 && NOUN_SUFFIXES.iter().any(|s| lower.strip_suffix('s').is_some_and(|w| w.ends_with(s))) {
        return Some("NNS");
    }
    let plural_like = lower.len() > 3
        && lower.ends_with('s')
        && !(lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is"));
    if plural_like {
        let after_subject = matches!(prev_tag, Some("PRP") | Some("NN") | Some("NNP"));
        return Some(if after_subject { "VBZ" } else { "NNS" });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::iter_tokenize;

    fn tags(text: &str) -> Vec<String> {
        let mut tokens = iter_tokenize(text);
        LexiconTagger::english().tag(&mut tokens).unwrap();
        tokens.into_iter().map(|t| t.tag.unwrap()).collect()
    }

    #[test]
    fn test_simple_clause() {
        assert_eq!(tags("The dog runs quickly."), ["DT", "NN", "VBZ", "RB", "."]);
    }

    #[test]
    fn test_contractions_and_modals() {
        assert_eq!(tags("I can't go."), ["PRP", "MD", "RB", "VB", "."]);
    }

    #[test]
    fn test_proper_nouns_and_numbers() {
        assert_eq!(
            tags("She visited Paris in 2019."),
            ["PRP", "VBD", "NNP", "IN", "CD", "."]
        );
    }

    #[test]
    fn test_perfect_participle() {
        assert_eq!(
            tags("He has walked to the park."),
            ["PRP", "VBZ", "VBN", "TO", "DT", "NN", "."]
        );
    }

    #[test]
    fn test_possessive() {
        assert_eq!(tags("Smith's car"), ["NNP", "POS", "NN"]);
    }

    #[test]
    fn test_sentence_initial_capital_uses_lexicon() {
        assert_eq!(tags("Run!"), ["VB", "."]);
        assert_eq!(tags("He left. The end."), ["PRP", "VBD", ".", "DT", "NN", "."]);
    }

    #[test]
    fn test_title_abbreviation() {
        assert_eq!(tags("Dr. Smith"), ["NNP", "NNP"]);
    }

    #[test]
    fn test_custom_lexicon_entry() {
        let mut tagger = LexiconTagger::new();
        tagger.add_word("Blorp", "UH");
        let mut tokens = iter_tokenize("blorp");
        tagger.tag(&mut tokens).unwrap();
        assert_eq!(tokens[0].tag.as_deref(), Some("UH"));
    }

    #[test]
    fn test_empty_sequence() {
        let mut tokens: Vec<Token> = Vec::new();
        assert!(LexiconTagger::english().tag(&mut tokens).is_ok());
    }
}
