//! # Named-entity extraction
//!
//! Entity extraction runs after tagging. An [`Extractor`] labels every token
//! with a BIO tag ([`EntityTag`]); [`chunk`] then folds the labels into
//! [`Entity`] spans.
//!
//! ## BIO scheme
//!
//! - `B-LABEL`: first token of an entity
//! - `I-LABEL`: following tokens of the same entity
//! - `O`: outside any entity
//!
//! ## Labels
//!
//! | Label  | Meaning                          | Examples                     |
//! |--------|----------------------------------|------------------------------|
//! | PERSON | People                           | Barack Obama, Dr. Smith      |
//! | GPE    | Countries, cities, states        | France, New York, Texas      |
//! | ORG    | Companies, agencies, institutions| Google, United Nations       |
//!
//! The bundled [`GazetteerExtractor`] combines gazetteer lookup with two
//! patterns: honorifics ("Dr. Smith" -> PERSON) and corporate suffixes
//! ("Acme Corp." -> ORG). When tokens carry POS tags, proper-noun tags decide
//! which capitalized words can extend a name.

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::BoxError;
use crate::tokenizer::Token;

/// Entity categories recognized by the bundled extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    /// People, real or fictional.
    Person,
    /// Geo-political entities: countries, cities, states.
    Gpe,
    /// Organizations: companies, agencies, institutions.
    Org,
}

impl EntityLabel {
    pub fn name(&self) -> &'static str {
        match self {
            EntityLabel::Person => "PERSON",
            EntityLabel::Gpe => "GPE",
            EntityLabel::Org => "ORG",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "PERSON" => Some(EntityLabel::Person),
            "GPE" => Some(EntityLabel::Gpe),
            "ORG" => Some(EntityLabel::Org),
            _ => None,
        }
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// BIO label attached to a token by the extraction stage.
///
/// Serialized as its textual form ("B-PERSON", "I-ORG", "O").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EntityTag {
    Begin(EntityLabel),
    Inside(EntityLabel),
    Outside,
}

impl EntityTag {
    pub fn label(&self) -> Option<EntityLabel> {
        match self {
            EntityTag::Begin(l) | EntityTag::Inside(l) => Some(*l),
            EntityTag::Outside => None,
        }
    }

    /// Parses "B-PERSON", "I-GPE" or "O".
    pub fn parse(s: &str) -> Option<Self> {
        if s == "O" {
            return Some(EntityTag::Outside);
        }
        let (prefix, name) = s.split_once('-')?;
        let label = EntityLabel::from_name(name)?;
        match prefix {
            "B" => Some(EntityTag::Begin(label)),
            "I" => Some(EntityTag::Inside(label)),
            _ => None,
        }
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityTag::Begin(l) => write!(f, "B-{}", l),
            EntityTag::Inside(l) => write!(f, "I-{}", l),
            EntityTag::Outside => f.write_str("O"),
        }
    }
}

impl From<EntityTag> for String {
    fn from(tag: EntityTag) -> Self {
        tag.to_string()
    }
}

impl TryFrom<String> for EntityTag {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        EntityTag::parse(&s).ok_or_else(|| format!("invalid entity tag: {s}"))
    }
}

/// A named entity spanning one or more tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
    /// Index of the first token.
    pub start_token: usize,
    /// Index of the last token (inclusive).
    pub end_token: usize,
}

/// Labels tokens with BIO entity tags.
///
/// Implementations must set `label` on every token and must not add, remove
/// or reorder tokens.
pub trait Extractor: Send + Sync {
    fn classify(&self, tokens: &mut [Token]) -> Result<(), BoxError>;
}

/// Folds BIO labels into entity spans.
///
/// An entity starts at `B-X` and continues over `I-X` tokens of the same
/// label; `O`, a new `B-`, an `I-` of another label or an unlabeled token ends
/// it. A stray `I-X` without a preceding `B-X` is ignored.
pub fn chunk(tokens: &[Token], text: &str) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let Some(EntityTag::Begin(label)) = tokens[i].label else {
            i += 1;
            continue;
        };

        let mut j = i + 1;
        while j < tokens.len() && tokens[j].label == Some(EntityTag::Inside(label)) {
            j += 1;
        }

        let first = &tokens[i];
        let last = &tokens[j - 1];
        let surface = text
            .get(first.start..last.end)
            .map(str::to_string)
            .unwrap_or_else(|| {
                tokens[i..j]
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            });

        entities.push(Entity {
            text: surface,
            label,
            start: first.start,
            end: last.end,
            start_token: first.index,
            end_token: last.index,
        });
        i = j;
    }

    entities
}

static HONORIFIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:mr|mrs|ms|mx|dr|prof|sir|dame|lord|lady|president|senator|sen|governor|gov|rep|judge|rev)\.?$")
        .expect("honorific pattern is valid")
});

static ORG_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(Inc|Corp|Co|Ltd|LLC|PLC|GmbH|AG|Corporation|Company|Group|Holdings)\.?$")
        .expect("organization suffix pattern is valid")
});

/// Gazetteer and pattern based entity extractor.
#[derive(Debug, Clone, Default)]
pub struct GazetteerExtractor {
    /// Given names and well-known surnames (lowercase, single token).
    persons: HashSet<String>,
    /// Places (lowercase, may span several tokens), longest first.
    places: Vec<Vec<String>>,
    /// Organizations (lowercase, may span several tokens), longest first.
    organizations: Vec<Vec<String>>,
}

impl GazetteerExtractor {
    /// An extractor with empty gazetteers; only the patterns fire.
    pub fn new() -> Self {
        Self::default()
    }

    /// An extractor loaded with the bundled English gazetteers.
    pub fn english() -> Self {
        let mut extractor = Self::new();
        for name in PERSONS {
            extractor.add_person(name);
        }
        for name in PLACES {
            extractor.add_place(name);
        }
        for name in ORGANIZATIONS {
            extractor.add_organization(name);
        }
        extractor
    }

    pub fn add_person(&mut self, name: &str) {
        for part in name.split_whitespace() {
            self.persons.insert(part.to_lowercase());
        }
    }

    pub fn add_place(&mut self, name: &str) {
        insert_phrase(&mut self.places, name);
    }

    pub fn add_organization(&mut self, name: &str) {
        insert_phrase(&mut self.organizations, name);
    }

    /// Computes a label for each token without touching the tokens.
    pub fn labels(&self, tokens: &[Token]) -> Vec<EntityTag> {
        let mut labels: Vec<Option<EntityTag>> = vec![None; tokens.len()];

        // 1. Multi-token gazetteers; organizations win over places
        //    ("Bank of America" must not yield GPE "America").
        mark_phrases(tokens, &self.organizations, EntityLabel::Org, &mut labels);
        mark_phrases(tokens, &self.places, EntityLabel::Gpe, &mut labels);

        // 2. Honorific followed by names: "Dr. Jane Smith".
        for i in 0..tokens.len().saturating_sub(1) {
            if labels[i + 1].is_some() || !HONORIFIC.is_match(&tokens[i].text) {
                continue;
            }
            if is_name_like(&tokens[i + 1]) {
                extend_name(tokens, i + 1, EntityLabel::Person, &mut labels);
            }
        }

        // 3. Known given names, extended over a following surname.
        for i in 0..tokens.len() {
            if labels[i].is_some() || !is_capitalized(&tokens[i]) {
                continue;
            }
            if self.persons.contains(&tokens[i].text.to_lowercase()) {
                extend_name(tokens, i, EntityLabel::Person, &mut labels);
            }
        }

        // 4. Corporate suffix: "Acme Widget Corp." -> ORG over the whole run.
        for i in 1..tokens.len() {
            if labels[i].is_some() || !ORG_SUFFIX.is_match(&tokens[i].text) {
                continue;
            }
            let mut begin = i;
            while begin > 0 && labels[begin - 1].is_none() && is_name_like(&tokens[begin - 1]) {
                begin -= 1;
            }
            if begin < i {
                labels[begin] = Some(EntityTag::Begin(EntityLabel::Org));
                for label in &mut labels[begin + 1..=i] {
                    *label = Some(EntityTag::Inside(EntityLabel::Org));
                }
            }
        }

        labels
            .into_iter()
            .map(|l| l.unwrap_or(EntityTag::Outside))
            .collect()
    }
}

impl Extractor for GazetteerExtractor {
    fn classify(&self, tokens: &mut [Token]) -> Result<(), BoxError> {
        let labels = self.labels(tokens);
        for (token, label) in tokens.iter_mut().zip(labels) {
            token.label = Some(label);
        }
        Ok(())
    }
}

fn insert_phrase(phrases: &mut Vec<Vec<String>>, name: &str) {
    let parts: Vec<String> = name.split_whitespace().map(str::to_lowercase).collect();
    if parts.is_empty() || phrases.contains(&parts) {
        return;
    }
    let at = phrases.partition_point(|p| p.len() >= parts.len());
    phrases.insert(at, parts);
}

fn mark_phrases(
    tokens: &[Token],
    phrases: &[Vec<String>],
    label: EntityLabel,
    labels: &mut [Option<EntityTag>],
) {
    let mut i = 0;
    'outer: while i < tokens.len() {
        if labels[i].is_none() && is_capitalized(&tokens[i]) {
            for phrase in phrases {
                let end = i + phrase.len();
                if end > tokens.len() || labels[i..end].iter().any(Option::is_some) {
                    continue;
                }
                let matches = phrase
                    .iter()
                    .zip(&tokens[i..end])
                    .all(|(part, token)| token.text.to_lowercase() == *part);
                if matches {
                    labels[i] = Some(EntityTag::Begin(label));
                    for l in &mut labels[i + 1..end] {
                        *l = Some(EntityTag::Inside(label));
                    }
                    i = end;
                    continue 'outer;
                }
            }
        }
        i += 1;
    }
}

/// Marks `tokens[start]` as the beginning of an entity and extends it over
/// directly following name-like tokens.
fn extend_name(tokens: &[Token], start: usize, label: EntityLabel, labels: &mut [Option<EntityTag>]) {
    labels[start] = Some(EntityTag::Begin(label));
    let mut j = start + 1;
    while j < tokens.len() && labels[j].is_none() && is_name_like(&tokens[j]) && !ORG_SUFFIX.is_match(&tokens[j].text) {
        labels[j] = Some(EntityTag::Inside(label));
        j += 1;
    }
}

fn is_capitalized(token: &Token) -> bool {
    token.text.chars().next().is_some_and(char::is_uppercase)
}

/// Capitalized, and a proper noun if the token was tagged.
fn is_name_like(token: &Token) -> bool {
    is_capitalized(token)
        && token
            .tag
            .as_deref()
            .map_or(true, |tag| tag.starts_with("NNP"))
}

const PERSONS: &[&str] = &[
    "john", "mary", "james", "robert", "michael", "william", "david", "richard",
    "joseph", "thomas", "charles", "elizabeth", "jennifer", "linda", "barbara",
    "susan", "sarah", "karen", "nancy", "lisa", "emily", "anna", "peter", "paul",
    "george", "barack", "hillary", "donald", "joe", "kamala", "angela", "emmanuel",
    "vladimir", "narendra", "justin", "elon", "jeff", "tim", "steve", "bill",
    "warren", "oprah", "taylor", "obama", "trump", "biden", "merkel", "macron",
];

const PLACES: &[&str] = &[
    "united states", "united kingdom", "new york", "new york city", "los angeles",
    "san francisco", "new zealand", "south africa", "hong kong", "new jersey",
    "north carolina", "south korea", "north korea", "saudi arabia",
    "america", "canada", "mexico", "brazil", "argentina", "france", "germany",
    "spain", "italy", "portugal", "ireland", "england", "scotland", "russia",
    "china", "japan", "india", "pakistan", "egypt", "nigeria", "kenya",
    "australia", "israel", "iran", "iraq", "turkey", "ukraine", "poland",
    "london", "paris", "berlin", "madrid", "rome", "tokyo", "beijing", "moscow",
    "chicago", "boston", "seattle", "texas", "california", "florida", "ohio",
    "washington", "europe", "asia", "africa",
];

const ORGANIZATIONS: &[&str] = &[
    "united nations", "european union", "world health organization",
    "world bank", "bank of america", "goldman sachs", "general motors",
    "harvard university", "stanford university", "supreme court",
    "google", "apple", "microsoft", "amazon", "facebook", "meta", "ibm",
    "intel", "nvidia", "tesla", "spacex", "netflix", "toyota", "ford", "nasa",
    "fbi", "cia", "nato", "unicef", "congress", "senate", "reuters",
];
