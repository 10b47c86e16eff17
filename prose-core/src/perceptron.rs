//! # Averaged perceptron tagger
//!
//! A trainable part-of-speech tagger. Decoding is greedy, left to right: each
//! token is scored with the features from [`crate::features`], using the tags
//! already predicted for the previous two tokens as context.
//!
//! Training is online and mistake-driven: a sentence is tagged with the
//! current weights and, wherever the guess is wrong, the gold tag's weights
//! are promoted and the guessed tag's weights demoted. The final model uses
//! the average of each weight over all training steps, which is much more
//! stable than the last weights.
//!
//! ## Lazy averaging
//!
//! Averaging naively costs O(features × tags) per step. Instead each weight
//! remembers the step of its last change; its running total is brought up to
//! date only when it changes again, and once more at the end of training.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BoxError, Result};
use crate::features::{self, FeatureVector, START, START2};
use crate::tagger::Tagger;
use crate::tokenizer::Token;

/// A sentence of `(word, tag)` pairs used for training.
pub type TaggedSentence<'a> = &'a [(&'a str, &'a str)];

/// Averaged perceptron part-of-speech tagger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerceptronTagger {
    /// feature -> tag -> weight. Holds averaged weights after training.
    weights: HashMap<String, HashMap<String, f64>>,
    /// Known tags, sorted so ties always resolve the same way.
    tags: Vec<String>,
    /// Accumulated weight totals, (feature, tag) -> sum over steps.
    #[serde(skip)]
    totals: HashMap<(String, String), f64>,
    /// Step at which each weight last changed.
    #[serde(skip)]
    timestamps: HashMap<(String, String), usize>,
    #[serde(skip)]
    steps: usize,
}

impl PerceptronTagger {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the tagger knows at least one tag.
    pub fn is_trained(&self) -> bool {
        !self.tags.is_empty()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Trains for `iterations` passes over `corpus`, then averages the weights.
    pub fn train(&mut self, corpus: &[TaggedSentence<'_>], iterations: usize) {
        let mut tag_set: HashSet<String> = self.tags.iter().cloned().collect();
        for sentence in corpus {
            for (_, tag) in sentence.iter() {
                tag_set.insert(tag.to_string());
            }
        }
        self.tags = tag_set.into_iter().collect();
        self.tags.sort();

        for iteration in 0..iterations {
            let mut correct = 0usize;
            let mut total = 0usize;
            for sentence in corpus {
                let tokens: Vec<Token> = sentence.iter().map(|(word, _)| Token::new(*word, 0)).collect();
                let mut prev = START.to_string();
                let mut prev2 = START2.to_string();

                for (i, (_, gold)) in sentence.iter().enumerate() {
                    let fv = features::token_features(&tokens, i, &prev, &prev2);
                    let guess = self.predict(&fv);
                    if guess != *gold {
                        self.update(&fv, gold, &guess);
                    } else {
                        correct += 1;
                    }
                    total += 1;
                    self.steps += 1;
                    prev2 = std::mem::replace(&mut prev, guess);
                }
            }
            debug!(iteration, correct, total, "perceptron training pass");
        }

        self.average_weights();
    }

    fn predict(&self, fv: &FeatureVector) -> String {
        let mut best_tag = self.tags.first().cloned().unwrap_or_default();
        let mut best_score = f64::NEG_INFINITY;

        for tag in &self.tags {
            let score = self.score(fv, tag);
            if score > best_score {
                best_score = score;
                best_tag = tag.clone();
            }
        }
        best_tag
    }

    fn score(&self, fv: &FeatureVector, tag: &str) -> f64 {
        fv.features
            .iter()
            .filter_map(|f| self.weights.get(f).and_then(|by_tag| by_tag.get(tag)))
            .sum()
    }

    fn update(&mut self, fv: &FeatureVector, gold: &str, guess: &str) {
        for feature in &fv.features {
            self.update_weight(feature, gold, 1.0);
            self.update_weight(feature, guess, -1.0);
        }
    }

    fn update_weight(&mut self, feature: &str, tag: &str, delta: f64) {
        let key = (feature.to_string(), tag.to_string());
        let weight = self.weight(feature, tag);
        let last = self.timestamps.get(&key).copied().unwrap_or(0);

        // Credit the old weight for every step it stayed unchanged.
        *self.totals.entry(key.clone()).or_insert(0.0) += (self.steps - last) as f64 * weight;
        self.timestamps.insert(key, self.steps);

        *self
            .weights
            .entry(feature.to_string())
            .or_default()
            .entry(tag.to_string())
            .or_insert(0.0) += delta;
    }

    fn weight(&self, feature: &str, tag: &str) -> f64 {
        self.weights
            .get(feature)
            .and_then(|by_tag| by_tag.get(tag))
            .copied()
            .unwrap_or(0.0)
    }

    fn average_weights(&mut self) {
        if self.steps == 0 {
            return;
        }
        let steps = self.steps as f64;
        for (feature, by_tag) in self.weights.iter_mut() {
            for (tag, weight) in by_tag.iter_mut() {
                let key = (feature.clone(), tag.clone());
                let last = self.timestamps.get(&key).copied().unwrap_or(0);
                let total = self.totals.get(&key).copied().unwrap_or(0.0)
                    + (self.steps - last) as f64 * *weight;
                *weight = total / steps;
            }
            by_tag.retain(|_, w| *w != 0.0);
        }
        self.weights.retain(|_, by_tag| !by_tag.is_empty());

        self.totals.clear();
        self.timestamps.clear();
        self.steps = 0;
    }

    /// Serializes the trained weights as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Loads weights written by [`PerceptronTagger::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Tagger for PerceptronTagger {
    fn tag(&self, tokens: &mut [Token]) -> std::result::Result<(), BoxError> {
        if !self.is_trained() {
            return Err("perceptron tagger has no trained weights".into());
        }
        let mut prev = START.to_string();
        let mut prev2 = START2.to_string();
        for i in 0..tokens.len() {
            let fv = features::token_features(tokens, i, &prev, &prev2);
            let guess = self.predict(&fv);
            tokens[i].tag = Some(guess.clone());
            prev2 = std::mem::replace(&mut prev, guess);
        }
        Ok(())
    }
}
