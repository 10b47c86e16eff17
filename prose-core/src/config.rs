//! # Document options
//!
//! Construction is configured by an ordered list of [`DocOption`] patches.
//! Each patch changes exactly one setting of a [`Configuration`], and
//! [`Configuration::apply`] folds them in call order:
//!
//! - patches on different settings commute;
//! - patches on the same setting are last-write-wins.
//!
//! Options are applied before any stage runs; the pipeline only reads the
//! fully resolved configuration.
//!
//! ## Example
//!
//! ```rust
//! use prose_core::config::{with_tagging, without_tokenizer, Configuration};
//!
//! let config = Configuration::resolve(&[with_tagging(false), without_tokenizer()]);
//! assert!(!config.tag);
//! assert!(config.tokenizer.is_none());
//! assert!(config.segment);
//! ```

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::trace;

use crate::model::Model;
use crate::segmenter::{RuleSegmenter, Segmenter};
use crate::tokenizer::{IterTokenizer, Tokenizer};

fn iter_tokenizer() -> Arc<dyn Tokenizer> {
    Arc::new(IterTokenizer)
}

fn rule_segmenter() -> Arc<dyn Segmenter> {
    Arc::new(RuleSegmenter)
}

// Stateless, so one shared instance serves every configuration.
static DEFAULT_TOKENIZER: Lazy<Arc<dyn Tokenizer>> = Lazy::new(iter_tokenizer);
static DEFAULT_SEGMENTER: Lazy<Arc<dyn Segmenter>> = Lazy::new(rule_segmenter);

/// The resolved settings of one construction call.
///
/// Equality compares flags by value and collaborators by identity.
#[derive(Clone)]
pub struct Configuration {
    /// Run sentence segmentation.
    pub segment: bool,
    /// Run part-of-speech tagging.
    pub tag: bool,
    /// Run entity extraction.
    pub extract: bool,
    /// Tokenizer to run; `None` disables tokenization.
    pub tokenizer: Option<Arc<dyn Tokenizer>>,
    /// Segmenter to run when `segment` is set.
    pub segmenter: Arc<dyn Segmenter>,
    /// Model installed by the caller; `None` selects a default model.
    pub model: Option<Arc<Model>>,
}

impl Default for Configuration {
    /// Segmentation and tagging on, extraction off, the default tokenizer and
    /// segmenter, no model. Each call returns a new value.
    fn default() -> Self {
        Self {
            segment: true,
            tag: true,
            extract: false,
            tokenizer: Some(Arc::clone(&DEFAULT_TOKENIZER)),
            segmenter: Arc::clone(&DEFAULT_SEGMENTER),
            model: None,
        }
    }
}

impl Configuration {
    /// Applies one option, returning the updated configuration.
    pub fn apply(mut self, option: &DocOption) -> Self {
        trace!(?option, "applying document option");
        match option {
            DocOption::Tokenizer(tokenizer) => self.tokenizer = tokenizer.clone(),
            DocOption::Tokenization(false) => self.tokenizer = None,
            DocOption::Tokenization(true) => {
                if self.tokenizer.is_none() {
                    self.tokenizer = Some(Arc::clone(&DEFAULT_TOKENIZER));
                }
            }
            DocOption::Tagging(on) => self.tag = *on,
            DocOption::Segmentation(on) => self.segment = *on,
            DocOption::Segmenter(segmenter) => self.segmenter = Arc::clone(segmenter),
            DocOption::Extraction(on) => self.extract = *on,
            DocOption::Model(model) => self.model = Some(Arc::clone(model)),
        }
        self
    }

    /// Folds borrowed `options` in order over the default configuration.
    pub fn resolve<'a>(options: impl IntoIterator<Item = &'a DocOption>) -> Self {
        Self::resolve_owned(options.into_iter().cloned())
    }

    /// Folds `options` in order over the default configuration.
    pub fn resolve_owned(options: impl IntoIterator<Item = DocOption>) -> Self {
        options
            .into_iter()
            .fold(Self::default(), |config, option| config.apply(&option))
    }
}

fn same<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.segment == other.segment
            && self.tag == other.tag
            && self.extract == other.extract
            && same(&self.tokenizer, &other.tokenizer)
            && Arc::ptr_eq(&self.segmenter, &other.segmenter)
            && same(&self.model, &other.model)
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("segment", &self.segment)
            .field("tag", &self.tag)
            .field("extract", &self.extract)
            .field("tokenizer", &self.tokenizer.is_some())
            .field("model", &self.model.as_ref().map(|m| m.name()))
            .finish()
    }
}

/// A single configuration patch.
#[derive(Clone)]
pub enum DocOption {
    /// Install a tokenizer, or disable tokenization (and everything
    /// downstream of it) with `None`.
    Tokenizer(Option<Arc<dyn Tokenizer>>),
    /// Legacy toggle: `false` removes the tokenizer, `true` installs the
    /// default one unless a tokenizer is already set.
    Tokenization(bool),
    /// Toggle part-of-speech tagging. Never touches the tokenizer.
    Tagging(bool),
    /// Toggle sentence segmentation.
    Segmentation(bool),
    /// Replace the segmenter.
    Segmenter(Arc<dyn Segmenter>),
    /// Toggle entity extraction.
    Extraction(bool),
    /// Install the model, bypassing default-model selection.
    Model(Arc<Model>),
}

impl fmt::Debug for DocOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocOption::Tokenizer(t) => write!(f, "Tokenizer({})", if t.is_some() { "Some" } else { "None" }),
            DocOption::Tokenization(on) => write!(f, "Tokenization({on})"),
            DocOption::Tagging(on) => write!(f, "Tagging({on})"),
            DocOption::Segmentation(on) => write!(f, "Segmentation({on})"),
            DocOption::Segmenter(_) => f.write_str("Segmenter(..)"),
            DocOption::Extraction(on) => write!(f, "Extraction({on})"),
            DocOption::Model(m) => write!(f, "Model({})", m.name()),
        }
    }
}

/// Uses `tokenizer` for the tokenization stage.
pub fn using_tokenizer(tokenizer: impl Tokenizer + 'static) -> DocOption {
    DocOption::Tokenizer(Some(Arc::new(tokenizer)))
}

/// Disables tokenization; tagging and extraction then see no tokens.
pub fn without_tokenizer() -> DocOption {
    DocOption::Tokenizer(None)
}

/// Enables (the default) or disables tokenization.
#[deprecated(note = "use `using_tokenizer` or `without_tokenizer`")]
pub fn with_tokenization(include: bool) -> DocOption {
    DocOption::Tokenization(include)
}

/// Enables (the default) or disables part-of-speech tagging.
pub fn with_tagging(include: bool) -> DocOption {
    DocOption::Tagging(include)
}

/// Enables (the default) or disables sentence segmentation.
pub fn with_segmentation(include: bool) -> DocOption {
    DocOption::Segmentation(include)
}

/// Uses `segmenter` for the segmentation stage.
pub fn using_segmenter(segmenter: impl Segmenter + 'static) -> DocOption {
    DocOption::Segmenter(Arc::new(segmenter))
}

/// Enables or disables (the default) named-entity extraction.
pub fn with_extraction(include: bool) -> DocOption {
    DocOption::Extraction(include)
}

/// Installs `model` on the document.
pub fn using_model(model: impl Into<Arc<Model>>) -> DocOption {
    DocOption::Model(model.into())
}
