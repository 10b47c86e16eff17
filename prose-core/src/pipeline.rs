//! # Pipeline
//!
//! The orchestrator that turns text plus options into a [`Document`].
//!
//! Construction runs in two strict phases:
//!
//! 1. **Configuration**: every [`DocOption`] is folded, in call order, over a
//!    fresh default [`Configuration`]. The model is resolved (the installed one,
//!    or a default sized to the requested stages) and validated against the
//!    stages that will run.
//! 2. **Execution**: enabled stages run in fixed dependency order:
//!    segmentation, tokenization, tagging, extraction.
//!
//! Tagging and extraction operate on whatever tokenization produced. If the
//! tokenizer was disabled they see an empty token sequence; they never switch
//! tokenization back on.
//!
//! A failing stage aborts the whole call with [`Error::Stage`]; no partially
//! built document is ever returned.

use rayon::prelude::*;
use tracing::{debug, debug_span};

use crate::config::{Configuration, DocOption};
use crate::document::Document;
use crate::error::{BoxError, Error, Result, Stage};
use crate::extract::{chunk, Extractor};
use crate::model::Model;
use crate::tagger::Tagger;
use crate::tokenizer::reindex;

/// Builds a document from `text`, applying `options` in order.
pub fn construct(text: &str, options: impl IntoIterator<Item = DocOption>) -> Result<Document> {
    let span = debug_span!("construct", bytes = text.len());
    let _enter = span.enter();

    execute(text, Configuration::resolve_owned(options))
}

fn stage_error(stage: Stage) -> impl FnOnce(BoxError) -> Error {
    move |source| Error::Stage { stage, source }
}

fn execute(text: &str, config: Configuration) -> Result<Document> {
    let model = match &config.model {
        Some(model) => model.clone(),
        None => Model::default_for(config.tag, config.extract),
    };

    let tagger: Option<&dyn Tagger> = if config.tag {
        Some(model.tagger().ok_or_else(|| {
            Error::Configuration(format!("tagging requested but model '{}' has no tagger", model.name()))
        })?)
    } else {
        None
    };
    let extractor: Option<&dyn Extractor> = if config.extract {
        Some(model.extractor().ok_or_else(|| {
            Error::Configuration(format!(
                "extraction requested but model '{}' has no extractor",
                model.name()
            ))
        })?)
    } else {
        None
    };
    debug!(
        model = model.name(),
        segment = config.segment,
        tokenize = config.tokenizer.is_some(),
        tag = config.tag,
        extract = config.extract,
        "configuration resolved"
    );

    let sentences = if config.segment {
        let sentences = config
            .segmenter
            .segment(text)
            .map_err(stage_error(Stage::Segmentation))?;
        debug!(sentences = sentences.len(), "segmentation done");
        sentences
    } else {
        Vec::new()
    };

    let mut tokens = match &config.tokenizer {
        Some(tokenizer) => tokenizer.tokenize(text).map_err(stage_error(Stage::Tokenization))?,
        None => Vec::new(),
    };
    reindex(&mut tokens);
    debug!(tokens = tokens.len(), "tokenization done");

    if let Some(tagger) = tagger {
        tagger.tag(&mut tokens).map_err(stage_error(Stage::Tagging))?;
        debug!(tokens = tokens.len(), "tagging done");
    }

    let entities = match extractor {
        Some(extractor) => {
            extractor.classify(&mut tokens).map_err(stage_error(Stage::Extraction))?;
            let entities = chunk(&tokens, text);
            debug!(entities = entities.len(), "extraction done");
            entities
        }
        None => Vec::new(),
    };

    Ok(Document::assemble(text, model, sentences, tokens, entities))
}

/// A reusable pipeline holding base options.
///
/// Base options are applied first on every run, so options passed to
/// [`Pipeline::run_with`] override them.
///
/// ```rust
/// use prose_core::{with_extraction, with_segmentation, Pipeline};
///
/// let pipeline = Pipeline::with_options([with_extraction(true)]);
/// let doc = pipeline.run_with("Google hired John.", [with_segmentation(false)]).unwrap();
/// assert!(doc.sentences().is_empty());
/// assert_eq!(doc.entities().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: Vec<DocOption>,
}

impl Pipeline {
    /// A pipeline with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: impl IntoIterator<Item = DocOption>) -> Self {
        Self {
            options: options.into_iter().collect(),
        }
    }

    /// Appends a base option.
    pub fn option(mut self, option: DocOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn options(&self) -> &[DocOption] {
        &self.options
    }

    pub fn run(&self, text: &str) -> Result<Document> {
        construct(text, self.options.iter().cloned())
    }

    /// Runs with `extra` options applied after the base options.
    pub fn run_with(&self, text: &str, extra: impl IntoIterator<Item = DocOption>) -> Result<Document> {
        construct(text, self.options.iter().cloned().chain(extra))
    }

    /// Builds one document per text in parallel. Results keep input order and
    /// a failure for one text does not affect the others.
    pub fn run_batch<S>(&self, texts: &[S]) -> Vec<Result<Document>>
    where
        S: AsRef<str> + Sync,
    {
        texts.par_iter().map(|text| self.run(text.as_ref())).collect()
    }
}
