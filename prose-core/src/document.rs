//! # Document
//!
//! The immutable result of running the pipeline over one text. A `Document`
//! has no mutation API: accessors hand out copies, so callers can never change
//! the sentences, tokens or entities a document holds.

use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::config::DocOption;
use crate::error::Result;
use crate::extract::Entity;
use crate::model::Model;
use crate::pipeline;
use crate::segmenter::Sentence;
use crate::tokenizer::Token;

/// A parsed body of text.
///
/// ```rust
/// use prose_core::{with_tagging, Document};
///
/// let doc = Document::new("Dr. Smith went home. He slept.", [with_tagging(false)]).unwrap();
/// assert_eq!(doc.sentences().len(), 2);
/// assert!(doc.tokens().iter().all(|t| t.tag.is_none()));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    text: String,
    #[serde(serialize_with = "serialize_model_name")]
    model: Arc<Model>,
    sentences: Vec<Sentence>,
    tokens: Vec<Token>,
    entities: Vec<Entity>,
}

fn serialize_model_name<S: Serializer>(model: &Arc<Model>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(model.name())
}

impl Document {
    /// Builds a document from `text`, applying `options` in order.
    ///
    /// This is the only way to construct a document. Empty text is valid and
    /// yields empty sentences and tokens.
    pub fn new(text: &str, options: impl IntoIterator<Item = DocOption>) -> Result<Self> {
        pipeline::construct(text, options)
    }

    pub(crate) fn assemble(
        text: &str,
        model: Arc<Model>,
        sentences: Vec<Sentence>,
        tokens: Vec<Token>,
        entities: Vec<Entity>,
    ) -> Self {
        Self {
            text: text.to_string(),
            model,
            sentences,
            tokens,
            entities,
        }
    }

    /// The original input, verbatim.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The model the document was built with.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// A copy of the document's tokens.
    pub fn tokens(&self) -> Vec<Token> {
        self.tokens.clone()
    }

    /// A copy of the document's sentences.
    pub fn sentences(&self) -> Vec<Sentence> {
        self.sentences.clone()
    }

    /// A copy of the document's named entities.
    pub fn entities(&self) -> Vec<Entity> {
        self.entities.clone()
    }
}
