//! # prose-core: a configurable NLP document pipeline
//!
//! Turns raw English text into an immutable [`Document`] holding sentences,
//! tokens with part-of-speech tags, and named entities. What runs is chosen
//! per call with a list of [`DocOption`]s.
//!
//! ## Architecture
//!
//! Construction is a linear pipeline. Options are resolved into a
//! [`Configuration`] first, then the enabled stages run in this order:
//!
//! 1.  **Segmentation** ([`segmenter`]): sentence boundaries, with offsets into
//!     the original text.
//! 2.  **Tokenization** ([`tokenizer`]): words and punctuation, with offsets.
//! 3.  **Tagging** ([`tagger`], [`perceptron`]): a Penn Treebank tag per token.
//! 4.  **Extraction** ([`extract`]): BIO labels per token, chunked into
//!     [`Entity`] spans (`PERSON`, `GPE`, `ORG`).
//!
//! The tagger and extractor come from a [`Model`]. When none is installed, a
//! default model is built carrying only what the requested stages need.
//!
//! ## Example
//!
//! ```rust
//! use prose_core::{with_extraction, Document};
//!
//! let doc = Document::new("Barack Obama visited Paris. It rained.", [with_extraction(true)])?;
//!
//! assert_eq!(doc.sentences().len(), 2);
//! for token in doc.tokens() {
//!     println!("{} {}", token.text, token.tag.unwrap_or_default());
//! }
//! let names: Vec<String> = doc.entities().into_iter().map(|e| e.text).collect();
//! assert_eq!(names, ["Barack Obama", "Paris"]);
//! # Ok::<(), prose_core::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`config`]: options and the resolved configuration.
//! - [`pipeline`]: the orchestrator, plus a reusable [`Pipeline`] with batch runs.
//! - [`document`]: the immutable result.
//! - [`model`]: tagger and extractor bundles.
//! - [`features`]: feature extraction for the perceptron tagger.
//! - [`error`]: the crate error type.

pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod features;
pub mod model;
pub mod perceptron;
pub mod pipeline;
pub mod segmenter;
pub mod tagger;
pub mod tokenizer;

#[allow(deprecated)]
pub use config::with_tokenization;
pub use config::{
    using_model, using_segmenter, using_tokenizer, with_extraction, with_segmentation, with_tagging,
    without_tokenizer, Configuration, DocOption,
};
pub use document::Document;
pub use error::{BoxError, Error, Result, Stage};
pub use extract::{Entity, EntityLabel, EntityTag, Extractor, GazetteerExtractor};
pub use model::Model;
pub use perceptron::PerceptronTagger;
pub use pipeline::Pipeline;
pub use segmenter::{RuleSegmenter, Segmenter, Sentence};
pub use tagger::{LexiconTagger, Tagger};
pub use tokenizer::{IterTokenizer, Token, Tokenizer, UnicodeTokenizer};
