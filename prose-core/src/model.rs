//! # Models
//!
//! A [`Model`] bundles the collaborators that need trained data: an optional
//! part-of-speech [`Tagger`] and an optional entity [`Extractor`]. Models are
//! immutable once built and are shared by `Arc` across any number of documents
//! and threads.
//!
//! When the caller does not install a model, the pipeline asks
//! [`Model::default_for`] for one that carries only what the requested stages
//! need, so a document built without tagging never loads tagger data.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::extract::{Extractor, GazetteerExtractor};
use crate::tagger::{LexiconTagger, Tagger};

fn default_tagger() -> Arc<dyn Tagger> {
    Arc::new(LexiconTagger::english())
}

fn default_extractor() -> Arc<dyn Extractor> {
    Arc::new(GazetteerExtractor::english())
}

// Built on first use, then shared read-only.
static DEFAULT_TAGGER: Lazy<Arc<dyn Tagger>> = Lazy::new(default_tagger);
static DEFAULT_EXTRACTOR: Lazy<Arc<dyn Extractor>> = Lazy::new(default_extractor);

/// A named bundle of a tagger and an entity extractor.
///
/// ```rust
/// use prose_core::model::Model;
/// use prose_core::tagger::LexiconTagger;
///
/// let model = Model::new("lexicon-only").with_tagger(LexiconTagger::english());
/// assert!(model.tagger().is_some());
/// assert!(model.extractor().is_none());
/// ```
#[derive(Clone)]
pub struct Model {
    name: String,
    tagger: Option<Arc<dyn Tagger>>,
    extractor: Option<Arc<dyn Extractor>>,
}

impl Model {
    /// An empty model: no tagger, no extractor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tagger: None,
            extractor: None,
        }
    }

    pub fn with_tagger(mut self, tagger: impl Tagger + 'static) -> Self {
        self.tagger = Some(Arc::new(tagger));
        self
    }

    /// Installs a tagger that is already shared elsewhere.
    pub fn with_shared_tagger(mut self, tagger: Arc<dyn Tagger>) -> Self {
        self.tagger = Some(tagger);
        self
    }

    pub fn with_extractor(mut self, extractor: impl Extractor + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    /// Installs an extractor that is already shared elsewhere.
    pub fn with_shared_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tagger(&self) -> Option<&dyn Tagger> {
        self.tagger.as_deref()
    }

    pub fn extractor(&self) -> Option<&dyn Extractor> {
        self.extractor.as_deref()
    }

    /// The model used when the caller installs none.
    ///
    /// The lexicon tagger is attached only if `tagging` is requested and the
    /// gazetteer extractor only if `extracting` is. Each call returns a new
    /// `Model`; the collaborators inside are built once per process and shared.
    pub fn default_for(tagging: bool, extracting: bool) -> Arc<Model> {
        let mut model = Model::new(match (tagging, extracting) {
            (true, true) => "default",
            (true, false) => "default-tagger",
            (false, true) => "default-extractor",
            (false, false) => "default-empty",
        });
        if tagging {
            model.tagger = Some(Arc::clone(&DEFAULT_TAGGER));
        }
        if extracting {
            model.extractor = Some(Arc::clone(&DEFAULT_EXTRACTOR));
        }
        Arc::new(model)
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("tagger", &self.tagger.is_some())
            .field("extractor", &self.extractor.is_some())
            .finish()
    }
}
