//! # Error types
//!
//! Every failure of a construction call surfaces as an [`Error`]. Collaborators
//! (segmenters, tokenizers, taggers, extractors) report their own failures as a
//! [`BoxError`]; the pipeline wraps it with the [`Stage`] that failed.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type returned by collaborator implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A pipeline stage, used to tell the caller which collaborator failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Segmentation,
    Tokenization,
    Tagging,
    Extraction,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Segmentation => "segmentation",
            Stage::Tokenization => "tokenization",
            Stage::Tagging => "tagging",
            Stage::Extraction => "extraction",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error type for document construction
#[derive(Debug, Error)]
pub enum Error {
    /// The options (or the model they install) form an invalid combination
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A collaborator failed while running its stage
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: BoxError,
    },

    /// Tagger weights could not be read or written
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// The failing stage, if this error came from a collaborator.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result type for document construction
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_error_names_the_stage() {
        let err = Error::Stage {
            stage: Stage::Tagging,
            source: "weights missing".into(),
        };
        assert_eq!(err.to_string(), "tagging stage failed: weights missing");
        assert_eq!(err.stage(), Some(Stage::Tagging));
    }

    #[test]
    fn test_configuration_error_has_no_stage() {
        let err = Error::Configuration("no tagger".into());
        assert!(err.stage().is_none());
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
