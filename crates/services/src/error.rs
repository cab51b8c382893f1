//! Shared error types for the services crate.

use std::path::PathBuf;

use quiz_core::model::DefinitionError;
use thiserror::Error;

/// Errors emitted while loading a quiz definition from disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DefinitionLoadError {
    #[error("failed to read quiz definition {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("quiz definition is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] DefinitionError),
}
