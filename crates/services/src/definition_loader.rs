use std::path::Path;

use quiz_core::model::QuizDefinition;

use crate::error::DefinitionLoadError;

/// Read and validate a quiz definition stored as JSON.
///
/// # Errors
///
/// Returns `DefinitionLoadError::Read` if the file cannot be read,
/// `DefinitionLoadError::Parse` if it is not a definition document, and
/// `DefinitionLoadError::Invalid` if the content breaks a structural rule.
pub async fn load_definition(path: &Path) -> Result<QuizDefinition, DefinitionLoadError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| DefinitionLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let definition: QuizDefinition = serde_json::from_slice(&bytes)?;
    definition.validate()?;
    tracing::debug!(path = %path.display(), "loaded quiz definition");
    Ok(definition)
}
