use std::path::PathBuf;

/// Result of looking up a photo or audio file by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asset {
    Found(PathBuf),
    /// File not uploaded yet; `fallback` tells the player what belongs here.
    Missing { file_name: String, fallback: String },
}

/// Filesystem lookup for the quiz's fixed asset names.
///
/// Only the presentation layer queries this; a missing asset never affects the
/// quiz flow.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `file_name` under the asset root.
    pub async fn lookup(&self, file_name: &str) -> Asset {
        let path = self.root.join(file_name);
        match tokio::fs::try_exists(&path).await {
            Ok(true) => Asset::Found(path),
            Ok(false) => Asset::Missing {
                file_name: file_name.to_owned(),
                fallback: fallback_message(file_name),
            },
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "asset lookup failed");
                Asset::Missing {
                    file_name: file_name.to_owned(),
                    fallback: fallback_message(file_name),
                }
            }
        }
    }
}

fn fallback_message(file_name: &str) -> String {
    format!("📷 Carica la foto: `{file_name}`")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn finds_present_files_and_explains_missing_ones() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("foto_step6.jpeg"), b"jpeg").unwrap();
        let assets = AssetStore::new(dir.path());

        assert_eq!(
            assets.lookup("foto_step6.jpeg").await,
            Asset::Found(dir.path().join("foto_step6.jpeg"))
        );

        match assets.lookup("foto_step8.jpeg").await {
            Asset::Missing {
                file_name,
                fallback,
            } => {
                assert_eq!(file_name, "foto_step8.jpeg");
                assert!(fallback.contains("foto_step8.jpeg"));
            }
            Asset::Found(path) => panic!("unexpected asset at {}", path.display()),
        }
    }
}
