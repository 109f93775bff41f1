use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{DirectoryError, TargetDirectory};
use crate::target::Target;

/// Catalog stored as a JSON array of targets, re-read on every fetch so
/// edits to the file are picked up without a restart.
#[derive(Debug, Clone)]
pub struct JsonFileDirectory {
    path: PathBuf,
}

impl JsonFileDirectory {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TargetDirectory for JsonFileDirectory {
    async fn get_all_targets(&self) -> Result<Vec<Target>, DirectoryError> {
        let raw = tokio::fs::read(&self.path).await?;
        let targets: Vec<Target> = serde_json::from_slice(&raw)?;
        Ok(targets)
    }
}
