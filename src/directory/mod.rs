//! Read-only access to the target catalog.

pub mod file;
pub mod redis_directory;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::target::Target;

pub use file::JsonFileDirectory;
pub use redis_directory::RedisDirectory;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("Directory fetch timed out after {0:?}")]
    Timeout(Duration),
    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait TargetDirectory: Send + Sync {
    /// The full current target set. May be empty.
    async fn get_all_targets(&self) -> Result<Vec<Target>, DirectoryError>;
}

#[async_trait]
impl<D: TargetDirectory + ?Sized> TargetDirectory for Arc<D> {
    async fn get_all_targets(&self) -> Result<Vec<Target>, DirectoryError> {
        (**self).get_all_targets().await
    }
}

/// Fixed in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    targets: Vec<Target>,
}

impl StaticDirectory {
    pub fn new(targets: Vec<Target>) -> Self {
        Self { targets }
    }
}

#[async_trait]
impl TargetDirectory for StaticDirectory {
    async fn get_all_targets(&self) -> Result<Vec<Target>, DirectoryError> {
        Ok(self.targets.clone())
    }
}
