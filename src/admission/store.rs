use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Shared key-value store behind the admission counter.
///
/// `incr` must be atomic across every caller sharing the store: it is the
/// only mutation on the accept path.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increment by one, creating the key at 0 if absent. Returns the new value.
    async fn incr(&self, key: &str) -> Result<u64, StoreError>;

    async fn get(&self, key: &str) -> Result<Option<u64>, StoreError>;

    /// Expire `key` after `seconds`. A missing key is not an error.
    async fn expire(&self, key: &str, seconds: u64) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: CounterStore + ?Sized> CounterStore for Arc<S> {
    async fn incr(&self, key: &str) -> Result<u64, StoreError> {
        (**self).incr(key).await
    }

    async fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        (**self).get(key).await
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<(), StoreError> {
        (**self).expire(key, seconds).await
    }
}
