//! # Redis Counter Store
//!
//! `INCR` is atomic server-side, which is what makes the increment-then-check
//! admission safe across processes sharing one Redis.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use super::store::{CounterStore, StoreError};

#[derive(Clone)]
pub struct RedisCounterStore {
    manager: ConnectionManager,
}

impl RedisCounterStore {
    /// Open a managed connection.
    ///
    /// # Arguments
    /// * `url` - The redis URL (e.g., "redis://127.0.0.1/").
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self { manager })
    }

    /// Share an existing manager, e.g. with a [`RedisDirectory`](crate::directory::RedisDirectory).
    pub fn from_manager(manager: ConnectionManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn incr(&self, key: &str) -> Result<u64, StoreError> {
        let mut conn = self.manager.clone();
        let count: u64 = conn.incr(key, 1u64).await?;
        Ok(count)
    }

    async fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        let mut conn = self.manager.clone();
        let count: Option<u64> = conn.get(key).await?;
        Ok(count)
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        let secs = i64::try_from(seconds).unwrap_or(i64::MAX);
        let _: bool = conn.expire(key, secs).await?;
        Ok(())
    }
}
