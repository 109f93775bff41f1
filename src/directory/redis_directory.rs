use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::warn;

use super::{DirectoryError, TargetDirectory};
use crate::target::Target;

const SCAN_BATCH: usize = 200;

/// Targets stored as JSON strings under `{prefix}:{id}`.
///
/// Keys are collected with `SCAN` (never `KEYS`) and fetched with one
/// `MGET`. Records are returned in key order. A record that fails to parse
/// is skipped with a warning rather than failing the whole catalog.
#[derive(Clone)]
pub struct RedisDirectory {
    manager: ConnectionManager,
    key_prefix: String,
}

impl RedisDirectory {
    pub async fn connect(url: &str, key_prefix: impl Into<String>) -> Result<Self, DirectoryError> {
        let client = Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self::from_manager(manager, key_prefix))
    }

    pub fn from_manager(manager: ConnectionManager, key_prefix: impl Into<String>) -> Self {
        Self {
            manager,
            key_prefix: key_prefix.into(),
        }
    }

    async fn scan_keys(&self, conn: &mut ConnectionManager) -> Result<Vec<String>, DirectoryError> {
        let pattern = format!("{}:*", self.key_prefix);
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut *conn)
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        // SCAN may repeat keys and has no stable order.
        keys.sort();
        keys.dedup();
        Ok(keys)
    }
}

#[async_trait]
impl TargetDirectory for RedisDirectory {
    async fn get_all_targets(&self) -> Result<Vec<Target>, DirectoryError> {
        let mut conn = self.manager.clone();
        let keys = self.scan_keys(&mut conn).await?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<Option<String>> = conn.mget(&keys).await?;

        let mut targets = Vec::with_capacity(records.len());
        for (key, record) in keys.iter().zip(records) {
            // Deleted between SCAN and MGET.
            let Some(json) = record else { continue };
            match serde_json::from_str::<Target>(&json) {
                Ok(target) => targets.push(target),
                Err(err) => warn!(key = %key, error = %err, "skipping unparseable target record"),
            }
        }
        Ok(targets)
    }
}
