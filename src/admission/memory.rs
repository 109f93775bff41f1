use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::clock::{Clock, SystemClock};
use super::store::{CounterStore, StoreError};

#[derive(Debug, Clone, Copy)]
struct Entry {
    count: u64,
    expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// Single-process counter store. Expiry is applied lazily against the
/// injected clock, so a [`ManualClock`](super::ManualClock) can step it past
/// midnight.
#[derive(Debug)]
pub struct MemoryCounterStore<C = SystemClock> {
    entries: Mutex<HashMap<String, Entry>>,
    clock: C,
}

impl MemoryCounterStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MemoryCounterStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MemoryCounterStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Remaining time to live in whole seconds, `None` if missing or persistent.
    pub async fn ttl(&self, key: &str) -> Option<u64> {
        let now = self.clock.now();
        let entries = self.entries.lock().await;
        let entry = entries.get(key).filter(|e| e.is_live(now))?;
        let remaining = entry.expires_at? - now;
        Some(remaining.num_seconds().max(0) as u64)
    }

    /// Number of live keys.
    pub async fn len(&self) -> usize {
        let now = self.clock.now();
        let entries = self.entries.lock().await;
        entries.values().filter(|e| e.is_live(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl<C: Clock> CounterStore for MemoryCounterStore<C> {
    async fn incr(&self, key: &str) -> Result<u64, StoreError> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;
        // Daily keys are never touched again once their day ends.
        entries.retain(|_, e| e.is_live(now));
        let entry = entries.entry(key.to_string()).or_insert(Entry {
            count: 0,
            expires_at: None,
        });
        entry.count += 1;
        Ok(entry.count)
    }

    async fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.count)),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<(), StoreError> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;
        let Some(entry) = entries.get_mut(key) else {
            return Ok(());
        };
        if !entry.is_live(now) {
            entries.remove(key);
            return Ok(());
        }
        // Past chrono's range the key simply never expires.
        entry.expires_at = i64::try_from(seconds)
            .ok()
            .and_then(chrono::TimeDelta::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl));
        Ok(())
    }
}
