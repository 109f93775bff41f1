use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::clock::{seconds_until_utc_midnight, Clock, SystemClock};
use super::store::{CounterStore, StoreError};
use crate::config::RouterConfig;
use crate::types::identifiers::{DailyKey, TargetId};

/// Result of one admission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub key: DailyKey,
    /// Counter value after this attempt's increment.
    pub count: u64,
    pub admitted: bool,
}

/// Per-target, per-UTC-day admission cap over a shared [`CounterStore`].
///
/// The day is taken from the counter's clock at call time, not from the
/// visitor's timestamp.
pub struct AdmissionCounter<S, C = SystemClock> {
    store: S,
    clock: C,
    key_prefix: String,
    timeout: Duration,
}

impl<S: CounterStore> AdmissionCounter<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: CounterStore, C: Clock> AdmissionCounter<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        let defaults = RouterConfig::v0();
        Self {
            store,
            clock,
            key_prefix: defaults.counter_key_prefix.clone(),
            timeout: defaults.store_timeout(),
        }
    }

    pub fn from_config(store: S, clock: C, config: &RouterConfig) -> Self {
        Self {
            store,
            clock,
            key_prefix: config.counter_key_prefix.clone(),
            timeout: config.store_timeout(),
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn daily_key(&self, target: &TargetId, now: DateTime<Utc>) -> DailyKey {
        DailyKey::new(&self.key_prefix, target, now.date_naive())
    }

    /// `true` iff the visitor is admitted against `max_per_day` for today.
    pub async fn try_accept(
        &self,
        target: &TargetId,
        max_per_day: u64,
    ) -> Result<bool, StoreError> {
        Ok(self.attempt(target, max_per_day).await?.admitted)
    }

    /// Increment first, then decide on the post-increment value.
    ///
    /// Concurrent callers each observe a distinct count, so at most
    /// `max_per_day` of them can see `count <= max_per_day`. A rejected
    /// attempt stays counted; the increment is never rolled back, including
    /// when the caller's future is dropped after it.
    pub async fn attempt(
        &self,
        target: &TargetId,
        max_per_day: u64,
    ) -> Result<Admission, StoreError> {
        let now = self.clock.now();
        let key = self.daily_key(target, now);

        let count = self.bounded(self.store.incr(key.as_str())).await?;

        // Same absolute deadline on every call, so re-setting is a no-op in effect.
        let ttl = seconds_until_utc_midnight(now);
        self.bounded(self.store.expire(key.as_str(), ttl)).await?;

        Ok(Admission {
            key,
            count,
            admitted: count <= max_per_day,
        })
    }

    /// Today's counter without mutating it. Includes over-cap attempts, so
    /// the number admitted is `min(count, cap)`.
    pub async fn count_today(&self, target: &TargetId) -> Result<u64, StoreError> {
        let key = self.daily_key(target, self.clock.now());
        let count = self.bounded(self.store.get(key.as_str())).await?;
        Ok(count.unwrap_or(0))
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))?
    }
}
