#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use visitor_router::admission::{
    AdmissionCounter, CounterStore, ManualClock, MemoryCounterStore, StoreError,
};
use visitor_router::directory::{DirectoryError, StaticDirectory, TargetDirectory};
use visitor_router::target::{Target, TargetId};
use visitor_router::types::Visitor;
use visitor_router::Router;

pub fn at(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
}

pub fn make_id(s: &str) -> TargetId {
    TargetId::new(s).unwrap()
}

pub fn make_target(id: &str, value: f64, cap: u64, geo_states: &[&str], hours: &[&str]) -> Target {
    Target::new(make_id(id), format!("http://{id}.example.com"), value, cap)
        .with_geo_states(geo_states.iter().copied())
        .with_hours(hours.iter().copied())
}

pub fn make_visitor(geo_state: &str, timestamp: &str) -> Visitor {
    Visitor::new(geo_state, at(timestamp))
}

/// Wraps a store and counts every call made through it.
#[derive(Debug, Default)]
pub struct RecordingStore<S> {
    pub inner: S,
    incrs: AtomicUsize,
    gets: AtomicUsize,
    expires: AtomicUsize,
    incr_keys: Mutex<Vec<String>>,
}

impl<S> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            incrs: AtomicUsize::new(0),
            gets: AtomicUsize::new(0),
            expires: AtomicUsize::new(0),
            incr_keys: Mutex::new(Vec::new()),
        }
    }

    pub fn incr_calls(&self) -> usize {
        self.incrs.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn expire_calls(&self) -> usize {
        self.expires.load(Ordering::SeqCst)
    }

    pub fn mutations(&self) -> usize {
        self.incr_calls() + self.expire_calls()
    }

    pub async fn incr_keys(&self) -> Vec<String> {
        self.incr_keys.lock().await.clone()
    }
}

#[async_trait]
impl<S: CounterStore> CounterStore for RecordingStore<S> {
    async fn incr(&self, key: &str) -> Result<u64, StoreError> {
        self.incrs.fetch_add(1, Ordering::SeqCst);
        self.incr_keys.lock().await.push(key.to_string());
        self.inner.incr(key).await
    }

    async fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<(), StoreError> {
        self.expires.fetch_add(1, Ordering::SeqCst);
        self.inner.expire(key, seconds).await
    }
}

/// Fails every call for keys of one target, delegates the rest.
pub struct FailingStore<S> {
    pub inner: S,
    pub failing_target: String,
}

impl<S> FailingStore<S> {
    fn fails(&self, key: &str) -> bool {
        key.split(':').nth(1) == Some(self.failing_target.as_str())
    }
}

#[async_trait]
impl<S: CounterStore> CounterStore for FailingStore<S> {
    async fn incr(&self, key: &str) -> Result<u64, StoreError> {
        if self.fails(key) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        self.inner.incr(key).await
    }

    async fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        if self.fails(key) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        self.inner.get(key).await
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<(), StoreError> {
        if self.fails(key) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        self.inner.expire(key, seconds).await
    }
}

/// Sleeps before every call.
pub struct SlowStore<S> {
    pub inner: S,
    pub delay: Duration,
}

#[async_trait]
impl<S: CounterStore> CounterStore for SlowStore<S> {
    async fn incr(&self, key: &str) -> Result<u64, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.incr(key).await
    }

    async fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(key).await
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<(), StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.expire(key, seconds).await
    }
}

pub struct FailingDirectory;

#[async_trait]
impl TargetDirectory for FailingDirectory {
    async fn get_all_targets(&self) -> Result<Vec<Target>, DirectoryError> {
        Err(DirectoryError::Unavailable("catalog offline".into()))
    }
}

pub struct SlowDirectory {
    pub delay: Duration,
}

#[async_trait]
impl TargetDirectory for SlowDirectory {
    async fn get_all_targets(&self) -> Result<Vec<Target>, DirectoryError> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }
}

pub type TestStore = Arc<RecordingStore<MemoryCounterStore<ManualClock>>>;
pub type TestRouter = Router<StaticDirectory, TestStore, ManualClock>;

/// A router over an in-memory catalog whose counters and clock are both
/// driven by the returned `ManualClock`.
pub fn make_router(targets: Vec<Target>, now: &str) -> (TestRouter, TestStore, ManualClock) {
    let clock = ManualClock::new(at(now));
    let store = Arc::new(RecordingStore::new(MemoryCounterStore::with_clock(clock.clone())));
    let counter = AdmissionCounter::with_clock(store.clone(), clock.clone());
    let router = Router::new(StaticDirectory::new(targets), counter);
    (router, store, clock)
}
