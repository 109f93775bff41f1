//! Atomic per-target daily admission counting.

pub mod clock;
pub mod counter;
pub mod memory;
pub mod redis_store;
pub mod store;

pub use clock::{seconds_until_utc_midnight, Clock, ManualClock, SystemClock};
pub use counter::{Admission, AdmissionCounter};
pub use memory::MemoryCounterStore;
pub use redis_store::RedisCounterStore;
pub use store::{CounterStore, StoreError};
