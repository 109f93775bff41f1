//! Value-ranked visitor routing with per-target daily admission caps.
//!
//! `visitor-router` picks at most one target for each incoming visitor:
//! targets are filtered by geo/hour eligibility, ranked by value, and tried
//! in order against an atomic per-target, per-UTC-day counter until one
//! admits the visitor. The counter increments first and decides on the
//! post-increment value, so concurrent requests can never push a target past
//! its cap.

pub mod admission;
pub mod config;
pub mod directory;
pub mod routing;
pub mod selection;
pub mod target;
pub mod types;

pub use config::{ConfigError, RouterConfig};
pub use routing::Router;
