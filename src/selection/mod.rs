//! Eligibility filtering and value ranking.
//!
//! Pure: no I/O, and the only notion of time is the visitor's own timestamp.

pub mod eligibility;
pub mod ranking;

pub use eligibility::is_eligible;
pub use ranking::{rank, RankedTarget, Ranking};
