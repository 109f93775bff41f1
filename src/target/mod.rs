pub mod criteria;
pub mod target;

pub use crate::types::identifiers::TargetId;
pub use criteria::{AcceptRules, Criterion};
pub use target::{Target, TargetError, TargetValue};
