pub mod identifiers;
pub mod visitor;
pub mod decision;
pub mod error;

pub use identifiers::{DailyKey, TargetId, TargetIdError};
pub use visitor::{Visitor, VisitorError};
pub use decision::{AdmissionAttempt, RouteOutcome, RouteTrace, RoutingDecision};
pub use error::{ErrorKind, RouteError};
