use serde::{Deserialize, Serialize};

/// The routing outcome handed back to the caller.
///
/// Serializes as `{"decision":"accept","url":"..."}` or `{"decision":"reject"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum RoutingDecision {
    Accept { url: String },
    Reject,
}

impl RoutingDecision {
    pub fn is_accept(&self) -> bool {
        matches!(self, RoutingDecision::Accept { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            RoutingDecision::Accept { url } => Some(url),
            RoutingDecision::Reject => None,
        }
    }
}

/// One call to the admission counter made while routing a visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionAttempt {
    pub target_id: String,
    pub value: f64,
    pub cap: u64,
    /// Counter value right after the increment.
    pub count: u64,
    pub admitted: bool,
}

/// Explanation of how a decision was reached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteTrace {
    pub targets_considered: usize,
    pub targets_eligible: usize,
    pub targets_invalid: usize,

    /// In rank order. Empty when nothing was eligible.
    pub attempts: Vec<AdmissionAttempt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOutcome {
    #[serde(flatten)]
    pub decision: RoutingDecision,
    pub trace: RouteTrace,
}
