use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::criteria::{AcceptRules, Criterion};
use crate::types::identifiers::TargetId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("Target {id} has a non-numeric or negative value: {raw}")]
    InvalidValue { id: String, raw: String },
    #[error("Target {0} has no maxAcceptsPerDay")]
    MissingCap(String),
    #[error("Target {id} has an invalid maxAcceptsPerDay: {raw}")]
    InvalidCap { id: String, raw: String },
}

/// Numeric field that may arrive as a JSON number or a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetValue {
    Number(f64),
    Text(String),
}

impl TargetValue {
    /// Finite, non-negative decimal.
    pub fn as_decimal(&self) -> Option<f64> {
        let parsed = match self {
            TargetValue::Number(n) => *n,
            TargetValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        // Adding +0.0 folds -0.0 into 0.0 so the two rank as equal.
        (parsed.is_finite() && parsed >= 0.0).then_some(parsed + 0.0)
    }

    /// Strictly positive integer.
    pub fn as_count(&self) -> Option<u64> {
        let parsed = match self {
            TargetValue::Number(n) => {
                if n.fract() != 0.0 || !n.is_finite() || *n < 1.0 || *n > u64::MAX as f64 {
                    return None;
                }
                *n as u64
            }
            TargetValue::Text(s) => s.trim().parse::<u64>().ok()?,
        };
        (parsed > 0).then_some(parsed)
    }
}

impl std::fmt::Display for TargetValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetValue::Number(n) => write!(f, "{n}"),
            TargetValue::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<f64> for TargetValue {
    fn from(value: f64) -> Self {
        TargetValue::Number(value)
    }
}

impl From<u64> for TargetValue {
    fn from(value: u64) -> Self {
        TargetValue::Number(value as f64)
    }
}

impl From<&str> for TargetValue {
    fn from(value: &str) -> Self {
        TargetValue::Text(value.to_string())
    }
}

/// A routing destination as held by the target directory.
///
/// Read-only to the router. `value` and `max_accepts_per_day` are kept in
/// their stored form and validated on use, so one malformed record can be
/// skipped without failing the whole catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub id: TargetId,
    pub url: String,
    pub value: TargetValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_accepts_per_day: Option<TargetValue>,
    #[serde(default)]
    pub accept: AcceptRules,
}

impl Target {
    pub fn new(
        id: TargetId,
        url: impl Into<String>,
        value: impl Into<TargetValue>,
        max_accepts_per_day: u64,
    ) -> Self {
        Target {
            id,
            url: url.into(),
            value: value.into(),
            max_accepts_per_day: Some(max_accepts_per_day.into()),
            accept: AcceptRules::default(),
        }
    }

    pub fn with_geo_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accept.geo_state = Criterion::from_values(states);
        self
    }

    pub fn with_hours<I, S>(mut self, hours: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accept.hour = Criterion::from_values(hours);
        self
    }

    pub fn decimal_value(&self) -> Result<f64, TargetError> {
        self.value.as_decimal().ok_or_else(|| TargetError::InvalidValue {
            id: self.id.to_string(),
            raw: self.value.to_string(),
        })
    }

    /// A missing cap is a configuration error, never "unlimited".
    pub fn daily_cap(&self) -> Result<u64, TargetError> {
        let raw = self
            .max_accepts_per_day
            .as_ref()
            .ok_or_else(|| TargetError::MissingCap(self.id.to_string()))?;
        raw.as_count().ok_or_else(|| TargetError::InvalidCap {
            id: self.id.to_string(),
            raw: raw.to_string(),
        })
    }
}
