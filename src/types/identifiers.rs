use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetId(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetIdError {
    #[error("Target id must not be empty")]
    Empty,
    #[error("Target id must not contain whitespace: {0:?}")]
    Whitespace(String),
}

impl TargetId {
    pub fn new(id: impl Into<String>) -> Result<Self, TargetIdError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TargetIdError::Empty);
        }
        if id.chars().any(char::is_whitespace) {
            return Err(TargetIdError::Whitespace(id));
        }
        Ok(TargetId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TargetId {
    type Error = TargetIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TargetId::new(value)
    }
}

impl From<TargetId> for String {
    fn from(id: TargetId) -> Self {
        id.0
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store key of one target's admission counter for one UTC day.
///
/// Format: `{prefix}:{target_id}:{YYYY-MM-DD}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DailyKey(String);

impl DailyKey {
    pub fn new(prefix: &str, target: &TargetId, date: NaiveDate) -> Self {
        DailyKey(format!(
            "{prefix}:{}:{}",
            target.as_str(),
            date.format("%Y-%m-%d")
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DailyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
