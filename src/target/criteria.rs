use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Exact-membership rule, stored as `{"$in": [...]}`.
///
/// No wildcards or ranges: a code matches only if it is listed verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Criterion {
    #[serde(rename = "$in")]
    values: BTreeSet<String>,
}

impl Criterion {
    pub fn new() -> Self {
        Criterion {
            values: BTreeSet::new(),
        }
    }

    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Criterion {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn insert(&mut self, value: impl Into<String>) {
        self.values.insert(value.into());
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.values.iter()
    }
}

/// Eligibility rules of a target. Both must match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptRules {
    pub geo_state: Criterion,
    pub hour: Criterion,
}
