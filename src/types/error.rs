use serde::Serialize;
use thiserror::Error;

use crate::admission::StoreError;
use crate::directory::DirectoryError;

/// Failures that abort a routing attempt.
///
/// A full cap is not an error: it is a normal rejection by one target.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Target directory unavailable")]
    DirectoryUnavailable(#[source] DirectoryError),

    #[error("Counter store unavailable")]
    StoreUnavailable(#[source] StoreError),
}

/// The only error detail callers are meant to surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DirectoryUnavailable,
    StoreUnavailable,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DirectoryUnavailable => "directory_unavailable",
            ErrorKind::StoreUnavailable => "store_unavailable",
        }
    }
}

impl RouteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouteError::DirectoryUnavailable(_) => ErrorKind::DirectoryUnavailable,
            RouteError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
        }
    }
}

impl From<DirectoryError> for RouteError {
    fn from(err: DirectoryError) -> Self {
        RouteError::DirectoryUnavailable(err)
    }
}

impl From<StoreError> for RouteError {
    fn from(err: StoreError) -> Self {
        RouteError::StoreUnavailable(err)
    }
}
