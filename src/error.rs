//! Error types for route generation, assignment and stop updates.

use crate::framework::FrameworkError;
use thiserror::Error;

/// Classification a transport layer can map onto its own responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Forbidden,
    Unexpected,
}

/// Errors surfaced by the routing engine and its persistence.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RoutingError {
    /// The caller asked for something malformed, e.g. a stop target status of `pending`.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A route, stop or order does not exist, or no pending route is available.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request collides with current state (driver already busy, stop already settled).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The driver does not own the route the stop belongs to.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Persistence or transport failure.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl RoutingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RoutingError::Validation(_) => ErrorKind::Validation,
            RoutingError::NotFound(_) => ErrorKind::NotFound,
            RoutingError::Conflict(_) => ErrorKind::Conflict,
            RoutingError::Forbidden(_) => ErrorKind::Forbidden,
            RoutingError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}

impl From<FrameworkError> for RoutingError {
    fn from(e: FrameworkError) -> Self {
        RoutingError::Unexpected(format!("store unavailable: {e}"))
    }
}
