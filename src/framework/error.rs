//! # Framework Errors
//!
//! Failures of the channel plumbing itself. Domain errors travel inside the
//! response payload instead; these only say the actor could not be reached.

/// Errors that can occur within the actor framework itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
}
