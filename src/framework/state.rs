//! # ActorState Trait
//!
//! The contract for anything owned by a [`ResourceActor`](super::ResourceActor).
//!
//! The state declares the request enum it understands. Each request variant
//! carries its own typed [`Response`](super::Response) sender, so the
//! compiler ties every request to the exact result type its caller awaits.

use std::fmt::Debug;

/// State owned by a single actor task.
///
/// `handle` is synchronous and runs to completion before the next request is
/// dequeued, so each request is atomic with respect to every other request.
pub trait ActorState: Send + 'static {
    /// The request enum accepted by this state.
    type Request: Send + Debug + 'static;

    /// Apply one request and answer through the responder it carries.
    fn handle(&mut self, request: Self::Request);

    /// Number of records held, reported in lifecycle logs.
    fn size(&self) -> usize;

    /// Short label for log lines, e.g. `LedgerState`.
    fn label() -> &'static str {
        std::any::type_name::<Self>()
            .split("::")
            .last()
            .unwrap_or("Unknown")
    }
}
