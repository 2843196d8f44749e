//! Generic single-owner actor plumbing.
//!
//! State lives inside exactly one Tokio task. Callers talk to it through a
//! cloneable [`ResourceClient`], and every request carries a `oneshot`
//! responder. Because the owning task handles one request at a time, a
//! request handler is a transaction: nothing else can observe or mutate the
//! state while it runs.
//!
//! # Main Components
//!
//! - [`ActorState`] - Trait for the state owned by an actor and the requests it accepts
//! - [`ResourceActor`] - The server half; runs the message loop
//! - [`ResourceClient`] - The client half; sends a request and awaits its response
//! - [`FrameworkError`] - Channel-level failures (actor gone, responder dropped)
//!
//! # Testing
//!
//! See [`mock`] for helpers that intercept requests without the real state.

pub mod actor;
pub mod client;
pub mod error;
pub mod message;
pub mod mock;
pub mod state;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use error::FrameworkError;
pub use message::Response;
pub use state::ActorState;
