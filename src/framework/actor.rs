//! # Generic Actor Server
//!
//! `ResourceActor` is the server half of the pair. It owns the state and the
//! receiving end of the channel, and processes requests strictly one after
//! another.

use super::client::ResourceClient;
use super::state::ActorState;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// The actor that exclusively owns a piece of state.
///
/// **Concurrency Model**:
/// Many clients may send at once, but the loop in [`ResourceActor::run`]
/// dequeues one request, lets the state handle it completely, and only then
/// looks at the next one. The state therefore needs no `Mutex`, and a
/// check-then-write inside one handler can never interleave with another
/// request.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new(buffer, state)` returns the actor and its client.
/// 2.  **Run**: spawn `actor.run()` on the runtime.
/// 3.  **Use**: clone the client into whichever tasks need it.
/// 4.  **Stop**: drop every client; `run` returns the final state.
pub struct ResourceActor<S: ActorState> {
    receiver: mpsc::Receiver<S::Request>,
    state: S,
}

impl<S: ActorState> ResourceActor<S> {
    /// Creates a new actor around `state` and its associated client.
    ///
    /// `buffer_size` is the channel capacity. When it is full, client calls
    /// wait for room.
    pub fn new(buffer_size: usize, state: S) -> (Self, ResourceClient<S>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self { receiver, state };
        (actor, ResourceClient::new(sender))
    }

    /// Runs the message loop until every client has been dropped, then
    /// hands the final state back.
    pub async fn run(mut self) -> S {
        let state_type = S::label();
        info!(state_type, size = self.state.size(), "Actor started");

        while let Some(request) = self.receiver.recv().await {
            debug!(state_type, ?request, "Request");
            self.state.handle(request);
        }

        info!(state_type, size = self.state.size(), "Shutdown");
        self.state
    }
}
