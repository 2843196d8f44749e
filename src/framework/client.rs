//! # Generic Client
//!
//! The client half of an actor pair.

use super::error::FrameworkError;
use super::message::Response;
use super::state::ActorState;
use tokio::sync::{mpsc, oneshot};

/// A cloneable handle for sending requests to a [`ResourceActor`](super::ResourceActor).
///
/// Holds only the channel sender, so cloning is cheap and clones can be
/// moved into as many tasks as needed.
pub struct ResourceClient<S: ActorState> {
    sender: mpsc::Sender<S::Request>,
}

impl<S: ActorState> Clone for ResourceClient<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<S: ActorState> ResourceClient<S> {
    pub fn new(sender: mpsc::Sender<S::Request>) -> Self {
        Self { sender }
    }

    /// Sends the request built by `build` and waits for its answer.
    ///
    /// `build` receives the responder to embed in the request. Channel
    /// failures are converted into the caller's error type.
    pub async fn ask<T, E>(&self, build: impl FnOnce(Response<T, E>) -> S::Request) -> Result<T, E>
    where
        E: From<FrameworkError>,
    {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| E::from(FrameworkError::ActorClosed))?;
        response
            .await
            .map_err(|_| E::from(FrameworkError::ActorDropped))?
    }

    /// True once the actor has stopped receiving.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
