//! # Mock Helpers & Testing Guide
//!
//! Two ways to stand in for a real actor in tests.
//!
//! | Helper | What you get | Use Case |
//! |--------|--------------|----------|
//! | [`create_mock_client`] | A client plus the raw receiver | Assert exactly which requests a caller sends, answer each by hand |
//! | [`spawn_scripted`] | A client backed by a closure | Wrap a real state and override a few requests (error injection) |
//!
//! ## Error Injection
//!
//! Failures that are hard to reach with real state (a store that dies
//! halfway through a batch, a check that times out) are easy with
//! `spawn_scripted`: match the request you want to break, answer it with an
//! error, and forward every other request to a real state.
//!
//! ```rust,ignore
//! let mut ledger = LedgerState::default();
//! let (client, _task) = spawn_scripted::<LedgerState>(16, move |request| match request {
//!     StoreRequest::CheckAndCompleteRoute { respond_to, .. } => {
//!         let _ = respond_to.send(Err(RoutingError::Unexpected("timeout".into())));
//!     }
//!     other => ledger.handle(other),
//! });
//! ```

use super::client::ResourceClient;
use super::state::ActorState;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Creates a client whose requests land on a receiver the test controls.
///
/// Nothing answers automatically. Pull requests with [`next_request`] and
/// answer through the responder inside each one.
pub fn create_mock_client<S: ActorState>(
    buffer_size: usize,
) -> (ResourceClient<S>, mpsc::Receiver<S::Request>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Waits for the next request sent to a mock client.
pub async fn next_request<S: ActorState>(
    receiver: &mut mpsc::Receiver<S::Request>,
) -> Option<S::Request> {
    receiver.recv().await
}

/// Spawns a task that answers every request with `script`.
///
/// The task ends once all clients are dropped.
pub fn spawn_scripted<S: ActorState>(
    buffer_size: usize,
    mut script: impl FnMut(S::Request) + Send + 'static,
) -> (ResourceClient<S>, JoinHandle<()>) {
    let (client, mut receiver) = create_mock_client::<S>(buffer_size);
    let handle = tokio::spawn(async move {
        while let Some(request) = receiver.recv().await {
            script(request);
        }
    });
    (client, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{FrameworkError, Response};

    #[derive(Default)]
    struct Counter {
        value: u32,
    }

    #[derive(Debug)]
    enum CounterRequest {
        Add {
            amount: u32,
            respond_to: Response<u32, CounterError>,
        },
    }

    #[derive(Debug, PartialEq, thiserror::Error)]
    enum CounterError {
        #[error("overflow")]
        Overflow,
        #[error(transparent)]
        Framework(#[from] FrameworkError),
    }

    impl ActorState for Counter {
        type Request = CounterRequest;

        fn handle(&mut self, request: CounterRequest) {
            match request {
                CounterRequest::Add { amount, respond_to } => {
                    let result = self.value.checked_add(amount).ok_or(CounterError::Overflow);
                    if let Ok(value) = result {
                        self.value = value;
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        fn size(&self) -> usize {
            1
        }
    }

    #[tokio::test]
    async fn test_mock_client_receives_request() {
        let (client, mut receiver) = create_mock_client::<Counter>(4);

        let task = tokio::spawn(async move {
            client
                .ask(|respond_to| CounterRequest::Add { amount: 5, respond_to })
                .await
        });

        match next_request::<Counter>(&mut receiver).await {
            Some(CounterRequest::Add { amount, respond_to }) => {
                assert_eq!(amount, 5);
                respond_to.send(Ok(42)).unwrap();
            }
            None => panic!("Expected Add request"),
        }

        assert_eq!(task.await.unwrap(), Ok(42));
    }

    #[tokio::test]
    async fn test_scripted_client_can_inject_errors() {
        let mut real = Counter::default();
        let (client, _handle) = spawn_scripted::<Counter>(4, move |request| match request {
            CounterRequest::Add { amount: 13, respond_to } => {
                let _ = respond_to.send(Err(CounterError::Overflow));
            }
            other => real.handle(other),
        });

        let ok = client
            .ask(|respond_to| CounterRequest::Add { amount: 2, respond_to })
            .await;
        assert_eq!(ok, Ok(2));

        let injected = client
            .ask(|respond_to| CounterRequest::Add { amount: 13, respond_to })
            .await;
        assert_eq!(injected, Err(CounterError::Overflow));
    }

    #[tokio::test]
    async fn test_dropped_responder_surfaces_framework_error() {
        let (client, mut receiver) = create_mock_client::<Counter>(4);

        let task = tokio::spawn(async move {
            client
                .ask(|respond_to| CounterRequest::Add { amount: 1, respond_to })
                .await
        });

        drop(next_request::<Counter>(&mut receiver).await);

        assert_eq!(
            task.await.unwrap(),
            Err(CounterError::Framework(FrameworkError::ActorDropped))
        );
    }

    #[tokio::test]
    async fn test_closed_actor_surfaces_framework_error() {
        let (client, receiver) = create_mock_client::<Counter>(4);
        drop(receiver);

        let result = client
            .ask(|respond_to| CounterRequest::Add { amount: 1, respond_to })
            .await;
        assert_eq!(result, Err(CounterError::Framework(FrameworkError::ActorClosed)));
        assert!(client.is_closed());
    }
}
