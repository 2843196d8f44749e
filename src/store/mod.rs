//! In-memory transactional persistence for routes, stops and orders.
//!
//! A single [`LedgerState`] is owned by one [`ResourceActor`] task. Every
//! [`StoreRequest`] is handled to completion before the next one is looked
//! at, which is what makes route creation, the driver claim and the stop
//! cascade atomic.

pub mod request;
pub mod state;

pub use request::{Reply, StoreRequest};
pub use state::LedgerState;

use crate::clients::StoreClient;
use crate::framework::ResourceActor;

/// Creates an empty ledger actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<LedgerState>, StoreClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size, LedgerState::default());
    (actor, StoreClient::new(generic_client))
}
