use crate::clients::StoreClient;
use crate::config::{RoutingConfig, StoreConfig};
use crate::error::RoutingError;
use crate::geocoder::Geocoder;
use crate::routing::RoutingService;
use crate::store::LedgerState;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Owns the running store actor.
///
/// # Example
///
/// ```ignore
/// let system = DispatchSystem::start(&config.store);
/// let service = system.routing_service(geocoder, &config.routing);
///
/// let report = service.generate_routes(cutoff).await?;
///
/// drop(service);
/// system.shutdown().await?;
/// ```
pub struct DispatchSystem {
    /// Client for the ledger actor
    pub store: StoreClient,

    handle: JoinHandle<LedgerState>,
}

impl DispatchSystem {
    /// Spawns the ledger actor on the current runtime.
    pub fn start(config: &StoreConfig) -> Self {
        let (actor, store) = crate::store::new(config.channel_capacity);
        let handle = tokio::spawn(actor.run());
        Self { store, handle }
    }

    /// A routing engine backed by this system's store.
    pub fn routing_service<G: Geocoder>(
        &self,
        geocoder: G,
        settings: &RoutingConfig,
    ) -> RoutingService<StoreClient, StoreClient, G> {
        RoutingService::new(self.store.clone(), self.store.clone(), geocoder, settings)
    }

    /// Closes the store channel and waits for the actor to drain.
    ///
    /// Every other clone of the store client (including those inside a
    /// [`RoutingService`]) must be dropped first, otherwise this waits for
    /// them.
    pub async fn shutdown(self) -> Result<LedgerState, RoutingError> {
        info!("Shutting down system...");
        drop(self.store);

        match self.handle.await {
            Ok(state) => {
                info!("System shutdown complete.");
                Ok(state)
            }
            Err(e) => {
                error!(error = %e, "Store task failed");
                Err(RoutingError::Unexpected(format!("store task failed: {e}")))
            }
        }
    }
}
