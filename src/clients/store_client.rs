use crate::error::RoutingError;
use crate::framework::ResourceClient;
use crate::model::{
    DeliveryRoute, DriverId, Order, OrderId, OrderStatus, RouteId, RouteStop, StopId, StopStatus,
};
use crate::repository::{OrderRepository, RouteRepository};
use crate::store::{LedgerState, StoreRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

/// Client for the ledger actor.
///
/// Cheap to clone. Every method is one request, so every method is one
/// transaction.
#[derive(Clone)]
pub struct StoreClient {
    inner: ResourceClient<LedgerState>,
}

impl StoreClient {
    pub fn new(inner: ResourceClient<LedgerState>) -> Self {
        Self { inner }
    }

    /// Seeds orders. Fails with `Conflict` on a duplicate id, inserting none.
    #[instrument(skip(self, orders), fields(count = orders.len()))]
    pub async fn insert_orders(&self, orders: Vec<Order>) -> Result<usize, RoutingError> {
        debug!("Sending request");
        self.inner
            .ask(|respond_to| StoreRequest::InsertOrders { orders, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, RoutingError> {
        let id = id.clone();
        self.inner
            .ask(|respond_to| StoreRequest::GetOrder { id, respond_to })
            .await
    }

    #[instrument(skip(self), fields(route_id = %id))]
    pub async fn get_route(&self, id: RouteId) -> Result<Option<DeliveryRoute>, RoutingError> {
        self.inner
            .ask(|respond_to| StoreRequest::GetRoute { id, respond_to })
            .await
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

#[async_trait]
impl RouteRepository for StoreClient {
    #[instrument(skip(self, route), fields(route_id = %route.id, stops = route.stops.len()))]
    async fn create_route(&self, route: DeliveryRoute) -> Result<(), RoutingError> {
        debug!("Sending request");
        let route = Box::new(route);
        self.inner
            .ask(|respond_to| StoreRequest::CreateRoute { route, respond_to })
            .await
    }

    #[instrument(skip(self))]
    async fn is_driver_on_active_route(&self, driver_id: &DriverId) -> Result<bool, RoutingError> {
        let driver_id = driver_id.clone();
        self.inner
            .ask(|respond_to| StoreRequest::IsDriverOnActiveRoute {
                driver_id,
                respond_to,
            })
            .await
    }

    #[instrument(skip(self))]
    async fn claim_oldest_pending_route(
        &self,
        driver_id: &DriverId,
    ) -> Result<Option<DeliveryRoute>, RoutingError> {
        debug!("Sending request");
        let driver_id = driver_id.clone();
        self.inner
            .ask(|respond_to| StoreRequest::ClaimOldestPendingRoute {
                driver_id,
                respond_to,
            })
            .await
    }

    #[instrument(skip(self))]
    async fn find_active_route_by_driver(
        &self,
        driver_id: &DriverId,
    ) -> Result<Option<DeliveryRoute>, RoutingError> {
        let driver_id = driver_id.clone();
        self.inner
            .ask(|respond_to| StoreRequest::FindActiveRouteByDriver {
                driver_id,
                respond_to,
            })
            .await
    }

    #[instrument(skip(self), fields(stop_id = %stop_id))]
    async fn find_route_by_stop(&self, stop_id: StopId) -> Result<Option<DeliveryRoute>, RoutingError> {
        self.inner
            .ask(|respond_to| StoreRequest::FindRouteByStop {
                stop_id,
                respond_to,
            })
            .await
    }

    #[instrument(skip(self), fields(stop_id = %stop_id, %status))]
    async fn update_stop_status(
        &self,
        stop_id: StopId,
        status: StopStatus,
    ) -> Result<RouteStop, RoutingError> {
        debug!("Sending request");
        self.inner
            .ask(|respond_to| StoreRequest::UpdateStopStatus {
                stop_id,
                status,
                respond_to,
            })
            .await
    }

    #[instrument(skip(self), fields(route_id = %route_id))]
    async fn check_and_complete_route(&self, route_id: RouteId) -> Result<bool, RoutingError> {
        self.inner
            .ask(|respond_to| StoreRequest::CheckAndCompleteRoute {
                route_id,
                respond_to,
            })
            .await
    }

    #[instrument(skip(self))]
    async fn find_in_progress_route_ids(&self) -> Result<Vec<RouteId>, RoutingError> {
        self.inner
            .ask(|respond_to| StoreRequest::FindInProgressRouteIds { respond_to })
            .await
    }
}

#[async_trait]
impl OrderRepository for StoreClient {
    #[instrument(skip(self))]
    async fn find_pending_orders_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Order>, RoutingError> {
        self.inner
            .ask(|respond_to| StoreRequest::FindPendingOrdersBefore { cutoff, respond_to })
            .await
    }

    #[instrument(skip(self))]
    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), RoutingError> {
        let id = id.clone();
        self.inner
            .ask(|respond_to| StoreRequest::UpdateOrderStatus {
                id,
                status,
                respond_to,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, next_request};

    #[tokio::test]
    async fn test_claim_sends_driver_and_relays_answer() {
        let (client, mut receiver) = create_mock_client::<LedgerState>(8);
        let store = StoreClient::new(client);

        let call = tokio::spawn(async move {
            store
                .claim_oldest_pending_route(&DriverId::from("driver-7"))
                .await
        });

        match next_request::<LedgerState>(&mut receiver).await {
            Some(StoreRequest::ClaimOldestPendingRoute {
                driver_id,
                respond_to,
            }) => {
                assert_eq!(driver_id, DriverId::from("driver-7"));
                let _ = respond_to.send(Ok(None));
            }
            other => panic!("unexpected request: {other:?}"),
        }

        assert_eq!(call.await.unwrap(), Ok(None));
    }

    #[tokio::test]
    async fn test_closed_store_is_unexpected() {
        let (client, receiver) = create_mock_client::<LedgerState>(8);
        drop(receiver);
        let store = StoreClient::new(client);

        let result = store
            .insert_orders(vec![Order::new("o1", "A", Utc::now())])
            .await;
        assert!(matches!(result, Err(RoutingError::Unexpected(_))));
        assert!(store.is_closed());
    }
}
