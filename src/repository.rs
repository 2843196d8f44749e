//! Capability traits the routing engine is written against.
//!
//! [`StoreClient`](crate::clients::StoreClient) implements both for the
//! in-memory ledger. Tests substitute their own implementations to inject
//! failures.

use crate::error::RoutingError;
use crate::model::{DeliveryRoute, DriverId, Order, OrderId, OrderStatus, RouteId, RouteStop, StopId, StopStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Routes and stops. Each write method is a single transaction.
#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// Writes the route, its stops and their order links, and moves every
    /// referenced order to out_for_delivery. All or nothing.
    async fn create_route(&self, route: DeliveryRoute) -> Result<(), RoutingError>;

    async fn is_driver_on_active_route(&self, driver_id: &DriverId) -> Result<bool, RoutingError>;

    /// Atomically assigns the oldest pending route to an idle driver.
    ///
    /// `Ok(None)` when no route is pending. `Conflict` if the driver
    /// became busy in the meantime.
    async fn claim_oldest_pending_route(
        &self,
        driver_id: &DriverId,
    ) -> Result<Option<DeliveryRoute>, RoutingError>;

    async fn find_active_route_by_driver(
        &self,
        driver_id: &DriverId,
    ) -> Result<Option<DeliveryRoute>, RoutingError>;

    async fn find_route_by_stop(&self, stop_id: StopId) -> Result<Option<DeliveryRoute>, RoutingError>;

    /// Settles a stop and mirrors the outcome onto its orders.
    async fn update_stop_status(
        &self,
        stop_id: StopId,
        status: StopStatus,
    ) -> Result<RouteStop, RoutingError>;

    /// Completes the route when none of its stops is open.
    async fn check_and_complete_route(&self, route_id: RouteId) -> Result<bool, RoutingError>;

    async fn find_in_progress_route_ids(&self) -> Result<Vec<RouteId>, RoutingError>;
}

/// The order system, as far as routing needs it.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_pending_orders_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Order>, RoutingError>;

    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), RoutingError>;
}

#[async_trait]
impl<T: RouteRepository + ?Sized> RouteRepository for Arc<T> {
    async fn create_route(&self, route: DeliveryRoute) -> Result<(), RoutingError> {
        (**self).create_route(route).await
    }

    async fn is_driver_on_active_route(&self, driver_id: &DriverId) -> Result<bool, RoutingError> {
        (**self).is_driver_on_active_route(driver_id).await
    }

    async fn claim_oldest_pending_route(
        &self,
        driver_id: &DriverId,
    ) -> Result<Option<DeliveryRoute>, RoutingError> {
        (**self).claim_oldest_pending_route(driver_id).await
    }

    async fn find_active_route_by_driver(
        &self,
        driver_id: &DriverId,
    ) -> Result<Option<DeliveryRoute>, RoutingError> {
        (**self).find_active_route_by_driver(driver_id).await
    }

    async fn find_route_by_stop(&self, stop_id: StopId) -> Result<Option<DeliveryRoute>, RoutingError> {
        (**self).find_route_by_stop(stop_id).await
    }

    async fn update_stop_status(
        &self,
        stop_id: StopId,
        status: StopStatus,
    ) -> Result<RouteStop, RoutingError> {
        (**self).update_stop_status(stop_id, status).await
    }

    async fn check_and_complete_route(&self, route_id: RouteId) -> Result<bool, RoutingError> {
        (**self).check_and_complete_route(route_id).await
    }

    async fn find_in_progress_route_ids(&self) -> Result<Vec<RouteId>, RoutingError> {
        (**self).find_in_progress_route_ids().await
    }
}

#[async_trait]
impl<T: OrderRepository + ?Sized> OrderRepository for Arc<T> {
    async fn find_pending_orders_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Order>, RoutingError> {
        (**self).find_pending_orders_before(cutoff).await
    }

    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), RoutingError> {
        (**self).update_order_status(id, status).await
    }
}
