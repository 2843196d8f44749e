//! Requests understood by the ledger actor.
//!
//! Each variant is one transaction. Handlers check every precondition
//! before writing anything, so an `Err` answer means nothing changed.

use crate::error::RoutingError;
use crate::framework::Response;
use crate::model::{
    DeliveryRoute, DriverId, Order, OrderId, OrderStatus, RouteId, RouteStop, StopId, StopStatus,
};
use chrono::{DateTime, Utc};

/// Responder carrying a routing result.
pub type Reply<T> = Response<T, RoutingError>;

#[derive(Debug)]
pub enum StoreRequest {
    // --- orders ---
    InsertOrders {
        orders: Vec<Order>,
        respond_to: Reply<usize>,
    },
    GetOrder {
        id: OrderId,
        respond_to: Reply<Option<Order>>,
    },
    FindPendingOrdersBefore {
        cutoff: DateTime<Utc>,
        respond_to: Reply<Vec<Order>>,
    },
    UpdateOrderStatus {
        id: OrderId,
        status: OrderStatus,
        respond_to: Reply<()>,
    },

    // --- routes ---
    /// Route row, stop rows, stop-order links and the out_for_delivery
    /// transition of every referenced order, all or nothing.
    CreateRoute {
        route: Box<DeliveryRoute>,
        respond_to: Reply<()>,
    },
    GetRoute {
        id: RouteId,
        respond_to: Reply<Option<DeliveryRoute>>,
    },
    IsDriverOnActiveRoute {
        driver_id: DriverId,
        respond_to: Reply<bool>,
    },
    /// Conditional update: takes the oldest pending route only if it is
    /// still pending and the driver is still idle when the request runs.
    ClaimOldestPendingRoute {
        driver_id: DriverId,
        respond_to: Reply<Option<DeliveryRoute>>,
    },
    FindActiveRouteByDriver {
        driver_id: DriverId,
        respond_to: Reply<Option<DeliveryRoute>>,
    },
    FindRouteByStop {
        stop_id: StopId,
        respond_to: Reply<Option<DeliveryRoute>>,
    },
    /// Stop status plus the mirrored status of every order on the stop.
    UpdateStopStatus {
        stop_id: StopId,
        status: StopStatus,
        respond_to: Reply<RouteStop>,
    },
    /// Completes the route if no stop is still open. Answers whether the
    /// route is completed afterwards.
    CheckAndCompleteRoute {
        route_id: RouteId,
        respond_to: Reply<bool>,
    },
    FindInProgressRouteIds {
        respond_to: Reply<Vec<RouteId>>,
    },
}
