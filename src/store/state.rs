//! The ledger: every route, stop and order record, owned by one task.

use super::request::StoreRequest;
use crate::error::RoutingError;
use crate::framework::ActorState;
use crate::model::{
    DeliveryRoute, DriverId, Order, OrderId, OrderStatus, RouteId, RouteStatus, RouteStop, StopId,
    StopStatus,
};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

#[derive(Debug)]
struct StoredRoute {
    /// Insertion order, breaks ties between routes created in the same instant.
    seq: u64,
    route: DeliveryRoute,
}

#[derive(Debug, Default)]
pub struct LedgerState {
    routes: HashMap<RouteId, StoredRoute>,
    stop_index: HashMap<StopId, RouteId>,
    orders: HashMap<OrderId, Order>,
    next_seq: u64,
}

impl ActorState for LedgerState {
    type Request = StoreRequest;

    fn handle(&mut self, request: StoreRequest) {
        match request {
            StoreRequest::InsertOrders { orders, respond_to } => {
                let _ = respond_to.send(self.insert_orders(orders));
            }
            StoreRequest::GetOrder { id, respond_to } => {
                let _ = respond_to.send(Ok(self.orders.get(&id).cloned()));
            }
            StoreRequest::FindPendingOrdersBefore { cutoff, respond_to } => {
                let _ = respond_to.send(Ok(self.find_pending_orders_before(cutoff)));
            }
            StoreRequest::UpdateOrderStatus {
                id,
                status,
                respond_to,
            } => {
                let _ = respond_to.send(self.update_order_status(&id, status));
            }
            StoreRequest::CreateRoute { route, respond_to } => {
                let _ = respond_to.send(self.create_route(*route));
            }
            StoreRequest::GetRoute { id, respond_to } => {
                let route = self.routes.get(&id).map(|stored| stored.route.clone());
                let _ = respond_to.send(Ok(route));
            }
            StoreRequest::IsDriverOnActiveRoute {
                driver_id,
                respond_to,
            } => {
                let active = self.active_route_of(&driver_id).is_some();
                let _ = respond_to.send(Ok(active));
            }
            StoreRequest::ClaimOldestPendingRoute {
                driver_id,
                respond_to,
            } => {
                let _ = respond_to.send(self.claim_oldest_pending_route(driver_id));
            }
            StoreRequest::FindActiveRouteByDriver {
                driver_id,
                respond_to,
            } => {
                let route = self.active_route_of(&driver_id).cloned();
                let _ = respond_to.send(Ok(route));
            }
            StoreRequest::FindRouteByStop {
                stop_id,
                respond_to,
            } => {
                let route = self
                    .stop_index
                    .get(&stop_id)
                    .and_then(|route_id| self.routes.get(route_id))
                    .map(|stored| stored.route.clone());
                let _ = respond_to.send(Ok(route));
            }
            StoreRequest::UpdateStopStatus {
                stop_id,
                status,
                respond_to,
            } => {
                let _ = respond_to.send(self.update_stop_status(stop_id, status));
            }
            StoreRequest::CheckAndCompleteRoute {
                route_id,
                respond_to,
            } => {
                let _ = respond_to.send(self.check_and_complete_route(route_id));
            }
            StoreRequest::FindInProgressRouteIds { respond_to } => {
                let mut ids: Vec<_> = self
                    .routes
                    .values()
                    .filter(|stored| stored.route.status == RouteStatus::InProgress)
                    .map(|stored| (stored.seq, stored.route.id))
                    .collect();
                ids.sort();
                let _ = respond_to.send(Ok(ids.into_iter().map(|(_, id)| id).collect()));
            }
        }
    }

    fn size(&self) -> usize {
        self.routes.len() + self.orders.len()
    }
}

impl LedgerState {
    fn insert_orders(&mut self, orders: Vec<Order>) -> Result<usize, RoutingError> {
        let mut seen = HashSet::new();
        for order in &orders {
            if self.orders.contains_key(&order.id) || !seen.insert(&order.id) {
                return Err(RoutingError::Conflict(format!(
                    "order {} already exists",
                    order.id
                )));
            }
        }

        let count = orders.len();
        for order in orders {
            self.orders.insert(order.id.clone(), order);
        }
        debug!(count, total = self.orders.len(), "Orders inserted");
        Ok(count)
    }

    fn find_pending_orders_before(&self, cutoff: DateTime<Utc>) -> Vec<Order> {
        let mut pending: Vec<Order> = self
            .orders
            .values()
            .filter(|o| o.status == OrderStatus::AwaitingShipment && o.created_at < cutoff)
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        pending
    }

    fn update_order_status(&mut self, id: &OrderId, status: OrderStatus) -> Result<(), RoutingError> {
        let order = self
            .orders
            .get_mut(id)
            .ok_or_else(|| RoutingError::NotFound(format!("order {id} not found")))?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(())
    }

    fn create_route(&mut self, route: DeliveryRoute) -> Result<(), RoutingError> {
        if route.stops.is_empty() {
            return Err(RoutingError::Validation(format!("route {} has no stops", route.id)));
        }
        if route.status != RouteStatus::Pending || route.driver_id.is_some() {
            return Err(RoutingError::Validation(format!(
                "route {} must be created pending and unassigned",
                route.id
            )));
        }
        if self.routes.contains_key(&route.id) {
            return Err(RoutingError::Conflict(format!("route {} already exists", route.id)));
        }

        let mut stop_ids = HashSet::new();
        let mut order_ids = HashSet::new();
        for (expected, stop) in (1u32..).zip(&route.stops) {
            if stop.sequence != expected {
                return Err(RoutingError::Validation(format!(
                    "route {} stop sequence must be contiguous from 1, found {} at position {}",
                    route.id, stop.sequence, expected
                )));
            }
            if stop.route_id != route.id {
                return Err(RoutingError::Validation(format!(
                    "stop {} belongs to route {}",
                    stop.id, stop.route_id
                )));
            }
            if self.stop_index.contains_key(&stop.id) || !stop_ids.insert(stop.id) {
                return Err(RoutingError::Conflict(format!("stop {} already exists", stop.id)));
            }
            if stop.status != StopStatus::Pending {
                return Err(RoutingError::Validation(format!(
                    "stop {} must be created pending, found {}",
                    stop.id, stop.status
                )));
            }
            if stop.order_ids.is_empty() {
                return Err(RoutingError::Validation(format!("stop {} has no orders", stop.id)));
            }
            // An order settles through exactly one stop.
            if let Some(duplicate) = stop.order_ids.iter().find(|id| !order_ids.insert(*id)) {
                return Err(RoutingError::Validation(format!(
                    "order {duplicate} is linked to more than one stop of route {}",
                    route.id
                )));
            }
        }

        for order_id in route.order_ids() {
            let order = self
                .orders
                .get(order_id)
                .ok_or_else(|| RoutingError::NotFound(format!("order {order_id} not found")))?;
            if order.status != OrderStatus::AwaitingShipment {
                return Err(RoutingError::Conflict(format!(
                    "order {order_id} is {} and cannot be routed",
                    order.status
                )));
            }
        }

        // Every check passed; from here on nothing can fail.
        let now = Utc::now();
        for order_id in route.order_ids() {
            if let Some(order) = self.orders.get_mut(order_id) {
                order.status = OrderStatus::OutForDelivery;
                order.updated_at = now;
            }
        }
        for stop in &route.stops {
            self.stop_index.insert(stop.id, route.id);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        info!(route_id = %route.id, stops = route.stops.len(), "Route stored");
        self.routes.insert(route.id, StoredRoute { seq, route });
        Ok(())
    }

    fn active_route_of(&self, driver_id: &DriverId) -> Option<&DeliveryRoute> {
        self.routes
            .values()
            .map(|stored| &stored.route)
            .find(|route| route.status == RouteStatus::InProgress && route.is_assigned_to(driver_id))
    }

    fn claim_oldest_pending_route(
        &mut self,
        driver_id: DriverId,
    ) -> Result<Option<DeliveryRoute>, RoutingError> {
        if let Some(active) = self.active_route_of(&driver_id) {
            return Err(RoutingError::Conflict(format!(
                "driver {driver_id} is already on active route {}",
                active.id
            )));
        }

        let Some(stored) = self
            .routes
            .values_mut()
            .filter(|stored| stored.route.status == RouteStatus::Pending)
            .min_by_key(|stored| (stored.route.created_at, stored.seq))
        else {
            return Ok(None);
        };

        let route = &mut stored.route;
        route.status = RouteStatus::InProgress;
        route.driver_id = Some(driver_id);
        route.updated_at = Utc::now();
        info!(route_id = %route.id, driver_id = ?route.driver_id, "Route claimed");
        Ok(Some(route.clone()))
    }

    fn update_stop_status(
        &mut self,
        stop_id: StopId,
        status: StopStatus,
    ) -> Result<RouteStop, RoutingError> {
        let outcome = status.order_outcome().ok_or_else(|| {
            RoutingError::Validation(format!("stop status cannot be set to {status}"))
        })?;

        let route_id = *self
            .stop_index
            .get(&stop_id)
            .ok_or_else(|| RoutingError::NotFound(format!("stop {stop_id} not found")))?;
        let stored = self
            .routes
            .get_mut(&route_id)
            .ok_or_else(|| RoutingError::Unexpected(format!("route {route_id} missing for stop {stop_id}")))?;
        let route = &mut stored.route;

        if route.status != RouteStatus::InProgress {
            return Err(RoutingError::Conflict(format!(
                "route {route_id} is {}, stops can only change while in progress",
                route.status
            )));
        }

        let stop = route
            .stop_mut(stop_id)
            .ok_or_else(|| RoutingError::Unexpected(format!("stop {stop_id} missing from route {route_id}")))?;
        if stop.status.is_terminal() {
            return Err(RoutingError::Conflict(format!(
                "stop {stop_id} is already {}",
                stop.status
            )));
        }
        if let Some(missing) = stop.order_ids.iter().find(|id| !self.orders.contains_key(*id)) {
            return Err(RoutingError::Unexpected(format!(
                "order {missing} linked to stop {stop_id} is missing"
            )));
        }

        let now = Utc::now();
        stop.status = status;
        stop.updated_at = now;
        for order_id in &stop.order_ids {
            if let Some(order) = self.orders.get_mut(order_id) {
                order.status = outcome;
                order.updated_at = now;
                if status == StopStatus::Failed {
                    order.delivery_attempts += 1;
                }
            }
        }
        let updated = stop.clone();
        route.updated_at = now;

        info!(%stop_id, %route_id, %status, orders = updated.order_ids.len(), "Stop settled");
        Ok(updated)
    }

    fn check_and_complete_route(&mut self, route_id: RouteId) -> Result<bool, RoutingError> {
        let stored = self
            .routes
            .get_mut(&route_id)
            .ok_or_else(|| RoutingError::NotFound(format!("route {route_id} not found")))?;
        let route = &mut stored.route;

        if route.status == RouteStatus::Completed {
            return Ok(true);
        }

        let open = route.open_stop_count();
        if open > 0 || !route.status.can_transition_to(RouteStatus::Completed) {
            debug!(%route_id, open, status = %route.status, "Route not complete");
            return Ok(false);
        }

        route.status = RouteStatus::Completed;
        route.updated_at = Utc::now();
        info!(%route_id, "Route completed");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinates, DeliveryPoint};
    use chrono::Duration;

    fn seeded(orders: &[(&str, &str)]) -> LedgerState {
        let mut ledger = LedgerState::default();
        let created = Utc::now() - Duration::hours(3);
        ledger
            .insert_orders(
                orders
                    .iter()
                    .map(|(id, address)| Order::new(*id, *address, created))
                    .collect(),
            )
            .unwrap();
        ledger
    }

    fn route_for(groups: Vec<(&str, Vec<&str>)>) -> DeliveryRoute {
        let points = groups
            .into_iter()
            .enumerate()
            .map(|(i, (address, orders))| DeliveryPoint {
                address: address.to_string(),
                order_ids: orders.iter().map(|o| OrderId::from(*o)).collect(),
                coordinates: Coordinates::new(i as f64, i as f64),
            })
            .collect();
        DeliveryRoute::from_sequence(points, Utc::now())
    }

    #[test]
    fn test_create_route_moves_orders_out_for_delivery() {
        let mut ledger = seeded(&[("o1", "A"), ("o2", "A"), ("o3", "B")]);
        let route = route_for(vec![("A", vec!["o1", "o2"]), ("B", vec!["o3"])]);
        let route_id = route.id;

        ledger.create_route(route).unwrap();

        assert_eq!(ledger.routes[&route_id].route.stops.len(), 2);
        for id in ["o1", "o2", "o3"] {
            assert_eq!(ledger.orders[&OrderId::from(id)].status, OrderStatus::OutForDelivery);
        }
    }

    #[test]
    fn test_create_route_is_all_or_nothing() {
        let mut ledger = seeded(&[("o1", "A"), ("o2", "B")]);
        ledger
            .update_order_status(&OrderId::from("o2"), OrderStatus::Delivered)
            .unwrap();
        let route = route_for(vec![("A", vec!["o1"]), ("B", vec!["o2"])]);
        let route_id = route.id;

        let result = ledger.create_route(route);

        assert!(matches!(result, Err(RoutingError::Conflict(_))));
        assert!(!ledger.routes.contains_key(&route_id));
        assert!(ledger.stop_index.is_empty());
        assert_eq!(
            ledger.orders[&OrderId::from("o1")].status,
            OrderStatus::AwaitingShipment
        );
    }

    #[test]
    fn test_create_route_rejects_order_on_two_stops() {
        let mut ledger = seeded(&[("o1", "A"), ("o2", "B")]);
        let route = route_for(vec![("A", vec!["o1"]), ("B", vec!["o2", "o1"])]);
        let route_id = route.id;

        let result = ledger.create_route(route);

        assert!(matches!(result, Err(RoutingError::Validation(_))));
        assert!(!ledger.routes.contains_key(&route_id));
        assert!(ledger.stop_index.is_empty());
        for id in ["o1", "o2"] {
            assert_eq!(
                ledger.orders[&OrderId::from(id)].status,
                OrderStatus::AwaitingShipment
            );
        }
    }

    #[test]
    fn test_create_route_rejects_settled_or_empty_stops() {
        let mut ledger = seeded(&[("o1", "A"), ("o2", "B")]);

        let mut settled = route_for(vec![("A", vec!["o1"]), ("B", vec!["o2"])]);
        settled.stops[1].status = StopStatus::Delivered;
        assert!(matches!(ledger.create_route(settled), Err(RoutingError::Validation(_))));

        let empty = route_for(vec![("A", vec!["o1"]), ("B", vec![])]);
        assert!(matches!(ledger.create_route(empty), Err(RoutingError::Validation(_))));

        assert!(ledger.routes.is_empty());
        assert_eq!(
            ledger.orders[&OrderId::from("o1")].status,
            OrderStatus::AwaitingShipment
        );
    }

    #[test]
    fn test_create_route_rejects_unknown_order() {
        let mut ledger = seeded(&[("o1", "A")]);
        let route = route_for(vec![("A", vec!["o1", "ghost"])]);
        assert!(matches!(ledger.create_route(route), Err(RoutingError::NotFound(_))));
        assert_eq!(
            ledger.orders[&OrderId::from("o1")].status,
            OrderStatus::AwaitingShipment
        );
    }

    #[test]
    fn test_claim_picks_oldest_pending_route() {
        let mut ledger = seeded(&[("o1", "A"), ("o2", "B")]);
        let mut older = route_for(vec![("A", vec!["o1"])]);
        older.created_at = Utc::now() - Duration::minutes(10);
        let older_id = older.id;
        let newer = route_for(vec![("B", vec!["o2"])]);
        ledger.create_route(newer).unwrap();
        ledger.create_route(older).unwrap();

        let claimed = ledger
            .claim_oldest_pending_route(DriverId::from("d1"))
            .unwrap()
            .unwrap();

        assert_eq!(claimed.id, older_id);
        assert_eq!(claimed.status, RouteStatus::InProgress);
        assert_eq!(claimed.driver_id, Some(DriverId::from("d1")));
    }

    #[test]
    fn test_claim_rejects_busy_driver_and_reports_empty_queue() {
        let mut ledger = seeded(&[("o1", "A")]);
        ledger.create_route(route_for(vec![("A", vec!["o1"])])).unwrap();

        let driver = DriverId::from("d1");
        assert!(ledger.claim_oldest_pending_route(driver.clone()).unwrap().is_some());
        assert!(matches!(
            ledger.claim_oldest_pending_route(driver),
            Err(RoutingError::Conflict(_))
        ));
        assert!(ledger
            .claim_oldest_pending_route(DriverId::from("d2"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_stop_update_cascades_and_guards_terminal_stops() {
        let mut ledger = seeded(&[("o1", "A"), ("o2", "A")]);
        let route = route_for(vec![("A", vec!["o1", "o2"])]);
        let stop_id = route.stops[0].id;
        ledger.create_route(route).unwrap();
        ledger.claim_oldest_pending_route(DriverId::from("d1")).unwrap();

        let stop = ledger.update_stop_status(stop_id, StopStatus::Failed).unwrap();
        assert_eq!(stop.status, StopStatus::Failed);
        for id in ["o1", "o2"] {
            let order = &ledger.orders[&OrderId::from(id)];
            assert_eq!(order.status, OrderStatus::DeliveryFailed);
            assert_eq!(order.delivery_attempts, 1);
        }

        let again = ledger.update_stop_status(stop_id, StopStatus::Delivered);
        assert!(matches!(again, Err(RoutingError::Conflict(_))));
        assert_eq!(
            ledger.orders[&OrderId::from("o1")].status,
            OrderStatus::DeliveryFailed
        );
    }

    #[test]
    fn test_stop_update_requires_route_in_progress() {
        let mut ledger = seeded(&[("o1", "A")]);
        let route = route_for(vec![("A", vec!["o1"])]);
        let stop_id = route.stops[0].id;
        ledger.create_route(route).unwrap();

        let result = ledger.update_stop_status(stop_id, StopStatus::Delivered);
        assert!(matches!(result, Err(RoutingError::Conflict(_))));
    }

    #[test]
    fn test_completion_check_only_completes_fully_settled_routes() {
        let mut ledger = seeded(&[("o1", "A"), ("o2", "B")]);
        let route = route_for(vec![("A", vec!["o1"]), ("B", vec!["o2"])]);
        let (route_id, first, second) = (route.id, route.stops[0].id, route.stops[1].id);
        ledger.create_route(route).unwrap();
        ledger.claim_oldest_pending_route(DriverId::from("d1")).unwrap();

        ledger.update_stop_status(first, StopStatus::Delivered).unwrap();
        assert!(!ledger.check_and_complete_route(route_id).unwrap());
        assert_eq!(ledger.routes[&route_id].route.status, RouteStatus::InProgress);

        ledger.update_stop_status(second, StopStatus::Failed).unwrap();
        assert!(ledger.check_and_complete_route(route_id).unwrap());
        assert_eq!(ledger.routes[&route_id].route.status, RouteStatus::Completed);

        // Idempotent
        assert!(ledger.check_and_complete_route(route_id).unwrap());
    }

    #[test]
    fn test_pending_orders_respect_cutoff() {
        let mut ledger = LedgerState::default();
        let now = Utc::now();
        ledger
            .insert_orders(vec![
                Order::new("early", "A", now - Duration::hours(2)),
                Order::new("late", "B", now + Duration::hours(2)),
            ])
            .unwrap();

        let pending = ledger.find_pending_orders_before(now);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, OrderId::from("early"));
    }
}
