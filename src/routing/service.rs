//! The routing engine: batch route generation, driver assignment and stop
//! outcomes.

use super::aggregate::group_by_address;
use super::cluster::{cluster_points, ClusterParams};
use super::sequence::nearest_neighbor;
use crate::config::RoutingConfig;
use crate::error::RoutingError;
use crate::geocoder::Geocoder;
use crate::model::{DeliveryPoint, DeliveryRoute, DriverId, RouteId, RouteStop, StopId, StopStatus};
use crate::repository::{OrderRepository, RouteRepository};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

/// Outcome counters of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub orders_seen: usize,
    pub unique_addresses: usize,
    pub addresses_skipped: usize,
    pub routes_created: usize,
    pub routes_failed: usize,
    pub orders_routed: usize,
    pub route_ids: Vec<RouteId>,
}

/// Today's cutoff: `now`'s UTC date at `hour`:00. `None` if `hour` is not a valid hour.
pub fn daily_cutoff(now: DateTime<Utc>, hour: u32) -> Option<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
    Some(now.date_naive().and_time(time).and_utc())
}

/// Routing engine over injected collaborators.
///
/// `R` persists routes, `O` is the order system and `G` resolves
/// addresses. Driver identity is always an explicit argument.
pub struct RoutingService<R, O, G> {
    routes: R,
    orders: O,
    geocoder: G,
    clustering: ClusterParams,
}

impl<R, O, G> RoutingService<R, O, G>
where
    R: RouteRepository,
    O: OrderRepository,
    G: Geocoder,
{
    pub fn new(routes: R, orders: O, geocoder: G, settings: &RoutingConfig) -> Self {
        Self {
            routes,
            orders,
            geocoder,
            clustering: ClusterParams {
                capacity: settings.max_stops_per_route,
                max_iterations: settings.kmeans_max_iterations,
                enforce_capacity: settings.enforce_capacity,
            },
        }
    }

    /// Turns every order awaiting shipment created before `cutoff` into
    /// pending routes.
    ///
    /// Only the initial order query can fail the run. Addresses that do not
    /// geocode are skipped and their orders stay eligible for the next run.
    /// Each route is persisted in its own transaction; a failed route is
    /// logged and the remaining routes are still written.
    #[instrument(skip(self))]
    pub async fn generate_routes(&self, cutoff: DateTime<Utc>) -> Result<GenerationReport, RoutingError> {
        let mut report = GenerationReport::default();

        let pending = self.orders.find_pending_orders_before(cutoff).await?;
        report.orders_seen = pending.len();
        if pending.is_empty() {
            info!("No pending orders, nothing to route");
            return Ok(report);
        }

        let addresses = group_by_address(&pending);
        report.unique_addresses = addresses.len();
        info!(orders = pending.len(), addresses = addresses.len(), "Geocoding addresses");

        let mut points: Vec<DeliveryPoint> = Vec::with_capacity(addresses.len());
        for address in addresses {
            match self.geocoder.geocode(&address.address).await {
                Ok(coordinates) => points.push(address.locate(coordinates)),
                Err(e) => {
                    warn!(address = %address.address, orders = address.order_ids.len(), error = %e, "Geocoding failed, skipping address");
                    report.addresses_skipped += 1;
                }
            }
        }

        if points.is_empty() {
            warn!("No address could be geocoded, no routes created");
            return Ok(report);
        }

        let clusters = cluster_points(points, &self.clustering);
        debug!(clusters = clusters.len(), "Sequencing clusters");

        for cluster in clusters {
            let route = DeliveryRoute::from_sequence(nearest_neighbor(cluster), Utc::now());
            let route_id = route.id;
            let stops = route.stops.len();
            let order_count = route.order_ids().count();

            match self.routes.create_route(route).await {
                Ok(()) => {
                    info!(%route_id, stops, orders = order_count, "Route created");
                    report.routes_created += 1;
                    report.orders_routed += order_count;
                    report.route_ids.push(route_id);
                }
                Err(e) => {
                    error!(%route_id, stops, error = %e, "Failed to persist route, continuing");
                    report.routes_failed += 1;
                }
            }
        }

        info!(
            created = report.routes_created,
            failed = report.routes_failed,
            skipped = report.addresses_skipped,
            routed = report.orders_routed,
            "Route generation finished"
        );
        Ok(report)
    }

    /// Hands the oldest pending route to `driver_id`.
    ///
    /// `Conflict` if the driver is already on a route, `NotFound` when no
    /// route is waiting.
    #[instrument(skip(self))]
    pub async fn associate_driver_to_route(&self, driver_id: &DriverId) -> Result<DeliveryRoute, RoutingError> {
        if self.routes.is_driver_on_active_route(driver_id).await? {
            warn!("Driver already has an active route");
            return Err(RoutingError::Conflict(format!(
                "driver {driver_id} already has an active route"
            )));
        }

        match self.routes.claim_oldest_pending_route(driver_id).await? {
            Some(route) => {
                info!(route_id = %route.id, stops = route.stops.len(), "Route assigned");
                Ok(route)
            }
            None => {
                debug!("No pending route");
                Err(RoutingError::NotFound("no routes available".to_string()))
            }
        }
    }

    /// The route `driver_id` is currently driving, stops in visiting order.
    #[instrument(skip(self))]
    pub async fn get_active_route_for_driver(&self, driver_id: &DriverId) -> Result<DeliveryRoute, RoutingError> {
        self.routes
            .find_active_route_by_driver(driver_id)
            .await?
            .ok_or_else(|| RoutingError::NotFound(format!("driver {driver_id} has no active route")))
    }

    /// Records the outcome of a stop and mirrors it onto the stop's orders.
    ///
    /// Once the stop is written the call succeeds, even if the follow-up
    /// completion check fails; [`reconcile_route_completion`](Self::reconcile_route_completion)
    /// catches those routes later.
    #[instrument(skip(self), fields(%stop_id, %status))]
    pub async fn update_stop_status(
        &self,
        driver_id: &DriverId,
        stop_id: StopId,
        status: StopStatus,
    ) -> Result<RouteStop, RoutingError> {
        if !status.is_terminal() {
            return Err(RoutingError::Validation(format!(
                "invalid status value: {status}, expected delivered or failed"
            )));
        }

        let route = self
            .routes
            .find_route_by_stop(stop_id)
            .await?
            .ok_or_else(|| RoutingError::NotFound(format!("stop {stop_id} not found")))?;

        if !route.is_assigned_to(driver_id) {
            warn!(route_id = %route.id, "Driver does not own the route");
            return Err(RoutingError::Forbidden(format!(
                "driver {driver_id} is not assigned to route {}",
                route.id
            )));
        }

        let stop = self.routes.update_stop_status(stop_id, status).await?;

        match self.routes.check_and_complete_route(route.id).await {
            Ok(true) => info!(route_id = %route.id, "Route completed"),
            Ok(false) => debug!(route_id = %route.id, "Route still has open stops"),
            Err(e) => error!(route_id = %route.id, error = %e, "Route completion check failed"),
        }

        Ok(stop)
    }

    /// Re-runs the completion check for every in-progress route.
    ///
    /// Idempotent. Returns how many routes are completed afterwards.
    /// Per-route failures are logged and skipped.
    #[instrument(skip(self))]
    pub async fn reconcile_route_completion(&self) -> Result<usize, RoutingError> {
        let route_ids = self.routes.find_in_progress_route_ids().await?;
        let mut completed = 0;

        for route_id in route_ids {
            match self.routes.check_and_complete_route(route_id).await {
                Ok(true) => {
                    info!(%route_id, "Route completed by reconciliation");
                    completed += 1;
                }
                Ok(false) => {}
                Err(e) => warn!(%route_id, error = %e, "Reconciliation check failed"),
            }
        }

        Ok(completed)
    }
}
