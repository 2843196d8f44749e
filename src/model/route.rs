//! Delivery routes and their stops.
//!
//! A [`DeliveryRoute`] exclusively owns its [`RouteStop`]s. Stops reference
//! orders by id only.

use crate::error::RoutingError;
use crate::model::{Coordinates, DeliveryPoint, DriverId, OrderId, OrderStatus, RouteId, StopId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Pending,
    InProgress,
    Completed,
}

impl RouteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Pending => "pending",
            RouteStatus::InProgress => "in_progress",
            RouteStatus::Completed => "completed",
        }
    }

    /// Routes only move forward: pending → in_progress → completed.
    pub fn can_transition_to(&self, next: RouteStatus) -> bool {
        matches!(
            (self, next),
            (RouteStatus::Pending, RouteStatus::InProgress)
                | (RouteStatus::InProgress, RouteStatus::Completed)
        )
    }
}

impl Display for RouteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopStatus {
    Pending,
    Delivered,
    Failed,
}

impl StopStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopStatus::Pending => "pending",
            StopStatus::Delivered => "delivered",
            StopStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StopStatus::Delivered | StopStatus::Failed)
    }

    /// The order status mirroring a settled stop. `None` for `Pending`.
    pub fn order_outcome(&self) -> Option<OrderStatus> {
        match self {
            StopStatus::Pending => None,
            StopStatus::Delivered => Some(OrderStatus::Delivered),
            StopStatus::Failed => Some(OrderStatus::DeliveryFailed),
        }
    }
}

impl Display for StopStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StopStatus {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(StopStatus::Pending),
            "delivered" => Ok(StopStatus::Delivered),
            "failed" => Ok(StopStatus::Failed),
            other => Err(RoutingError::Validation(format!(
                "invalid status value: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub id: StopId,
    pub route_id: RouteId,
    pub sequence: u32,
    pub address: String,
    pub coordinates: Coordinates,
    pub status: StopStatus,
    pub notes: Option<String>,
    pub order_ids: Vec<OrderId>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRoute {
    pub id: RouteId,
    pub status: RouteStatus,
    pub driver_id: Option<DriverId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub stops: Vec<RouteStop>,
}

impl DeliveryRoute {
    /// Builds a pending route from points already in visiting order.
    ///
    /// Stop sequence numbers are the point positions, starting at 1.
    pub fn from_sequence(points: Vec<DeliveryPoint>, now: DateTime<Utc>) -> Self {
        let id = RouteId::generate();
        let stops = points
            .into_iter()
            .zip(1u32..)
            .map(|(point, sequence)| RouteStop {
                id: StopId::generate(),
                route_id: id,
                sequence,
                address: point.address,
                coordinates: point.coordinates,
                status: StopStatus::Pending,
                notes: None,
                order_ids: point.order_ids,
                updated_at: now,
            })
            .collect();

        Self {
            id,
            status: RouteStatus::Pending,
            driver_id: None,
            created_at: now,
            updated_at: now,
            stops,
        }
    }

    pub fn stop_mut(&mut self, stop_id: StopId) -> Option<&mut RouteStop> {
        self.stops.iter_mut().find(|s| s.id == stop_id)
    }

    /// Stops not yet delivered or failed.
    pub fn open_stop_count(&self) -> usize {
        self.stops.iter().filter(|s| !s.status.is_terminal()).count()
    }

    /// Every order bundled in any stop of this route.
    pub fn order_ids(&self) -> impl Iterator<Item = &OrderId> {
        self.stops.iter().flat_map(|s| s.order_ids.iter())
    }

    pub fn is_assigned_to(&self, driver_id: &DriverId) -> bool {
        self.driver_id.as_ref() == Some(driver_id)
    }
}
