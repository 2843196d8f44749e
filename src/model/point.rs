//! Transient, batch-only delivery points.

use crate::model::OrderId;
use serde::{Deserialize, Serialize};

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// One unique address and every pending order destined there, not yet geocoded.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAddress {
    pub address: String,
    pub order_ids: Vec<OrderId>,
}

impl PendingAddress {
    /// Attaches geocoded coordinates, producing a routable point.
    pub fn locate(self, coordinates: Coordinates) -> DeliveryPoint {
        DeliveryPoint {
            address: self.address,
            order_ids: self.order_ids,
            coordinates,
        }
    }
}

/// A geocoded address grouping all of its orders. Exists only during a generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryPoint {
    pub address: String,
    pub order_ids: Vec<OrderId>,
    pub coordinates: Coordinates,
}
