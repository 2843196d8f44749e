//! A customer order as seen by the routing engine.
//!
//! Orders belong to the order system. Routing reads the ones awaiting
//! shipment and writes status transitions; nothing else.

use crate::model::OrderId;
use chrono::{DateTime, Utc};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    AwaitingShipment,
    OutForDelivery,
    Delivered,
    DeliveryFailed,
    ReturnToStock,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::AwaitingShipment => "awaiting_shipment",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::DeliveryFailed => "delivery_failed",
            OrderStatus::ReturnToStock => "return_to_stock",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub customer_address: String,
    pub status: OrderStatus,
    pub delivery_attempts: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates an order awaiting shipment.
    pub fn new(
        id: impl Into<OrderId>,
        customer_address: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            customer_address: customer_address.into(),
            status: OrderStatus::AwaitingShipment,
            delivery_attempts: 0,
            created_at,
            updated_at: created_at,
        }
    }
}
