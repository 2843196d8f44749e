#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use route_dispatch::clients::StoreClient;
use route_dispatch::config::{RoutingConfig, StoreConfig};
use route_dispatch::geocoder::StaticGeocoder;
use route_dispatch::lifecycle::DispatchSystem;
use route_dispatch::model::{DeliveryRoute, Order, OrderId, OrderStatus};
use route_dispatch::routing::RoutingService;

pub type Service = RoutingService<StoreClient, StoreClient, StaticGeocoder>;

pub fn start(geocoder: StaticGeocoder) -> (DispatchSystem, Service) {
    let system = DispatchSystem::start(&StoreConfig::default());
    let service = system.routing_service(geocoder, &RoutingConfig::default());
    (system, service)
}

/// A moment safely before `Utc::now()`.
pub fn earlier() -> DateTime<Utc> {
    Utc::now() - Duration::hours(2)
}

pub fn orders(entries: &[(&str, &str)]) -> Vec<Order> {
    let created = earlier();
    entries
        .iter()
        .map(|(id, address)| Order::new(*id, *address, created))
        .collect()
}

/// `n` distinct addresses spread over a few kilometers, with their geocoder.
pub fn spread(n: usize) -> (Vec<Order>, StaticGeocoder) {
    let mut geocoder = StaticGeocoder::default();
    let mut seeded = Vec::with_capacity(n);
    let created = earlier();
    for i in 0..n {
        let address = format!("{} Grid Street", i + 1);
        let lat = 41.15 + (i % 9) as f64 * 0.004;
        let lng = -8.61 + (i / 9) as f64 * 0.004;
        geocoder = geocoder.with(address.clone(), lat, lng);
        seeded.push(Order::new(format!("grid-{i}"), address, created));
    }
    (seeded, geocoder)
}

pub async fn order_status(store: &StoreClient, id: &str) -> OrderStatus {
    store
        .get_order(&OrderId::from(id))
        .await
        .expect("store available")
        .expect("order exists")
        .status
}

pub async fn route(store: &StoreClient, route: &DeliveryRoute) -> DeliveryRoute {
    store
        .get_route(route.id)
        .await
        .expect("store available")
        .expect("route exists")
}
