mod common;

use chrono::Utc;
use common::{order_status, orders, start};
use route_dispatch::config::{RoutingConfig, StoreConfig};
use route_dispatch::error::{ErrorKind, RoutingError};
use route_dispatch::geocoder::StaticGeocoder;
use route_dispatch::lifecycle::DispatchSystem;
use route_dispatch::model::{DriverId, OrderStatus, RouteStatus, StopId, StopStatus};
use std::sync::Arc;

fn geocoder() -> StaticGeocoder {
    StaticGeocoder::default()
        .with("North 1", 40.00, -3.70)
        .with("North 2", 40.01, -3.70)
        .with("South 1", 10.00, -3.70)
}

/// One pending route, many drivers at once: exactly one wins.
#[tokio::test]
async fn test_concurrent_claims_assign_a_route_once() {
    let (system, service) = start(geocoder());
    system
        .store
        .insert_orders(orders(&[("o1", "North 1"), ("o2", "North 2")]))
        .await
        .unwrap();
    let report = service.generate_routes(Utc::now()).await.unwrap();
    assert_eq!(report.routes_created, 1);

    let service = Arc::new(service);
    let mut handles = Vec::new();
    for i in 0..8 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service
                .associate_driver_to_route(&DriverId::from(format!("driver-{i}")))
                .await
        }));
    }

    let mut assigned = Vec::new();
    let mut empty_queue = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(route) => assigned.push(route),
            Err(e) => {
                assert_eq!(e.kind(), ErrorKind::NotFound, "unexpected error: {e}");
                empty_queue += 1;
            }
        }
    }

    assert_eq!(assigned.len(), 1);
    assert_eq!(empty_queue, 7);
    assert_eq!(assigned[0].id, report.route_ids[0]);
}

#[tokio::test]
async fn test_busy_driver_gets_conflict_even_with_routes_waiting() {
    // One stop per route forces North and South onto separate routes
    let system = DispatchSystem::start(&StoreConfig::default());
    let settings = RoutingConfig {
        max_stops_per_route: 1,
        ..Default::default()
    };
    let service = system.routing_service(geocoder(), &settings);
    system
        .store
        .insert_orders(orders(&[("o1", "North 1"), ("o2", "South 1")]))
        .await
        .unwrap();
    let report = service.generate_routes(Utc::now()).await.unwrap();
    assert_eq!(report.routes_created, 2);

    let driver = DriverId::from("driver-1");
    service.associate_driver_to_route(&driver).await.unwrap();

    let again = service.associate_driver_to_route(&driver).await;
    assert!(matches!(again, Err(RoutingError::Conflict(_))));

    // Another driver still gets the second route
    let other = service
        .associate_driver_to_route(&DriverId::from("driver-2"))
        .await
        .unwrap();
    assert_eq!(other.status, RouteStatus::InProgress);
}

#[tokio::test]
async fn test_empty_queue_is_not_found() {
    let (_system, service) = start(geocoder());
    let result = service
        .associate_driver_to_route(&DriverId::from("driver-1"))
        .await;
    assert!(matches!(result, Err(RoutingError::NotFound(_))));

    let active = service
        .get_active_route_for_driver(&DriverId::from("driver-1"))
        .await;
    assert!(matches!(active, Err(RoutingError::NotFound(_))));
}

#[tokio::test]
async fn test_stop_updates_are_guarded() {
    let (system, service) = start(geocoder());
    system
        .store
        .insert_orders(orders(&[("o1", "North 1"), ("o2", "North 2")]))
        .await
        .unwrap();
    service.generate_routes(Utc::now()).await.unwrap();

    let owner = DriverId::from("owner");
    let route = service.associate_driver_to_route(&owner).await.unwrap();
    let stop_id = route.stops[0].id;
    let order_on_stop = route.stops[0].order_ids[0].0.clone();

    // Pending is not a settable target
    let pending = service
        .update_stop_status(&owner, stop_id, StopStatus::Pending)
        .await;
    assert!(matches!(pending, Err(RoutingError::Validation(_))));

    // Someone else's route
    let stranger = service
        .update_stop_status(&DriverId::from("stranger"), stop_id, StopStatus::Delivered)
        .await;
    assert!(matches!(stranger, Err(RoutingError::Forbidden(_))));
    assert_eq!(
        order_status(&system.store, &order_on_stop).await,
        OrderStatus::OutForDelivery
    );

    // Unknown stop
    let unknown = service
        .update_stop_status(&owner, StopId::generate(), StopStatus::Delivered)
        .await;
    assert!(matches!(unknown, Err(RoutingError::NotFound(_))));

    // Settled once, then frozen
    service
        .update_stop_status(&owner, stop_id, StopStatus::Delivered)
        .await
        .unwrap();
    let overwrite = service
        .update_stop_status(&owner, stop_id, StopStatus::Failed)
        .await;
    assert!(matches!(overwrite, Err(RoutingError::Conflict(_))));
    assert_eq!(
        order_status(&system.store, &order_on_stop).await,
        OrderStatus::Delivered
    );
}

#[tokio::test]
async fn test_route_completes_only_when_every_stop_is_settled() {
    let (system, service) = start(geocoder());
    system
        .store
        .insert_orders(orders(&[("o1", "North 1"), ("o2", "North 2")]))
        .await
        .unwrap();
    service.generate_routes(Utc::now()).await.unwrap();

    let driver = DriverId::from("driver-1");
    let route = service.associate_driver_to_route(&driver).await.unwrap();
    assert_eq!(route.stops.len(), 2);

    service
        .update_stop_status(&driver, route.stops[1].id, StopStatus::Failed)
        .await
        .unwrap();
    let midway = common::route(&system.store, &route).await;
    assert_eq!(midway.status, RouteStatus::InProgress);
    assert_eq!(midway.open_stop_count(), 1);

    service
        .update_stop_status(&driver, route.stops[0].id, StopStatus::Delivered)
        .await
        .unwrap();
    let done = common::route(&system.store, &route).await;
    assert_eq!(done.status, RouteStatus::Completed);
    assert_eq!(done.driver_id, Some(driver.clone()));

    // Free again: the next claim is judged on the queue, not on the old route
    let next = service.associate_driver_to_route(&driver).await;
    assert!(matches!(next, Err(RoutingError::NotFound(_))));
}
