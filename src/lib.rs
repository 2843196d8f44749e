//! # Route Dispatch
//!
//! > **Delivery route generation and assignment.**
//!
//! Turns orders awaiting shipment into sequenced delivery routes, hands
//! routes to drivers one at a time, and tracks stop outcomes until every
//! route is completed.
//!
//! ## 🏗️ Design
//!
//! ### One owner for all route state
//! Routes, stops and orders live inside a single actor task (the ledger,
//! see [`store`]). Requests are handled strictly one after another, so each
//! request is a transaction:
//! - creating a route writes the route, its stops and the order status
//!   changes together or not at all;
//! - claiming a route checks "driver idle" and "route pending" and assigns
//!   it in the same step, so two drivers can never receive the same route;
//! - settling a stop updates the stop and all of its orders together.
//!
//! ### Collaborators behind traits
//! The engine ([`routing::RoutingService`]) is generic over
//! [`RouteRepository`](repository::RouteRepository),
//! [`OrderRepository`](repository::OrderRepository) and
//! [`Geocoder`](geocoder::Geocoder). Tests swap any of them for fakes.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Generic single-owner actor plumbing: [`ActorState`](framework::ActorState),
//! [`ResourceActor`](framework::ResourceActor),
//! [`ResourceClient`](framework::ResourceClient) and test mocks.
//!
//! ### 2. The Ledger ([`store`], [`clients`])
//! The persistence actor and [`StoreClient`](clients::StoreClient), its
//! typed client implementing both repository traits.
//!
//! ### 3. Routing ([`routing`])
//! Address aggregation, k-means clustering with a hard stop cap,
//! nearest-neighbor sequencing and the [`RoutingService`](routing::RoutingService)
//! operations:
//! - [`generate_routes`](routing::RoutingService::generate_routes)
//! - [`associate_driver_to_route`](routing::RoutingService::associate_driver_to_route)
//! - [`get_active_route_for_driver`](routing::RoutingService::get_active_route_for_driver)
//! - [`update_stop_status`](routing::RoutingService::update_stop_status)
//! - [`reconcile_route_completion`](routing::RoutingService::reconcile_route_completion)
//!
//! ### 4. Edges ([`geocoder`], [`config`], [`lifecycle`])
//! Nominatim and static geocoders, TOML configuration, system startup,
//! shutdown and tracing.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Generate today's routes from a sample order file, offline geocoding
//! RUST_LOG=info cargo run -- --config config/dev.toml --orders demos/orders.toml
//!
//! cargo test
//! ```

pub mod clients;
pub mod config;
pub mod error;
pub mod framework;
pub mod geocoder;
pub mod lifecycle;
pub mod model;
pub mod repository;
pub mod routing;
pub mod store;
