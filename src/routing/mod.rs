//! Route generation and the driver-facing route operations.
//!
//! Batch flow: [`aggregate`] → geocoder → [`cluster`] → [`sequence`] →
//! persistence, driven by [`RoutingService::generate_routes`].

pub mod aggregate;
pub mod cluster;
pub mod haversine;
pub mod sequence;
pub mod service;
pub mod sheet;

pub use cluster::ClusterParams;
pub use service::{daily_cutoff, GenerationReport, RoutingService};
pub use sheet::DispatchSheet;
