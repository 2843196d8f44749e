//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter. The
//! level comes from `RUST_LOG`.
//!
//! ```bash
//! # Run summaries, route creation and assignment
//! RUST_LOG=info cargo run
//!
//! # Every store request with its payload
//! RUST_LOG=debug cargo run
//!
//! # Only the engine
//! RUST_LOG=route_dispatch::routing=debug cargo run
//! ```
//!
//! Events carry structured fields (`route_id`, `stop_id`, `driver_id`,
//! `address`) rather than formatted strings, and client calls open an
//! `#[instrument]` span, so one stop update reads like:
//!
//! ```text
//! INFO update_stop_status{driver_id=DriverId("d1") stop_id=stop_0190.. status=delivered}: Stop settled
//! INFO update_stop_status{..}: Route completed route_id=route_0190..
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
