//! System wiring: starting the store actor, handing out clients, shutdown.

pub mod system;
pub mod tracing;

pub use self::system::DispatchSystem;
pub use self::tracing::setup_tracing;
