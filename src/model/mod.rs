//! Plain data: routes, stops, orders, delivery points and their identifiers.

pub mod ids;
pub mod order;
pub mod point;
pub mod route;

pub use ids::*;
pub use order::*;
pub use point::*;
pub use route::*;
