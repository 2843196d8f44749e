//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).

pub mod store_client;

pub use store_client::*;
