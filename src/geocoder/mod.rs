//! Address to coordinates lookup.
//!
//! The routing engine only sees the [`Geocoder`] trait. Failures are
//! per-address: the caller logs them and skips that address.

pub mod nominatim;
pub mod static_table;

pub use nominatim::NominatimGeocoder;
pub use static_table::StaticGeocoder;

use crate::config::{GeocoderConfig, GeocoderProvider};
use crate::model::Coordinates;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider answered with status {0}")]
    Status(u16),

    #[error("No result for address {0:?}")]
    NoResult(String),

    #[error("Invalid coordinate {value:?}: {reason}")]
    InvalidCoordinate { value: String, reason: String },
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError>;
}

#[async_trait]
impl<T: Geocoder + ?Sized> Geocoder for Arc<T> {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        (**self).geocode(address).await
    }
}

/// Builds the geocoder selected by `config.provider`.
pub fn from_config(config: &GeocoderConfig) -> Result<Arc<dyn Geocoder>, GeocodeError> {
    let geocoder: Arc<dyn Geocoder> = match config.provider {
        GeocoderProvider::Nominatim => Arc::new(NominatimGeocoder::new(config)?),
        GeocoderProvider::Static => Arc::new(StaticGeocoder::new(config.static_table.clone())),
    };
    Ok(geocoder)
}
