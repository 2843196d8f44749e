//! Nominatim (OpenStreetMap) HTTP geocoder.
//!
//! The public instance allows one request per second and requires an
//! identifying `User-Agent`. Calls are serialized through a [`Pacer`].

use super::{GeocodeError, Geocoder};
use crate::config::GeocoderConfig;
use crate::model::Coordinates;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Enforces a minimum spacing between consecutive calls.
///
/// Holding the lock across the whole call keeps calls strictly sequential.
#[derive(Debug)]
pub struct Pacer {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Runs `call` no earlier than `min_interval` after the previous one started.
    pub async fn run<F, T>(&self, call: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        let mut last_call = self.last_call.lock().await;
        if let Some(previous) = *last_call {
            tokio::time::sleep_until(previous + self.min_interval).await;
        }
        *last_call = Some(Instant::now());
        call.await
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

#[derive(Debug)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    pacer: Pacer,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            pacer: Pacer::new(Duration::from_millis(config.min_interval_ms)),
        })
    }

    async fn search(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let places: Vec<Place> = response.json().await?;
        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NoResult(address.to_string()))?;

        Ok(Coordinates::new(
            parse_degrees(&place.lat, 90.0)?,
            parse_degrees(&place.lon, 180.0)?,
        ))
    }
}

/// Parses a decimal degree value, rejecting anything outside `-limit..=limit`.
fn parse_degrees(value: &str, limit: f64) -> Result<f64, GeocodeError> {
    let invalid = |reason: String| GeocodeError::InvalidCoordinate {
        value: value.to_string(),
        reason,
    };

    let degrees = value
        .trim()
        .parse::<f64>()
        .map_err(|e| invalid(e.to_string()))?;
    if !degrees.is_finite() || degrees.abs() > limit {
        return Err(invalid(format!("expected a finite value within ±{limit}")));
    }
    Ok(degrees)
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let coordinates = self.pacer.run(self.search(address)).await?;
        debug!(
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            "Geocoded"
        );
        Ok(coordinates)
    }
}
