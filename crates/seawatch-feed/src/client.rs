//! HTTP implementation of the feed traits.
//!
//! One `reqwest::Client` serves all five endpoints. Failures map into
//! [`FeedError`] and never carry retry logic of their own; the poll cadence
//! is the retry.

use crate::records::{FeedLayer, VesselDto};
use crate::{SensorFeed, VesselFeed, WeatherFeed};
use async_trait::async_trait;
use seawatch_core::error::{FeedError, Result};
use seawatch_core::types::{SensorReading, VesselRecord, WeatherReport};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const SHIPS_PATH: &str = "/api/ais/all";
const BUOYS_PATH: &str = "/api/ais/buoy";
const STATIONS_PATH: &str = "/api/ais/VTS";
const SENSOR_PATH: &str = "/api/pesan8";
const WEATHER_PATH: &str = "/api/kategori-cuaca";

/// Feed client over the AIS backend's REST API.
#[derive(Debug, Clone)]
pub struct HttpFeed {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFeed {
    /// Creates a client for `base_url` with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::transport(&base_url, e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "polling feed");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FeedError::transport(&url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::status(&url, status.as_u16()).into());
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FeedError::decode(what, e.to_string()).into())
    }

    async fn fetch_layer(&self, path: &str, layer: FeedLayer, what: &str) -> Result<Vec<VesselRecord>> {
        let dtos: Vec<VesselDto> = self.get_json(path, what).await?;
        Ok(dtos.into_iter().map(|dto| dto.into_record(layer)).collect())
    }
}

#[async_trait]
impl VesselFeed for HttpFeed {
    async fn fetch_ships(&self) -> Result<Vec<VesselRecord>> {
        self.fetch_layer(SHIPS_PATH, FeedLayer::Ships, "ship list").await
    }

    async fn fetch_buoys(&self) -> Result<Vec<VesselRecord>> {
        self.fetch_layer(BUOYS_PATH, FeedLayer::Buoys, "buoy list").await
    }

    async fn fetch_stations(&self) -> Result<Vec<VesselRecord>> {
        self.fetch_layer(STATIONS_PATH, FeedLayer::Stations, "station list")
            .await
    }
}

#[async_trait]
impl SensorFeed for HttpFeed {
    async fn fetch_reading(&self) -> Result<SensorReading> {
        self.get_json(SENSOR_PATH, "sensor reading").await
    }
}

#[async_trait]
impl WeatherFeed for HttpFeed {
    async fn fetch_report(&self) -> Result<WeatherReport> {
        self.get_json(WEATHER_PATH, "weather category").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let feed = HttpFeed::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(feed.base_url, "http://localhost:5000");
    }
}
