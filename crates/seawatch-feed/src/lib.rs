//! # Seawatch Feed
//!
//! Async trait seams for the polled data sources and the `reqwest`-backed
//! production implementation.
//!
//! The reconciliation engine consumes these traits, never the HTTP client
//! directly, so tests and alternative backends inject their own
//! implementations.

pub mod client;
pub mod records;

use async_trait::async_trait;
use seawatch_core::error::Result;
use seawatch_core::types::{SensorReading, VesselRecord, WeatherReport};

pub use client::HttpFeed;
pub use records::{FeedLayer, VesselDto};

/// Pull source for the three vessel layers.
#[async_trait]
pub trait VesselFeed: Send + Sync {
    /// Fetches the current ship snapshot.
    async fn fetch_ships(&self) -> Result<Vec<VesselRecord>>;

    /// Fetches the current buoy snapshot.
    async fn fetch_buoys(&self) -> Result<Vec<VesselRecord>>;

    /// Fetches the current VTS station snapshot.
    async fn fetch_stations(&self) -> Result<Vec<VesselRecord>>;
}

/// Pull source for the environmental sensor reading.
#[async_trait]
pub trait SensorFeed: Send + Sync {
    /// Fetches the current sensor reading.
    async fn fetch_reading(&self) -> Result<SensorReading>;
}

/// Pull source for the weather category.
#[async_trait]
pub trait WeatherFeed: Send + Sync {
    /// Fetches the current weather category.
    async fn fetch_report(&self) -> Result<WeatherReport>;
}
