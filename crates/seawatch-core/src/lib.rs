//! # Seawatch Core
//!
//! Core types, error handling, and configuration for the Seawatch live
//! maritime situational map.
//!
//! This crate provides the foundational building blocks for the system:
//!
//! - **Types**: validated [`types::Position`], the [`types::VesselCategory`]
//!   vocabulary, polled entity records, and the sensor/weather wire records.
//! - **Errors**: `thiserror`-based taxonomy separating transient feed failures
//!   (never fatal, previous render state is retained) from configuration
//!   errors (fatal at startup only).
//! - **Configuration**: YAML loading with environment overrides and
//!   validation of view, feed, widget, and logging settings.
//!
//! ## Example
//!
//! ```
//! use seawatch_core::types::{Position, VesselCategory, VesselRecord};
//!
//! let record = VesselRecord::new("mmsi:244660489", "EUROPA TRADER", VesselCategory::Cargo)
//!     .with_position(Position::new(51.95, 4.14).unwrap());
//! assert!(record.has_valid_position());
//! ```

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use error::{FeedError, Result, SeawatchError};
pub use types::{Position, SensorReading, VesselCategory, VesselRecord, WeatherReport};
