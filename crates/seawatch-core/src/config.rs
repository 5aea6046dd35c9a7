//! Configuration management for the Seawatch situational map.
//!
//! Supports loading from YAML files, environment variable overrides via the
//! `config` crate (`SEAWATCH__` prefix), and validation of all settings before
//! the map session starts.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::Level;

/// Main application configuration.
///
/// # Examples
///
/// ```no_run
/// use seawatch_core::config::AppConfig;
///
/// let config = AppConfig::from_file("seawatch.yaml").unwrap();
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Initial map view
    #[serde(default)]
    pub map: MapViewConfig,

    /// Feed endpoints and poll cadences
    #[serde(default)]
    pub feeds: FeedConfig,

    /// Overlay widget settings
    #[serde(default)]
    pub widgets: WidgetConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Self::from_yaml(&contents)
    }

    /// Loads configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            ConfigError::InvalidFormat {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Loads configuration using the `config` crate, merging the file with
    /// `SEAWATCH`-prefixed environment variable overrides.
    pub fn from_config_builder<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .add_source(
                config::Environment::with_prefix("SEAWATCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        config.try_deserialize().map_err(|e| {
            ConfigError::InvalidFormat {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.map.validate()?;
        self.feeds.validate()?;
        self.widgets.validate()?;
        self.logging.parse_level()?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            map: MapViewConfig::default(),
            feeds: FeedConfig::default(),
            widgets: WidgetConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Initial map view and declutter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapViewConfig {
    /// Initial center latitude
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,

    /// Initial center longitude
    #[serde(default = "default_center_lon")]
    pub center_lon: f64,

    /// Initial zoom level
    #[serde(default = "default_zoom")]
    pub zoom: f64,

    /// Maximum zoom supported by the tile source
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,

    /// Ships within this distance of a fixed marker are hidden
    #[serde(default = "default_suppression_radius")]
    pub suppression_radius_m: f64,
}

fn default_center_lat() -> f64 {
    -7.3172214
}

fn default_center_lon() -> f64 {
    112.5942126
}

fn default_zoom() -> f64 {
    9.0
}

fn default_max_zoom() -> f64 {
    20.0
}

fn default_suppression_radius() -> f64 {
    10.0
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            center_lat: default_center_lat(),
            center_lon: default_center_lon(),
            zoom: default_zoom(),
            max_zoom: default_max_zoom(),
            suppression_radius_m: default_suppression_radius(),
        }
    }
}

impl MapViewConfig {
    /// Validates the map view settings.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=self.max_zoom).contains(&self.zoom) {
            return Err(ConfigError::invalid_value(
                "map.zoom",
                format!("must be between 0 and {}", self.max_zoom),
            )
            .into());
        }
        if self.suppression_radius_m <= 0.0 {
            return Err(
                ConfigError::invalid_value("map.suppression_radius_m", "must be positive").into(),
            );
        }
        Ok(())
    }
}

/// Feed endpoints and per-layer poll cadences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Backend base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Ship layer poll interval in seconds
    #[serde(default = "default_ship_interval")]
    pub ship_interval_secs: u64,

    /// Buoy/station layer poll interval in seconds
    #[serde(default = "default_fixed_interval")]
    pub fixed_interval_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_ship_interval() -> u64 {
    10
}

fn default_fixed_interval() -> u64 {
    30
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            ship_interval_secs: default_ship_interval(),
            fixed_interval_secs: default_fixed_interval(),
        }
    }
}

impl FeedConfig {
    /// Validates the feed settings.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ConfigError::invalid_value("feeds.base_url", "cannot be empty").into());
        }
        if self.ship_interval_secs == 0 || self.fixed_interval_secs == 0 {
            return Err(ConfigError::invalid_value(
                "feeds.*_interval_secs",
                "poll intervals must be at least 1 second",
            )
            .into());
        }
        Ok(())
    }

    /// HTTP request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Ship layer poll interval.
    pub fn ship_interval(&self) -> Duration {
        Duration::from_secs(self.ship_interval_secs)
    }

    /// Buoy/station layer poll interval.
    pub fn fixed_interval(&self) -> Duration {
        Duration::from_secs(self.fixed_interval_secs)
    }
}

/// Sensor widget presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorMode {
    /// Embedded as a map overlay control
    Overlay,
    /// Standalone alert surface with a faster cadence
    Alert,
}

impl Default for SensorMode {
    fn default() -> Self {
        SensorMode::Overlay
    }
}

/// Overlay widget settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Sensor widget mode
    #[serde(default)]
    pub sensor_mode: SensorMode,

    /// Sensor poll interval in overlay mode, seconds
    #[serde(default = "default_sensor_overlay_interval")]
    pub sensor_overlay_interval_secs: u64,

    /// Sensor poll interval in alert mode, seconds
    #[serde(default = "default_sensor_alert_interval")]
    pub sensor_alert_interval_secs: u64,

    /// Weather poll interval in seconds
    #[serde(default = "default_weather_interval")]
    pub weather_interval_secs: u64,

    /// Screen anchor for the sensor control
    #[serde(default = "default_sensor_anchor")]
    pub sensor_anchor: String,

    /// Screen anchor for the weather control
    #[serde(default = "default_weather_anchor")]
    pub weather_anchor: String,
}

fn default_sensor_overlay_interval() -> u64 {
    5
}

fn default_sensor_alert_interval() -> u64 {
    3
}

fn default_weather_interval() -> u64 {
    10
}

fn default_sensor_anchor() -> String {
    "bottom-left".to_string()
}

fn default_weather_anchor() -> String {
    "top-right".to_string()
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            sensor_mode: SensorMode::default(),
            sensor_overlay_interval_secs: default_sensor_overlay_interval(),
            sensor_alert_interval_secs: default_sensor_alert_interval(),
            weather_interval_secs: default_weather_interval(),
            sensor_anchor: default_sensor_anchor(),
            weather_anchor: default_weather_anchor(),
        }
    }
}

impl WidgetConfig {
    /// Validates the widget settings.
    pub fn validate(&self) -> Result<()> {
        if self.sensor_overlay_interval_secs == 0
            || self.sensor_alert_interval_secs == 0
            || self.weather_interval_secs == 0
        {
            return Err(ConfigError::invalid_value(
                "widgets.*_interval_secs",
                "poll intervals must be at least 1 second",
            )
            .into());
        }
        Ok(())
    }

    /// Sensor poll interval for the configured mode.
    pub fn sensor_interval(&self) -> Duration {
        match self.sensor_mode {
            SensorMode::Overlay => Duration::from_secs(self.sensor_overlay_interval_secs),
            SensorMode::Alert => Duration::from_secs(self.sensor_alert_interval_secs),
        }
    }

    /// Weather poll interval.
    pub fn weather_interval(&self) -> Duration {
        Duration::from_secs(self.weather_interval_secs)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    /// Parses the log level string to a tracing Level.
    pub fn parse_level(&self) -> Result<Level> {
        self.level
            .parse()
            .map_err(|_| {
                ConfigError::InvalidValue {
                    field: "logging.level".to_string(),
                    reason: format!("Invalid log level: {}", self.level),
                }
                .into()
            })
    }
}
