//! Core types for the Seawatch situational map.
//!
//! This module defines the entity records delivered by the polled feeds and the
//! category vocabulary used to derive marker visuals. Records are read-only to
//! the reconciliation engine; everything derived from them lives in
//! `seawatch-render`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated geographic position.
///
/// The feeds deliver latitude/longitude as free-form JSON values; a coordinate
/// of exactly zero or one that fails to parse marks the position as invalid and
/// the entity is excluded from rendering for that tick.
///
/// # Examples
///
/// ```
/// use seawatch_core::types::Position;
///
/// assert!(Position::new(-7.2, 112.7).is_some());
/// assert!(Position::new(0.0, 112.7).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    lat: f64,
    lon: f64,
}

impl Position {
    /// Creates a position, rejecting zero or non-finite coordinates.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        if !lat.is_finite() || !lon.is_finite() || lat == 0.0 || lon == 0.0 {
            return None;
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }
        Some(Self { lat, lon })
    }

    /// Parses a position from loosely typed coordinate strings.
    ///
    /// Backends deliver coordinates either as JSON numbers or as strings;
    /// anything unparsable is treated the same as an absent position.
    pub fn parse(lat: &str, lon: &str) -> Option<Self> {
        let lat = lat.trim().parse::<f64>().ok()?;
        let lon = lon.trim().parse::<f64>().ok()?;
        Self::new(lat, lon)
    }

    /// Latitude in decimal degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in decimal degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

/// Vessel and infrastructure category vocabulary.
///
/// Moving vessels carry an AIS ship-type code mapped through
/// [`VesselCategory::from_ais_type`]; buoys are sub-classified from their
/// display name by the marker factory; stations are always [`Vts`].
///
/// [`Vts`]: VesselCategory::Vts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VesselCategory {
    /// Cargo vessel (AIS types 70-79)
    Cargo,
    /// Tanker (AIS types 80-89)
    Tanker,
    /// Passenger vessel (AIS types 60-69)
    Passenger,
    /// Fishing vessel (AIS type 30)
    Fishing,
    /// Tug or special craft (AIS types 31, 32, 52)
    Tug,
    /// High-speed craft (AIS types 40-49)
    HighSpeed,
    /// Navigation aid other than a buoy
    NavAid,
    /// Pleasure craft (AIS type 37)
    Pleasure,
    /// Unknown or unreported vessel type
    Unspecified,
    /// Red channel buoy ("BUOY MERAH")
    BuoyRed,
    /// Green channel buoy ("BUOY HIJAU")
    BuoyGreen,
    /// Any other aid-to-navigation buoy
    Buoy,
    /// Vessel traffic service station
    Vts,
}

impl VesselCategory {
    /// Maps a raw AIS ship-type code onto the category vocabulary.
    ///
    /// Codes outside the known ranges degrade to [`Unspecified`] rather than
    /// erroring; the feed may carry experimental or regional type codes.
    ///
    /// [`Unspecified`]: VesselCategory::Unspecified
    pub fn from_ais_type(ship_type: u16) -> Self {
        match ship_type {
            30 => VesselCategory::Fishing,
            31 | 32 | 52 => VesselCategory::Tug,
            37 => VesselCategory::Pleasure,
            40..=49 => VesselCategory::HighSpeed,
            60..=69 => VesselCategory::Passenger,
            70..=79 => VesselCategory::Cargo,
            80..=89 => VesselCategory::Tanker,
            _ => VesselCategory::Unspecified,
        }
    }

    /// Returns true for categories rendered on the fixed infrastructure layers.
    pub fn is_fixed(&self) -> bool {
        matches!(
            self,
            VesselCategory::BuoyRed
                | VesselCategory::BuoyGreen
                | VesselCategory::Buoy
                | VesselCategory::NavAid
                | VesselCategory::Vts
        )
    }

    /// Human-readable label used in popup text.
    pub fn label(&self) -> &'static str {
        match self {
            VesselCategory::Cargo => "Kapal Kargo",
            VesselCategory::Tanker => "Kapal Tanker",
            VesselCategory::Passenger => "Kapal Penumpang",
            VesselCategory::Fishing => "Kapal Ikan",
            VesselCategory::Tug => "Kapal Tunda",
            VesselCategory::HighSpeed => "Kapal Cepat",
            VesselCategory::NavAid => "Alat Bantu Navigasi",
            VesselCategory::Pleasure => "Kapal Pesiar",
            VesselCategory::Unspecified => "Kapal",
            VesselCategory::BuoyRed => "Buoy Merah",
            VesselCategory::BuoyGreen => "Buoy Hijau",
            VesselCategory::Buoy => "Buoy",
            VesselCategory::Vts => "Stasiun VTS",
        }
    }
}

impl fmt::Display for VesselCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entity as delivered by a feed poll.
///
/// A record is immutable for the duration of a reconciliation tick. Fields
/// beyond identity, category, and kinematics are passed through verbatim into
/// popup text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselRecord {
    /// Stable identifier (MMSI-derived for AIS entities)
    pub id: String,

    /// Display name; may be empty for unnamed targets
    pub name: String,

    /// Resolved category
    pub category: VesselCategory,

    /// Validated position; `None` excludes the entity from rendering
    pub position: Option<Position>,

    /// True heading in degrees, if reported
    pub heading_deg: Option<f64>,

    /// Course over ground in degrees, if reported
    pub course_deg: Option<f64>,

    /// Speed over ground in knots, if reported
    pub speed_knots: Option<f64>,

    /// Voyage destination, passed through to the popup
    pub destination: Option<String>,

    /// Radio callsign, passed through to the popup
    pub callsign: Option<String>,

    /// Timestamp of the last position report
    pub last_update: Option<DateTime<Utc>>,
}

impl VesselRecord {
    /// Creates a minimal record; optional fields start empty.
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: VesselCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            position: None,
            heading_deg: None,
            course_deg: None,
            speed_knots: None,
            destination: None,
            callsign: None,
            last_update: None,
        }
    }

    /// Sets the position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Sets the heading in degrees.
    pub fn with_heading(mut self, heading_deg: f64) -> Self {
        self.heading_deg = Some(heading_deg);
        self
    }

    /// Sets the course over ground in degrees.
    pub fn with_course(mut self, course_deg: f64) -> Self {
        self.course_deg = Some(course_deg);
        self
    }

    /// Sets the last position-report timestamp.
    pub fn with_last_update(mut self, at: DateTime<Utc>) -> Self {
        self.last_update = Some(at);
        self
    }

    /// Returns true when the record can be rendered at all.
    pub fn has_valid_position(&self) -> bool {
        self.position.is_some()
    }
}

/// Environmental sensor reading polled from the backend.
///
/// Field names follow the backend wire format. Any missing or non-finite
/// value makes the reading incomplete and the widget renders its placeholder
/// instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Temperature in degrees Celsius
    pub suhu: f64,
    /// Relative humidity in percent
    pub kelembapan: f64,
    /// Wind speed in m/s
    pub angin: f64,
    /// Battery voltage as a percentage of nominal
    pub tegangan: f64,
}

impl SensorReading {
    /// Returns true when every field is a usable number.
    pub fn is_complete(&self) -> bool {
        self.suhu.is_finite()
            && self.kelembapan.is_finite()
            && self.angin.is_finite()
            && self.tegangan.is_finite()
    }
}

/// Free-text weather category polled from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Raw category string, e.g. "Cerah Berawan"
    #[serde(rename = "kategoriCuaca")]
    pub kategori_cuaca: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_rejects_zero_coordinates() {
        assert!(Position::new(0.0, 112.59).is_none());
        assert!(Position::new(-7.31, 0.0).is_none());
        assert!(Position::new(0.0, 0.0).is_none());
        assert!(Position::new(-7.31, 112.59).is_some());
    }

    #[test]
    fn test_position_rejects_out_of_range() {
        assert!(Position::new(91.0, 10.0).is_none());
        assert!(Position::new(-7.0, 181.0).is_none());
        assert!(Position::new(f64::NAN, 10.0).is_none());
    }

    #[test]
    fn test_position_parse() {
        let pos = Position::parse("-7.3172214", "112.5942126").unwrap();
        assert!((pos.lat() - -7.3172214).abs() < 1e-9);
        assert!(Position::parse("abc", "112.59").is_none());
        assert!(Position::parse("0", "112.59").is_none());
        assert!(Position::parse("", "").is_none());
    }

    #[test]
    fn test_ais_type_mapping() {
        assert_eq!(VesselCategory::from_ais_type(70), VesselCategory::Cargo);
        assert_eq!(VesselCategory::from_ais_type(89), VesselCategory::Tanker);
        assert_eq!(VesselCategory::from_ais_type(60), VesselCategory::Passenger);
        assert_eq!(VesselCategory::from_ais_type(30), VesselCategory::Fishing);
        assert_eq!(VesselCategory::from_ais_type(52), VesselCategory::Tug);
        assert_eq!(VesselCategory::from_ais_type(45), VesselCategory::HighSpeed);
        assert_eq!(VesselCategory::from_ais_type(37), VesselCategory::Pleasure);
        assert_eq!(VesselCategory::from_ais_type(0), VesselCategory::Unspecified);
        assert_eq!(
            VesselCategory::from_ais_type(255),
            VesselCategory::Unspecified
        );
    }

    #[test]
    fn test_fixed_categories() {
        assert!(VesselCategory::BuoyRed.is_fixed());
        assert!(VesselCategory::Vts.is_fixed());
        assert!(!VesselCategory::Cargo.is_fixed());
        assert!(!VesselCategory::Unspecified.is_fixed());
    }

    #[test]
    fn test_sensor_reading_completeness() {
        let ok = SensorReading {
            suhu: 30.0,
            kelembapan: 60.0,
            angin: 5.0,
            tegangan: 90.0,
        };
        assert!(ok.is_complete());

        let bad = SensorReading {
            suhu: f64::NAN,
            ..ok
        };
        assert!(!bad.is_complete());
    }

    #[test]
    fn test_sensor_reading_wire_names() {
        let json = r#"{"suhu":30.5,"kelembapan":61.0,"angin":4.2,"tegangan":88.0}"#;
        let reading: SensorReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.suhu, 30.5);
        assert_eq!(reading.tegangan, 88.0);
    }

    #[test]
    fn test_weather_report_wire_name() {
        let json = r#"{"kategoriCuaca":"Hujan Ringan"}"#;
        let report: WeatherReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.kategori_cuaca, "Hujan Ringan");
    }

    #[test]
    fn test_vessel_record_builder() {
        let pos = Position::new(-7.2, 112.7).unwrap();
        let record = VesselRecord::new("mmsi:563091000", "STRAIT EAGLE", VesselCategory::Cargo)
            .with_position(pos)
            .with_heading(45.0);

        assert_eq!(record.id, "mmsi:563091000");
        assert!(record.has_valid_position());
        assert_eq!(record.heading_deg, Some(45.0));
        assert!(record.course_deg.is_none());
    }
}
