//! Wire records delivered by the AIS backend.
//!
//! The backend is loosely typed: coordinates and angles arrive as JSON numbers
//! or strings depending on the upstream receiver, and most fields are
//! optional. Decoding degrades per-field: a record that cannot yield a valid
//! position still deserializes and is excluded later by the marker factory.

use chrono::{DateTime, Utc};
use seawatch_core::types::{Position, VesselCategory, VesselRecord};
use serde::{Deserialize, Deserializer};

/// Which pull endpoint a record came from; decides the base category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedLayer {
    /// Moving vessels (`/api/ais/all`)
    Ships,
    /// Aids to navigation (`/api/ais/buoy`)
    Buoys,
    /// VTS base stations (`/api/ais/VTS`)
    Stations,
}

/// One vessel as the backend serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct VesselDto {
    /// MMSI, when the target reported one
    #[serde(default, deserialize_with = "flex_u64")]
    pub mmsi: Option<u64>,

    /// Display name
    #[serde(default, alias = "shipname")]
    pub name: Option<String>,

    /// Raw AIS ship-type code
    #[serde(default, rename = "type", alias = "shiptype", deserialize_with = "flex_u16")]
    pub ship_type: Option<u16>,

    /// Latitude, number or string
    #[serde(default, alias = "latitude", deserialize_with = "flex_f64")]
    pub lat: Option<f64>,

    /// Longitude, number or string
    #[serde(default, alias = "longitude", deserialize_with = "flex_f64")]
    pub lon: Option<f64>,

    /// True heading in degrees
    #[serde(default, alias = "hdg", deserialize_with = "flex_f64")]
    pub heading: Option<f64>,

    /// Course over ground in degrees
    #[serde(default, alias = "cog", deserialize_with = "flex_f64")]
    pub course: Option<f64>,

    /// Speed over ground in knots
    #[serde(default, alias = "sog", deserialize_with = "flex_f64")]
    pub speed: Option<f64>,

    /// Voyage destination
    #[serde(default)]
    pub destination: Option<String>,

    /// Radio callsign
    #[serde(default)]
    pub callsign: Option<String>,

    /// Last position report, ISO-8601
    #[serde(default, alias = "lastUpdate", alias = "timestamp")]
    pub last_update: Option<String>,
}

impl VesselDto {
    /// Converts the wire record into the engine's entity record.
    pub fn into_record(self, layer: FeedLayer) -> VesselRecord {
        let name = self.name.unwrap_or_default();
        let id = match self.mmsi {
            Some(mmsi) => format!("mmsi:{mmsi}"),
            None => format!("name:{name}"),
        };

        let category = match layer {
            FeedLayer::Ships => VesselCategory::from_ais_type(self.ship_type.unwrap_or(0)),
            FeedLayer::Buoys => VesselCategory::Buoy,
            FeedLayer::Stations => VesselCategory::Vts,
        };

        let position = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Position::new(lat, lon),
            _ => None,
        };

        let last_update = self
            .last_update
            .as_deref()
            .and_then(|s| s.parse::<DateTime<Utc>>().ok());

        VesselRecord {
            id,
            name,
            category,
            position,
            heading_deg: self.heading,
            course_deg: self.course,
            speed_knots: self.speed,
            destination: self.destination,
            callsign: self.callsign,
            last_update,
        }
    }
}

fn flex_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

fn flex_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

fn flex_u16<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = flex_u64(deserializer)?;
    Ok(value.and_then(|n| u16::try_from(n).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_numeric_fields() {
        let json = r#"{
            "mmsi": 563091000,
            "name": "STRAIT EAGLE",
            "type": 70,
            "lat": 1.26,
            "lon": 103.84,
            "heading": 45.0,
            "speed": 12.5,
            "lastUpdate": "2026-08-06T11:58:30Z"
        }"#;
        let dto: VesselDto = serde_json::from_str(json).unwrap();
        let record = dto.into_record(FeedLayer::Ships);

        assert_eq!(record.id, "mmsi:563091000");
        assert_eq!(record.category, VesselCategory::Cargo);
        assert!(record.has_valid_position());
        assert_eq!(record.heading_deg, Some(45.0));
        assert!(record.last_update.is_some());
    }

    #[test]
    fn test_decodes_stringly_typed_coordinates() {
        let json = r#"{"mmsi":"123456789","name":"PINISI","lat":"-7.21","lon":"112.73","type":"30"}"#;
        let dto: VesselDto = serde_json::from_str(json).unwrap();
        let record = dto.into_record(FeedLayer::Ships);

        assert_eq!(record.id, "mmsi:123456789");
        assert_eq!(record.category, VesselCategory::Fishing);
        assert!(record.has_valid_position());
    }

    #[test]
    fn test_zero_coordinates_invalid_but_record_survives() {
        let json = r#"{"mmsi":1,"name":"GHOST","lat":0,"lon":112.7}"#;
        let dto: VesselDto = serde_json::from_str(json).unwrap();
        let record = dto.into_record(FeedLayer::Ships);
        assert!(!record.has_valid_position());
    }

    #[test]
    fn test_garbage_coordinate_is_absent() {
        let json = r#"{"name":"NOFIX","lat":"n/a","lon":"112.7"}"#;
        let dto: VesselDto = serde_json::from_str(json).unwrap();
        let record = dto.into_record(FeedLayer::Ships);
        assert_eq!(record.id, "name:NOFIX");
        assert!(!record.has_valid_position());
    }

    #[test]
    fn test_layer_decides_base_category() {
        let json = r#"{"mmsi":2,"name":"BUOY MERAH 3","lat":-7.2,"lon":112.7}"#;
        let dto: VesselDto = serde_json::from_str(json).unwrap();
        assert_eq!(
            dto.clone().into_record(FeedLayer::Buoys).category,
            VesselCategory::Buoy
        );
        assert_eq!(
            dto.into_record(FeedLayer::Stations).category,
            VesselCategory::Vts
        );
    }

    #[test]
    fn test_unknown_ship_type_degrades() {
        let json = r#"{"mmsi":3,"name":"X","lat":-7.2,"lon":112.7,"type":993}"#;
        let dto: VesselDto = serde_json::from_str(json).unwrap();
        assert_eq!(
            dto.into_record(FeedLayer::Ships).category,
            VesselCategory::Unspecified
        );
    }
}
