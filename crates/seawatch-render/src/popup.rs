//! Popup fragment rendering.
//!
//! One fixed template; entity fields are substituted verbatim, absent fields
//! are omitted rather than rendered empty.

use crate::timefmt::relative_since;
use chrono::{DateTime, Utc};
use seawatch_core::types::{VesselCategory, VesselRecord};

/// Renders the popup fragment for one entity.
///
/// `category` is the resolved rendering category, which for buoys and stations
/// may differ from the tag the record arrived with.
pub fn popup_html(record: &VesselRecord, category: VesselCategory, now: DateTime<Utc>) -> String {
    let name = if record.name.is_empty() {
        record.id.as_str()
    } else {
        record.name.as_str()
    };

    let mut html = format!("<b>{}</b><br>{}", name, category.label());

    if let Some(pos) = record.position {
        html.push_str(&format!("<br>Posisi: {}", pos));
    }
    if let Some(speed) = record.speed_knots {
        html.push_str(&format!("<br>Kecepatan: {speed:.1} knot"));
    }
    if let Some(course) = record.course_deg.or(record.heading_deg) {
        html.push_str(&format!("<br>Haluan: {course:.0}\u{b0}"));
    }
    if let Some(dest) = record.destination.as_deref().filter(|d| !d.is_empty()) {
        html.push_str(&format!("<br>Tujuan: {dest}"));
    }
    if let Some(callsign) = record.callsign.as_deref().filter(|c| !c.is_empty()) {
        html.push_str(&format!("<br>Callsign: {callsign}"));
    }

    let updated = match record.last_update {
        Some(at) => relative_since(at, now),
        None => "tidak diketahui".to_string(),
    };
    html.push_str(&format!("<br><i>Diperbarui: {updated}</i>"));

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use seawatch_core::types::Position;

    fn now() -> DateTime<Utc> {
        "2026-08-06T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_popup_substitutes_fields() {
        let record = VesselRecord::new("mmsi:1", "STRAIT EAGLE", VesselCategory::Cargo)
            .with_position(Position::new(-7.2, 112.7).unwrap())
            .with_course(45.0)
            .with_last_update(now() - Duration::seconds(90));

        let html = popup_html(&record, VesselCategory::Cargo, now());
        assert!(html.contains("STRAIT EAGLE"));
        assert!(html.contains("Kapal Kargo"));
        assert!(html.contains("Posisi"));
        assert!(html.contains("1 menit yang lalu"));
    }

    #[test]
    fn test_popup_falls_back_to_id_for_unnamed() {
        let record = VesselRecord::new("mmsi:999", "", VesselCategory::Unspecified);
        let html = popup_html(&record, VesselCategory::Unspecified, now());
        assert!(html.contains("mmsi:999"));
    }

    #[test]
    fn test_popup_omits_absent_fields() {
        let record = VesselRecord::new("mmsi:2", "BUOY X", VesselCategory::Buoy);
        let html = popup_html(&record, VesselCategory::Buoy, now());
        assert!(!html.contains("Kecepatan"));
        assert!(!html.contains("Tujuan"));
        assert!(html.contains("tidak diketahui"));
    }

    #[test]
    fn test_popup_uses_resolved_category() {
        let record = VesselRecord::new("aton:7", "BUOY MERAH 1", VesselCategory::Buoy);
        let html = popup_html(&record, VesselCategory::BuoyRed, now());
        assert!(html.contains("Buoy Merah"));
    }
}
