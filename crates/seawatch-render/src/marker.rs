//! Marker construction.
//!
//! The factory is a pure transform from one polled entity record to a
//! renderable marker descriptor; callers perform placement on the drawing
//! surface. An entity without a valid position yields no marker.

use crate::icons::{resolve_icon, size_for_zoom, IconRef};
use crate::popup::popup_html;
use chrono::{DateTime, Utc};
use seawatch_core::types::{Position, VesselCategory, VesselRecord};
use serde::Serialize;

/// A renderable marker derived from one entity for the current tick.
///
/// Superseded wholesale on the next reconciliation of its layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Entity identifier, used for removal and zoom restyling
    pub id: String,

    /// Geographic position
    pub position: Position,

    /// Resolved icon asset
    pub icon: IconRef,

    /// Icon edge length in pixels at the zoom the marker was built for
    pub size_px: u32,

    /// Rotation in degrees, [0, 360)
    pub rotation_deg: f64,

    /// Popup fragment bound to the marker
    pub popup: String,
}

/// Sub-classifies a buoy from its display name.
///
/// "BUOY MERAH" anywhere in the name (case-insensitive) marks a red channel
/// buoy, "BUOY HIJAU" a green one; anything else is a default buoy.
pub fn classify_buoy(name: &str) -> VesselCategory {
    let upper = name.to_uppercase();
    if upper.contains("BUOY MERAH") {
        VesselCategory::BuoyRed
    } else if upper.contains("BUOY HIJAU") {
        VesselCategory::BuoyGreen
    } else {
        VesselCategory::Buoy
    }
}

/// Normalizes an angle into [0, 360). Non-finite input degrades to 0.
fn normalize_rotation(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    deg.rem_euclid(360.0)
}

/// Builds a marker descriptor from one entity record.
///
/// Returns `None` when the entity has no valid position. `category_override`
/// replaces the record's own tag; the fixed-layer reconcilers pass the
/// buoy-name classification or [`VesselCategory::Vts`] here.
///
/// Rotation comes from the heading when reported, else the course, else 0.
pub fn build_marker(
    record: &VesselRecord,
    zoom: f64,
    category_override: Option<VesselCategory>,
    now: DateTime<Utc>,
) -> Option<Marker> {
    let position = record.position?;
    let category = category_override.unwrap_or(record.category);

    let rotation_deg = record
        .heading_deg
        .or(record.course_deg)
        .map(normalize_rotation)
        .unwrap_or(0.0);

    Some(Marker {
        id: record.id.clone(),
        position,
        icon: resolve_icon(category),
        size_px: size_for_zoom(zoom),
        rotation_deg,
        popup: popup_html(record, category, now),
    })
}
