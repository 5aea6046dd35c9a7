//! Icon resolution and zoom-dependent sizing.
//!
//! Pure functions over a static category table. Unknown categories cannot
//! occur (the vocabulary is closed), and [`VesselCategory::Unspecified`] is the
//! designated fallback the feed layer degrades to, so resolution never fails.

use seawatch_core::types::VesselCategory;
use serde::Serialize;

/// Reference to a marker icon asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IconRef(&'static str);

impl IconRef {
    /// Asset path of the icon.
    pub fn path(&self) -> &'static str {
        self.0
    }
}

/// Smallest rendered icon size in pixels.
pub const MIN_ICON_PX: u32 = 16;

/// Largest rendered icon size in pixels.
pub const MAX_ICON_PX: u32 = 48;

/// Resolves a category to its icon asset.
pub fn resolve_icon(category: VesselCategory) -> IconRef {
    IconRef(match category {
        VesselCategory::Cargo => "assets/icons/cargo.png",
        VesselCategory::Tanker => "assets/icons/tanker.png",
        VesselCategory::Passenger => "assets/icons/passenger.png",
        VesselCategory::Fishing => "assets/icons/fishing.png",
        VesselCategory::Tug => "assets/icons/tug.png",
        VesselCategory::HighSpeed => "assets/icons/highspeed.png",
        VesselCategory::NavAid => "assets/icons/navaid.png",
        VesselCategory::Pleasure => "assets/icons/pleasure.png",
        VesselCategory::Unspecified => "assets/icons/ship.png",
        VesselCategory::BuoyRed => "assets/icons/buoy-red.png",
        VesselCategory::BuoyGreen => "assets/icons/buoy-green.png",
        VesselCategory::Buoy => "assets/icons/buoy.png",
        VesselCategory::Vts => "assets/icons/vts.png",
    })
}

/// Icon edge length in pixels for a zoom level.
///
/// Linear in zoom, clamped to [[`MIN_ICON_PX`], [`MAX_ICON_PX`]] so markers stay
/// legible when zoomed out and never dominate the view when zoomed in.
pub fn size_for_zoom(zoom: f64) -> u32 {
    (zoom * 2.5).clamp(MIN_ICON_PX as f64, MAX_ICON_PX as f64).round() as u32
}
