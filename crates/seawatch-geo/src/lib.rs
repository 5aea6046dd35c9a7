//! # Seawatch Geo
//!
//! Great-circle distance and the spatial suppression rule used to declutter
//! ship markers that would visually collide with fixed infrastructure.
//!
//! Distances use the haversine formula. At the 10 m suppression scale a planar
//! approximation would be indistinguishable, but haversine stays correct
//! across the antimeridian and costs nothing at these set sizes.

use seawatch_core::types::Position;

/// Mean Earth radius in meters (IUGG).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Ships within this distance of a fixed marker are hidden.
///
/// This is a marker-overlap declutter threshold, not a navigational safety
/// radius.
pub const DEFAULT_SUPPRESSION_RADIUS_M: f64 = 10.0;

/// Great-circle distance between two positions in meters.
pub fn haversine_m(a: Position, b: Position) -> f64 {
    let lat_a = a.lat().to_radians();
    let lat_b = b.lat().to_radians();
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lon = (b.lon() - a.lon()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Distance from `ship` to the nearest fixed position, if any exist.
pub fn nearest_distance_m(ship: Position, fixed: &[Position]) -> Option<f64> {
    fixed
        .iter()
        .map(|&p| haversine_m(ship, p))
        .min_by(|a, b| a.total_cmp(b))
}

/// Returns true when `ship` lies within `radius_m` of any fixed position.
///
/// An empty fixed set never suppresses.
pub fn is_suppressed(ship: Position, fixed: &[Position], radius_m: f64) -> bool {
    match nearest_distance_m(ship, fixed) {
        Some(d) => d < radius_m,
        None => false,
    }
}
