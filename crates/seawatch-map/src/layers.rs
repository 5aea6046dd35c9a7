//! Per-layer marker ownership and reconciliation.
//!
//! Each layer (ships, buoys, stations) is exclusively owned by one reconciler.
//! A successful poll replaces the layer's marker set wholesale: every owned
//! marker is removed from the surface before the new snapshot is rebuilt, so
//! an identifier reused across ticks with a changed position can never produce
//! a duplicate. A failed poll leaves the previous set untouched.

use crate::surface::MapSurface;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use seawatch_core::types::{Position, VesselCategory, VesselRecord};
use seawatch_geo::is_suppressed;
use seawatch_render::{build_marker, classify_buoy, size_for_zoom, Marker};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// The three independently polled marker layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Moving vessels
    Ships,
    /// Aids to navigation
    Buoys,
    /// VTS base stations
    Stations,
}

impl LayerKind {
    /// Lowercase name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            LayerKind::Ships => "ships",
            LayerKind::Buoys => "buoys",
            LayerKind::Stations => "stations",
        }
    }
}

/// Shared snapshot of fixed-infrastructure positions.
///
/// Written by the fixed-layer reconcilers in the same operation as their
/// marker replacement; read by the ship reconciler for suppression. Each
/// layer's entry is replaced as a whole, so readers see either the previous
/// or the new snapshot, never a partial one.
#[derive(Clone, Default)]
pub struct FixedPositions {
    inner: Arc<RwLock<HashMap<LayerKind, Vec<Position>>>>,
}

impl FixedPositions {
    /// Creates an empty snapshot holder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces one layer's positions.
    pub fn publish(&self, layer: LayerKind, positions: Vec<Position>) {
        self.inner.write().insert(layer, positions);
    }

    /// All currently known fixed positions, across layers.
    pub fn all(&self) -> Vec<Position> {
        self.inner.read().values().flatten().copied().collect()
    }
}

/// Owner of one fixed-infrastructure layer (buoys or stations).
pub struct FixedLayerReconciler {
    layer: LayerKind,
    surface: Arc<dyn MapSurface>,
    fixed: FixedPositions,
    markers: Mutex<HashMap<String, Marker>>,
}

impl FixedLayerReconciler {
    /// Creates the reconciler for `layer`, which must be a fixed layer.
    pub fn new(layer: LayerKind, surface: Arc<dyn MapSurface>, fixed: FixedPositions) -> Self {
        debug_assert!(layer != LayerKind::Ships);
        Self {
            layer,
            surface,
            fixed,
            markers: Mutex::new(HashMap::new()),
        }
    }

    /// Replaces the layer's marker set from a fresh snapshot.
    ///
    /// Buoys are sub-classified from their display name; stations always
    /// render as VTS. The shared fixed-position snapshot is published inside
    /// the same lock scope as the marker replacement.
    pub fn reconcile(&self, entities: &[VesselRecord], zoom: f64) {
        let now = Utc::now();
        let mut markers = self.markers.lock();

        for id in markers.keys() {
            self.surface.remove_marker(id);
        }
        markers.clear();

        let mut positions = Vec::with_capacity(entities.len());
        for record in entities {
            let category = match self.layer {
                LayerKind::Buoys => classify_buoy(&record.name),
                _ => VesselCategory::Vts,
            };
            if let Some(marker) = build_marker(record, zoom, Some(category), now) {
                self.surface.add_marker(&marker);
                positions.push(marker.position);
                markers.insert(marker.id.clone(), marker);
            }
        }

        debug!(
            layer = self.layer.name(),
            received = entities.len(),
            placed = markers.len(),
            "layer reconciled"
        );
        self.fixed.publish(self.layer, positions);
    }

    /// Number of markers currently owned by this layer.
    pub fn marker_count(&self) -> usize {
        self.markers.lock().len()
    }
}

/// Owner of the ship layer.
///
/// Applies the same full-replace discipline as the fixed layers, additionally
/// excluding entities whose position is invalid or which lie within the
/// suppression radius of any fixed marker.
pub struct ShipLayerReconciler {
    surface: Arc<dyn MapSurface>,
    fixed: FixedPositions,
    suppression_radius_m: f64,
    markers: Mutex<HashMap<String, Marker>>,
}

impl ShipLayerReconciler {
    /// Creates the ship reconciler.
    pub fn new(
        surface: Arc<dyn MapSurface>,
        fixed: FixedPositions,
        suppression_radius_m: f64,
    ) -> Self {
        Self {
            surface,
            fixed,
            suppression_radius_m,
            markers: Mutex::new(HashMap::new()),
        }
    }

    /// Replaces the ship marker set from a fresh snapshot.
    pub fn reconcile(&self, entities: &[VesselRecord], zoom: f64) {
        let now = Utc::now();
        let fixed = self.fixed.all();
        let mut suppressed = 0usize;

        let mut markers = self.markers.lock();
        for id in markers.keys() {
            self.surface.remove_marker(id);
        }
        markers.clear();

        for record in entities {
            let Some(position) = record.position else {
                continue;
            };
            if is_suppressed(position, &fixed, self.suppression_radius_m) {
                suppressed += 1;
                continue;
            }
            if let Some(marker) = build_marker(record, zoom, None, now) {
                self.surface.add_marker(&marker);
                markers.insert(marker.id.clone(), marker);
            }
        }

        debug!(
            layer = LayerKind::Ships.name(),
            received = entities.len(),
            placed = markers.len(),
            suppressed,
            "layer reconciled"
        );
    }

    /// Restyles every placed ship marker for a new zoom level.
    ///
    /// Takes the same lock as [`reconcile`], so a zoom change arriving during
    /// a reconciliation is applied strictly before or after it, never against
    /// a half-built marker set.
    ///
    /// [`reconcile`]: ShipLayerReconciler::reconcile
    pub fn restyle(&self, zoom: f64) {
        let size_px = size_for_zoom(zoom);
        let mut markers = self.markers.lock();
        for marker in markers.values_mut() {
            if marker.size_px != size_px {
                self.surface
                    .update_marker_icon(&marker.id, marker.icon, size_px, marker.rotation_deg);
                marker.size_px = size_px;
            }
        }
    }

    /// Number of markers currently owned by this layer.
    pub fn marker_count(&self) -> usize {
        self.markers.lock().len()
    }
}
