//! The drawing-surface capability boundary.
//!
//! The map renderer itself is a collaborator, not part of this repository.
//! Reconcilers and widgets receive the narrow [`MapSurface`] trait behind an
//! `Arc`, which keeps the dependency direction one-way: components know the
//! surface, the surface knows nothing about them.

use parking_lot::Mutex;
use seawatch_render::{IconRef, Marker};
use tokio::sync::watch;
use tracing::debug;

/// Drawing capability consumed by the reconciliation engine.
///
/// Markers are keyed by entity identifier: placing a marker with an id that is
/// already on the surface replaces it. Controls are HTML fragment slots keyed
/// by control id and anchored at a named screen corner.
pub trait MapSurface: Send + Sync {
    /// Places or replaces a marker.
    fn add_marker(&self, marker: &Marker);

    /// Removes a marker; unknown ids are ignored.
    fn remove_marker(&self, id: &str);

    /// Restyles an already-placed marker without touching its popup.
    fn update_marker_icon(&self, id: &str, icon: IconRef, size_px: u32, rotation_deg: f64);

    /// Places or replaces a control fragment at a named anchor.
    fn set_control(&self, anchor: &str, id: &str, html: &str);

    /// Removes a control; unknown ids are ignored.
    fn remove_control(&self, id: &str);

    /// Current zoom level.
    fn zoom(&self) -> f64;

    /// Subscribes to zoom changes. The receiver always holds the latest zoom.
    fn zoom_changes(&self) -> watch::Receiver<f64>;
}

/// Headless surface for running without a renderer attached.
///
/// Marker and control operations are logged at debug level; zoom changes are
/// driven externally through [`TraceSurface::set_zoom`].
pub struct TraceSurface {
    zoom_tx: watch::Sender<f64>,
}

impl TraceSurface {
    /// Creates a headless surface at the given initial zoom.
    pub fn new(zoom: f64) -> Self {
        let (zoom_tx, _) = watch::channel(zoom);
        Self { zoom_tx }
    }

    /// Sets the zoom level, notifying subscribers.
    pub fn set_zoom(&self, zoom: f64) {
        self.zoom_tx.send_replace(zoom);
    }
}

impl MapSurface for TraceSurface {
    fn add_marker(&self, marker: &Marker) {
        debug!(
            id = %marker.id,
            position = %marker.position,
            icon = marker.icon.path(),
            size_px = marker.size_px,
            rotation = marker.rotation_deg,
            "place marker"
        );
    }

    fn remove_marker(&self, id: &str) {
        debug!(id, "remove marker");
    }

    fn update_marker_icon(&self, id: &str, icon: IconRef, size_px: u32, rotation_deg: f64) {
        debug!(id, icon = icon.path(), size_px, rotation = rotation_deg, "restyle marker");
    }

    fn set_control(&self, anchor: &str, id: &str, html: &str) {
        debug!(anchor, id, bytes = html.len(), "set control");
    }

    fn remove_control(&self, id: &str) {
        debug!(id, "remove control");
    }

    fn zoom(&self) -> f64 {
        *self.zoom_tx.borrow()
    }

    fn zoom_changes(&self) -> watch::Receiver<f64> {
        self.zoom_tx.subscribe()
    }
}

/// One recorded surface operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    /// Marker placed or replaced
    AddMarker(Marker),
    /// Marker removed
    RemoveMarker(String),
    /// Marker restyled by the zoom reactor
    UpdateIcon {
        id: String,
        icon: IconRef,
        size_px: u32,
        rotation_deg: f64,
    },
    /// Control fragment placed or replaced
    SetControl {
        anchor: String,
        id: String,
        html: String,
    },
    /// Control removed
    RemoveControl(String),
}

/// Surface that records every operation, for assertions in tests.
pub struct RecordingSurface {
    zoom_tx: watch::Sender<f64>,
    ops: Mutex<Vec<SurfaceOp>>,
}

impl RecordingSurface {
    /// Creates a recording surface at the given initial zoom.
    pub fn new(zoom: f64) -> Self {
        let (zoom_tx, _) = watch::channel(zoom);
        Self {
            zoom_tx,
            ops: Mutex::new(Vec::new()),
        }
    }

    /// Sets the zoom level, notifying subscribers.
    pub fn set_zoom(&self, zoom: f64) {
        self.zoom_tx.send_replace(zoom);
    }

    /// Snapshot of all recorded operations.
    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.ops.lock().clone()
    }

    /// Ids of markers currently on the surface (placed and not removed).
    pub fn placed_marker_ids(&self) -> Vec<String> {
        let mut placed = Vec::new();
        for op in self.ops.lock().iter() {
            match op {
                SurfaceOp::AddMarker(marker) => {
                    if !placed.contains(&marker.id) {
                        placed.push(marker.id.clone());
                    }
                }
                SurfaceOp::RemoveMarker(id) => placed.retain(|p| p != id),
                _ => {}
            }
        }
        placed
    }

    /// Number of `SetControl` operations recorded for a control id.
    pub fn control_render_count(&self, control_id: &str) -> usize {
        self.ops
            .lock()
            .iter()
            .filter(|op| matches!(op, SurfaceOp::SetControl { id, .. } if id == control_id))
            .count()
    }

    /// Latest HTML rendered into a control, if any.
    pub fn control_html(&self, control_id: &str) -> Option<String> {
        self.ops
            .lock()
            .iter()
            .rev()
            .find_map(|op| match op {
                SurfaceOp::SetControl { id, html, .. } if id == control_id => Some(html.clone()),
                _ => None,
            })
    }

    fn record(&self, op: SurfaceOp) {
        self.ops.lock().push(op);
    }
}

impl MapSurface for RecordingSurface {
    fn add_marker(&self, marker: &Marker) {
        self.record(SurfaceOp::AddMarker(marker.clone()));
    }

    fn remove_marker(&self, id: &str) {
        self.record(SurfaceOp::RemoveMarker(id.to_string()));
    }

    fn update_marker_icon(&self, id: &str, icon: IconRef, size_px: u32, rotation_deg: f64) {
        self.record(SurfaceOp::UpdateIcon {
            id: id.to_string(),
            icon,
            size_px,
            rotation_deg,
        });
    }

    fn set_control(&self, anchor: &str, id: &str, html: &str) {
        self.record(SurfaceOp::SetControl {
            anchor: anchor.to_string(),
            id: id.to_string(),
            html: html.to_string(),
        });
    }

    fn remove_control(&self, id: &str) {
        self.record(SurfaceOp::RemoveControl(id.to_string()));
    }

    fn zoom(&self) -> f64 {
        *self.zoom_tx.borrow()
    }

    fn zoom_changes(&self) -> watch::Receiver<f64> {
        self.zoom_tx.subscribe()
    }
}
