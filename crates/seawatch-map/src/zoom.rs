//! Zoom reactor.
//!
//! Listens for zoom changes from the drawing surface and restyles the placed
//! ship markers: icon size and rotation only, no feed contact, no popup
//! rebuild. Repeated notifications at the same zoom are no-ops.

use crate::layers::ShipLayerReconciler;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Restyles ship markers when the surface zoom changes.
pub struct ZoomReactor {
    ships: Arc<ShipLayerReconciler>,
}

impl ZoomReactor {
    /// Creates a reactor over the ship layer.
    pub fn new(ships: Arc<ShipLayerReconciler>) -> Self {
        Self { ships }
    }

    /// Runs until the zoom channel closes or the token is cancelled.
    pub async fn run(
        self,
        mut zoom_rx: tokio::sync::watch::Receiver<f64>,
        token: CancellationToken,
    ) {
        let mut last_zoom = *zoom_rx.borrow();

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                changed = zoom_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let zoom = *zoom_rx.borrow_and_update();
                    if zoom == last_zoom {
                        continue;
                    }
                    debug!(from = last_zoom, to = zoom, "zoom changed, restyling ship markers");
                    self.ships.restyle(zoom);
                    last_zoom = zoom;
                }
            }
        }
    }
}
