//! # Seawatch Map
//!
//! The marker lifecycle and reconciliation engine: per-layer full-replace
//! reconcilers, spatial suppression of ships against fixed infrastructure,
//! zoom-reactive restyling, the live overlay widgets, and the session that
//! owns all timers.
//!
//! The actual map renderer is a collaborator behind the [`MapSurface`] trait;
//! this crate ships a tracing-backed headless implementation for running
//! without one, and a recording implementation for tests.

pub mod layers;
pub mod session;
pub mod surface;
pub mod widgets;
pub mod zoom;

pub use layers::{FixedLayerReconciler, FixedPositions, LayerKind, ShipLayerReconciler};
pub use session::MapSession;
pub use surface::{MapSurface, RecordingSurface, SurfaceOp, TraceSurface};
pub use widgets::{SensorWidget, WeatherWidget};
pub use zoom::ZoomReactor;
