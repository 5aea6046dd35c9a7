//! # Seawatch Render
//!
//! Derivation of marker visual state from polled entity records: icon
//! resolution, zoom-dependent sizing, relative-time formatting, popup
//! fragments, and the marker factory itself.
//!
//! Everything here is a pure transform; placement on the drawing surface
//! belongs to the reconcilers in `seawatch-map`.

pub mod icons;
pub mod marker;
pub mod popup;
pub mod timefmt;

pub use icons::{resolve_icon, size_for_zoom, IconRef, MAX_ICON_PX, MIN_ICON_PX};
pub use marker::{build_marker, classify_buoy, Marker};
pub use popup::popup_html;
pub use timefmt::relative_since;
