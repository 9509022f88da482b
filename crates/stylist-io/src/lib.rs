//! stylist-io — Photo decoding, detector output parsing and debug overlays.
//!
//! Everything that touches files or image formats lives here so that
//! `stylist-core` stays pure.

pub mod detections;
pub mod frame;
pub mod overlay;

pub use detections::{DetectedFace, DetectionSet, DetectionsError};
pub use frame::{Frame, FrameError};
pub use overlay::{render_overlay, save_overlay, OverlayError};
