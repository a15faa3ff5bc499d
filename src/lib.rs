//! # pinchmap
//!
//! Touch gesture handling for a Leaflet-style map view.
//!
//! The crate models a map host (center, zoom, zoom limits, container size)
//! together with the handlers that drive it from raw pointer input: a
//! two-finger pinch-zoom controller and a single-finger drag handler. View
//! updates are scheduled as frame tasks so that hosts can run them from their
//! own event loop.

pub mod animation;
pub mod core;
pub mod input;
pub mod prelude;
pub mod traits;

// Re-export public API
pub use crate::core::{
    config::{
        resolve_pinch_zoom, MapOptions, PinchZoomMode, PinchZoomResolution, TOUCH_ZOOM_DEPRECATION,
    },
    geo::{LatLng, LatLngBounds, Point},
    map::{Map, MapState},
    viewport::Viewport,
};

pub use input::{
    drag::Drag,
    events::{EventHandled, MapEvent, PointerEvent, PointerId, PointerPhase},
    handler::{EventManager, Handler, ListenerId},
    pinch_zoom::{PinchSession, PinchZoom},
    pointer::{PointerContact, PointerTracker},
};

pub use animation::{FrameScheduler, FrameTask, PanAnimation, ZoomAnimation};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Invalid zoom limits: min {min} is greater than max {max}")]
    InvalidZoomLimits { min: f64, max: f64 },

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs `env_logger` as the global logger, honouring `RUST_LOG`.
///
/// Calling this more than once is harmless.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::builder().try_init();
}
