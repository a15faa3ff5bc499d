pub mod config;
pub mod geo;
pub mod map;
pub mod viewport;

pub use config::{MapOptions, PinchZoomMode, PinchZoomResolution, TOUCH_ZOOM_DEPRECATION};
pub use geo::{LatLng, LatLngBounds, Point};
pub use map::{Map, MapState, ViewOwner, ViewToken};
pub use viewport::Viewport;
