pub mod drag;
pub mod events;
pub mod handler;
pub mod pinch_zoom;
pub mod pointer;

#[cfg(feature = "egui")]
pub mod egui_touch;
#[cfg(feature = "wasm")]
pub mod web;

// Re-export the essential types
pub use drag::Drag;
pub use events::{EventHandled, MapEvent, PointerEvent, PointerId, PointerPhase};
pub use handler::{EventManager, Handler, ListenerId};
pub use pinch_zoom::{PinchSession, PinchZoom};
pub use pointer::{PointerContact, PointerTracker, PointerUpdate};
