use crate::core::geo::{LatLng, Point};
use crate::prelude::Instant;
use serde::{Deserialize, Serialize};

/// Stable identifier of a physical touch/pointer contact
pub type PointerId = u64;

/// Lifecycle phase of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// A raw pointer/touch event in container coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub phase: PointerPhase,
    pub position: Point,
    pub timestamp: Instant,
}

impl PointerEvent {
    pub fn new(id: PointerId, phase: PointerPhase, position: Point, timestamp: Instant) -> Self {
        Self {
            id,
            phase,
            position,
            timestamp,
        }
    }

    pub fn down(id: PointerId, position: Point, timestamp: Instant) -> Self {
        Self::new(id, PointerPhase::Down, position, timestamp)
    }

    pub fn moved(id: PointerId, position: Point, timestamp: Instant) -> Self {
        Self::new(id, PointerPhase::Move, position, timestamp)
    }

    pub fn up(id: PointerId, position: Point, timestamp: Instant) -> Self {
        Self::new(id, PointerPhase::Up, position, timestamp)
    }

    pub fn cancel(id: PointerId, position: Point, timestamp: Instant) -> Self {
        Self::new(id, PointerPhase::Cancel, position, timestamp)
    }

    /// Up and cancel both end a contact
    pub fn is_end(&self) -> bool {
        matches!(self.phase, PointerPhase::Up | PointerPhase::Cancel)
    }
}

/// Whether an event was handled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventHandled {
    Handled,
    NotHandled,
}

impl EventHandled {
    pub fn or(self, other: EventHandled) -> EventHandled {
        if self == EventHandled::Handled {
            self
        } else {
            other
        }
    }
}

/// Map event types that can be emitted by the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapEvent {
    /// Zoom started
    ZoomStart { zoom: f64 },
    /// Zoom level changed; `pinch` is set for updates driven by a pinch gesture
    Zoom {
        zoom: f64,
        center: LatLng,
        pinch: bool,
    },
    /// An animated zoom towards `zoom` began
    ZoomAnim { center: LatLng, zoom: f64 },
    /// Zoom ended
    ZoomEnd { zoom: f64 },
    /// Pan started
    MoveStart { center: LatLng },
    /// Center changed
    Move { center: LatLng, pinch: bool },
    /// Pan ended
    MoveEnd { center: LatLng },
    /// The view was reset without animation
    ViewReset { center: LatLng, zoom: f64 },
    /// A single-contact drag started
    DragStart,
    /// A single-contact drag moved the map
    Drag { center: LatLng },
    /// A single-contact drag ended, `distance` in pixels
    DragEnd { distance: f64 },
}

impl MapEvent {
    /// The name listeners register for
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::ZoomStart { .. } => "zoomstart",
            MapEvent::Zoom { .. } => "zoom",
            MapEvent::ZoomAnim { .. } => "zoomanim",
            MapEvent::ZoomEnd { .. } => "zoomend",
            MapEvent::MoveStart { .. } => "movestart",
            MapEvent::Move { .. } => "move",
            MapEvent::MoveEnd { .. } => "moveend",
            MapEvent::ViewReset { .. } => "viewreset",
            MapEvent::DragStart => "dragstart",
            MapEvent::Drag { .. } => "drag",
            MapEvent::DragEnd { .. } => "dragend",
        }
    }

    /// Whether this update was produced by a pinch gesture
    pub fn is_pinch(&self) -> bool {
        matches!(
            self,
            MapEvent::Zoom { pinch: true, .. } | MapEvent::Move { pinch: true, .. }
        )
    }
}
