//! DOM pointer events for wasm hosts

use crate::{
    core::{geo::Point, map::Map},
    input::events::{EventHandled, PointerEvent, PointerPhase},
    prelude::Instant,
};
use web_sys::Element;

/// Converts a DOM pointer event into a pointer event relative to the map
/// container. Returns `None` for event types other than
/// `pointerdown`/`pointermove`/`pointerup`/`pointercancel`.
pub fn pointer_event(event: &web_sys::PointerEvent, container: &Element) -> Option<PointerEvent> {
    let phase = match event.type_().as_str() {
        "pointerdown" => PointerPhase::Down,
        "pointermove" => PointerPhase::Move,
        "pointerup" => PointerPhase::Up,
        "pointercancel" => PointerPhase::Cancel,
        _ => return None,
    };
    let id = u64::try_from(event.pointer_id()).ok()?;

    let rect = container.get_bounding_client_rect();
    let position = Point::new(
        event.client_x() as f64 - rect.left(),
        event.client_y() as f64 - rect.top(),
    );
    Some(PointerEvent::new(id, phase, position, Instant::now()))
}

/// Feeds a DOM pointer event to the map, preventing the browser default
/// (scrolling, native zoom) when the map consumed it
pub fn handle_pointer_event(
    map: &mut Map,
    event: &web_sys::PointerEvent,
    container: &Element,
) -> EventHandled {
    let Some(pointer) = pointer_event(event, container) else {
        return EventHandled::NotHandled;
    };
    let handled = map.handle_pointer(pointer);
    if handled == EventHandled::Handled {
        event.prevent_default();
    }
    handled
}
