//! Feeding egui touch and mouse input into a [`Map`]

use crate::{
    core::{geo::Point, map::Map},
    input::events::{EventHandled, PointerEvent, PointerId, PointerPhase},
    prelude::Instant,
};
use egui::{Event, Pos2, Rect, TouchPhase};

/// Pointer id used for the primary mouse button. Touch ids come from egui.
pub const MOUSE_POINTER_ID: PointerId = u64::MAX;

/// Converts an egui event into a pointer event relative to `origin`, the
/// top-left corner of the map's rect. Events that are not touch or primary
/// mouse input give `None`.
pub fn pointer_event(event: &Event, origin: Pos2, now: Instant) -> Option<PointerEvent> {
    let relative = |pos: &Pos2| Point::new((pos.x - origin.x) as f64, (pos.y - origin.y) as f64);

    match event {
        Event::Touch { id, phase, pos, .. } => {
            let phase = match phase {
                TouchPhase::Start => PointerPhase::Down,
                TouchPhase::Move => PointerPhase::Move,
                TouchPhase::End => PointerPhase::Up,
                TouchPhase::Cancel => PointerPhase::Cancel,
            };
            Some(PointerEvent::new(id.0, phase, relative(pos), now))
        }
        Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            ..
        } => {
            let phase = if *pressed {
                PointerPhase::Down
            } else {
                PointerPhase::Up
            };
            Some(PointerEvent::new(MOUSE_POINTER_ID, phase, relative(pos), now))
        }
        Event::PointerMoved(pos) => Some(PointerEvent::moved(MOUSE_POINTER_ID, relative(pos), now)),
        _ => None,
    }
}

/// Routes this frame's egui events into the map, then runs its queued frames.
///
/// Contacts that start outside `rect` are not tracked; moves of untracked
/// pointers are ignored by the map.
pub fn handle_events(map: &mut Map, events: &[Event], rect: Rect, now: Instant) -> EventHandled {
    let mut handled = EventHandled::NotHandled;

    for event in events {
        let Some(pointer) = pointer_event(event, rect.min, now) else {
            continue;
        };
        if pointer.phase == PointerPhase::Down {
            let inside = rect.contains(Pos2::new(
                rect.min.x + pointer.position.x as f32,
                rect.min.y + pointer.position.y as f32,
            ));
            if !inside {
                continue;
            }
        }
        handled = handled.or(map.handle_pointer(pointer));
    }

    map.run_frames(now);
    handled
}
