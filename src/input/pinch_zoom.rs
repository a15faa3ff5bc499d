//! Two-finger pinch zoom.
//!
//! A session opens when a second contact goes down and follows exactly those
//! two contacts until one of them lifts. While it runs, the zoom follows the
//! ratio of the current to the initial finger distance
//! (`zoom = start_zoom + log2(d1 / d0)`) and the map point that was under the
//! fingers' midpoint stays under it. View updates are queued as
//! [`FrameTask::PinchMove`] frames, one pending at a time. When the session
//! ends the zoom is snapped and clamped, either instantly or through a zoom
//! animation depending on `zoom_animation`.

use crate::{
    animation::{FrameId, FrameTask},
    core::{
        config::PinchZoomMode,
        geo::{LatLng, Point},
        map::{MapState, ViewOwner, ViewToken},
    },
    input::{
        events::{EventHandled, PointerEvent, PointerId, PointerPhase},
        handler::Handler,
        pointer::PointerTracker,
    },
    prelude::Instant,
};

/// Contacts closer than this many pixels cannot start a pinch
const MIN_START_DISTANCE: f64 = 1.0;

/// State of an active pinch gesture
#[derive(Debug, Clone, PartialEq)]
pub struct PinchSession {
    contacts: [PointerId; 2],
    token: ViewToken,
    start_distance: f64,
    start_zoom: f64,
    /// Container point of the view center
    center_point: Point,
    /// LatLng under the view center when the session opened
    start_lat_lng: LatLng,
    /// LatLng under the fingers' midpoint when the session opened
    pinch_start_lat_lng: LatLng,
    center: LatLng,
    zoom: f64,
    moved: bool,
    frame: Option<FrameId>,
}

impl PinchSession {
    pub fn contacts(&self) -> [PointerId; 2] {
        self.contacts
    }

    pub fn start_distance(&self) -> f64 {
        self.start_distance
    }

    pub fn start_zoom(&self) -> f64 {
        self.start_zoom
    }

    /// Latest computed center
    pub fn center(&self) -> LatLng {
        self.center
    }

    /// Latest computed (unsnapped) zoom
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn moved(&self) -> bool {
        self.moved
    }

    fn involves(&self, id: PointerId) -> bool {
        self.contacts.contains(&id)
    }
}

/// Pinch zoom handler
#[derive(Debug, Clone)]
pub struct PinchZoom {
    enabled: bool,
    session: Option<PinchSession>,
}

impl PinchZoom {
    pub fn new() -> Self {
        Self {
            enabled: true,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&PinchSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    fn on_pointer_down(&mut self, contacts: &PointerTracker, map: &mut MapState) -> EventHandled {
        if self.session.is_some() {
            log::debug!("pinch already active, ignoring extra contact");
            return EventHandled::NotHandled;
        }
        if contacts.len() != 2 {
            return EventHandled::NotHandled;
        }
        let Some((first, second)) = contacts.first_two() else {
            return EventHandled::NotHandled;
        };

        let start_distance = first.position.distance_to(&second.position);
        if start_distance < MIN_START_DISTANCE {
            log::debug!("contacts {} and {} coincide, not pinching", first.id, second.id);
            return EventHandled::NotHandled;
        }

        // a new gesture overrides whatever animation is in flight
        map.stop();
        let token = map.claim(ViewOwner::PinchZoom);

        let center_point = map.size().divide(2.0);
        let midpoint = first.position.midpoint(&second.position);
        let session = PinchSession {
            contacts: [first.id, second.id],
            token,
            start_distance,
            start_zoom: map.zoom(),
            center_point,
            start_lat_lng: map.container_point_to_lat_lng(&center_point),
            pinch_start_lat_lng: map.container_point_to_lat_lng(&midpoint),
            center: map.center(),
            zoom: map.zoom(),
            moved: false,
            frame: None,
        };

        log::debug!(
            "pinch started with contacts {:?}, distance {:.1}px at zoom {:.3}",
            session.contacts,
            start_distance,
            session.start_zoom
        );
        self.session = Some(session);
        EventHandled::Handled
    }

    fn on_pointer_move(
        &mut self,
        event: &PointerEvent,
        contacts: &PointerTracker,
        map: &mut MapState,
    ) -> EventHandled {
        let Some(session) = self.session.as_mut() else {
            return EventHandled::NotHandled;
        };
        if !session.involves(event.id) {
            return EventHandled::NotHandled;
        }
        let (Some(a), Some(b)) = (
            contacts.get(session.contacts[0]),
            contacts.get(session.contacts[1]),
        ) else {
            return EventHandled::NotHandled;
        };

        let (p1, p2) = (a.position, b.position);
        let scale = p1.distance_to(&p2) / session.start_distance;
        let mut zoom = map.get_scale_zoom(scale, session.start_zoom);
        if !zoom.is_finite() {
            // fingers met: log2(0)
            zoom = map.min_zoom();
        }
        let zoom = zoom.clamp(map.min_zoom(), map.max_zoom());

        let center = match map.options().pinch_zoom_mode {
            PinchZoomMode::Center => {
                if scale == 1.0 && !session.moved {
                    return EventHandled::Handled;
                }
                session.start_lat_lng
            }
            PinchZoomMode::Focal => {
                let delta = p1.midpoint(&p2).subtract(&session.center_point);
                if scale == 1.0 && delta.is_zero() && !session.moved {
                    return EventHandled::Handled;
                }
                let focal = map.project(&session.pinch_start_lat_lng, zoom);
                map.unproject(&focal.subtract(&delta), zoom)
            }
        };

        if !session.moved {
            map.fire_move_start(true);
            session.moved = true;
        }

        if let Some(frame) = session.frame.take() {
            map.frames().cancel(frame);
        }
        session.center = center;
        session.zoom = zoom;
        session.frame = Some(map.frames().request(FrameTask::PinchMove {
            token: session.token,
            center,
            zoom,
        }));

        log::trace!("pinch scale {:.3} -> zoom {:.3} at {:?}", scale, zoom, center);
        EventHandled::Handled
    }

    fn on_pointer_end(&mut self, event: &PointerEvent, map: &mut MapState) -> EventHandled {
        match &self.session {
            Some(session) if session.involves(event.id) => {
                self.end_session(map, Some(event.timestamp));
                EventHandled::Handled
            }
            _ => EventHandled::NotHandled,
        }
    }

    /// Closes the session and lands the view on the limited zoom.
    /// `animate_from` is the animation start time, `None` for no animation.
    fn end_session(&mut self, map: &mut MapState, animate_from: Option<Instant>) {
        let Some(session) = self.session.take() else {
            return;
        };
        if let Some(frame) = session.frame {
            map.frames().cancel(frame);
        }

        if !session.moved || !map.owns(session.token) {
            log::debug!("pinch ended without moving the view");
            map.release(session.token);
            return;
        }

        let zoom = map.limit_zoom(session.zoom);
        log::debug!(
            "pinch ended at zoom {:.3}, landing on {}",
            session.zoom,
            zoom
        );

        match animate_from {
            Some(now) if map.options().zoom_animation => {
                // apply the last pinch update before animating from it
                map.move_view(session.center, session.zoom, true);
                map.animate_zoom(session.center, zoom, now, true);
            }
            _ => {
                map.finish_gesture_view(session.center, zoom);
                map.release(session.token);
            }
        }
    }
}

impl Default for PinchZoom {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for PinchZoom {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        contacts: &PointerTracker,
        map: &mut MapState,
    ) -> EventHandled {
        if !self.enabled {
            self.cancel(map);
            return EventHandled::NotHandled;
        }

        match event.phase {
            PointerPhase::Down => self.on_pointer_down(contacts, map),
            PointerPhase::Move => self.on_pointer_move(event, contacts, map),
            PointerPhase::Up | PointerPhase::Cancel => self.on_pointer_end(event, map),
        }
    }

    fn cancel(&mut self, map: &mut MapState) {
        self.end_session(map, None);
    }
}
