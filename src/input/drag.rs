//! Single-contact panning with inertia

use crate::{
    animation::EasingType,
    core::{
        geo::Point,
        map::{MapState, ViewOwner, ViewToken},
    },
    input::{
        events::{EventHandled, MapEvent, PointerEvent, PointerId, PointerPhase},
        handler::Handler,
        pointer::PointerTracker,
    },
    prelude::{Duration, Instant, VecDeque},
};

/// Only positions this recent feed the release velocity
const VELOCITY_WINDOW: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
struct DragSession {
    id: PointerId,
    start: Point,
    last: Point,
    /// Set once the contact leaves the click tolerance
    token: Option<ViewToken>,
    samples: VecDeque<(Point, Instant)>,
}

impl DragSession {
    fn record(&mut self, position: Point, time: Instant) {
        self.samples.push_back((position, time));
        while let Some((_, oldest)) = self.samples.front() {
            if time.duration_since(*oldest) > VELOCITY_WINDOW {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }
}

/// Drag-to-pan handler
#[derive(Debug, Clone)]
pub struct Drag {
    enabled: bool,
    session: Option<DragSession>,
}

impl Drag {
    pub fn new() -> Self {
        Self {
            enabled: true,
            session: None,
        }
    }

    /// Whether a contact is down and has moved past the click tolerance
    pub fn is_dragging(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.token.is_some())
    }

    /// Contact currently tracked, moved or not
    pub fn contact(&self) -> Option<PointerId> {
        self.session.as_ref().map(|session| session.id)
    }

    fn on_pointer_down(
        &mut self,
        event: &PointerEvent,
        contacts: &PointerTracker,
        map: &mut MapState,
    ) -> EventHandled {
        if self.session.is_some() {
            // a second finger turns the gesture into something else
            log::debug!("drag aborted by contact {}", event.id);
            self.finish(map, None);
            return EventHandled::NotHandled;
        }
        if contacts.len() != 1 {
            return EventHandled::NotHandled;
        }

        self.session = Some(DragSession {
            id: event.id,
            start: event.position,
            last: event.position,
            token: None,
            samples: VecDeque::new(),
        });
        EventHandled::NotHandled
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, map: &mut MapState) -> EventHandled {
        let Some(session) = self.session.as_mut() else {
            return EventHandled::NotHandled;
        };
        if session.id != event.id {
            return EventHandled::NotHandled;
        }

        let token = match session.token {
            Some(token) => token,
            None => {
                let offset = event.position.subtract(&session.start);
                if offset.length() < map.options().click_tolerance {
                    return EventHandled::NotHandled;
                }
                map.stop();
                let token = map.claim(ViewOwner::Drag);
                session.token = Some(token);
                session.record(session.start, event.timestamp);
                log::debug!("drag started by contact {}", session.id);
                map.fire_move_start(false);
                map.events().fire(MapEvent::DragStart);
                token
            }
        };

        if !map.owns(token) {
            // something else took the view
            self.session = None;
            return EventHandled::NotHandled;
        }

        let delta = event.position.subtract(&session.last);
        session.last = event.position;
        session.record(event.position, event.timestamp);
        if !delta.is_zero() {
            map.pan_by(delta);
            let center = map.center();
            map.events().fire(MapEvent::Drag { center });
        }
        EventHandled::Handled
    }

    fn on_pointer_end(&mut self, event: &PointerEvent, map: &mut MapState) -> EventHandled {
        match &self.session {
            Some(session) if session.id == event.id => {
                let handled = if session.token.is_some() {
                    EventHandled::Handled
                } else {
                    EventHandled::NotHandled
                };
                let release = if event.phase == PointerPhase::Up {
                    Some(event.timestamp)
                } else {
                    None
                };
                self.finish(map, release);
                handled
            }
            _ => EventHandled::NotHandled,
        }
    }

    /// Ends the drag. `released_at` is the release time when inertia may apply.
    fn finish(&mut self, map: &mut MapState, released_at: Option<Instant>) {
        let Some(session) = self.session.take() else {
            return;
        };
        let Some(token) = session.token else {
            return;
        };
        if !map.owns(token) {
            return;
        }

        let distance = session.last.distance_to(&session.start);
        log::debug!("drag ended after {:.1}px", distance);
        map.events().fire(MapEvent::DragEnd { distance });
        map.release(token);

        let glide = released_at.and_then(|now| inertia_offset(&session, map, now));
        match (glide, released_at) {
            (Some((offset, duration)), Some(now)) => {
                let ease = map.options().ease_linearity;
                log::trace!("inertia glide {:?} over {:?}", offset, duration);
                map.animate_pan(
                    offset,
                    duration,
                    EasingType::EaseOutPower(1.0 / ease.max(0.2)),
                    now,
                );
            }
            _ => map.fire_move_end(false),
        }
    }
}

/// Offset and duration of the inertial glide after a release at `now`
fn inertia_offset(session: &DragSession, map: &MapState, now: Instant) -> Option<(Point, Duration)> {
    let options = map.options();
    if !options.inertia || session.samples.len() < 2 {
        return None;
    }
    let (first, first_time) = session.samples.front()?;
    let (last, last_time) = session.samples.back()?;
    if now.duration_since(*last_time) > VELOCITY_WINDOW {
        // the finger rested before lifting
        return None;
    }

    let elapsed = last_time.duration_since(*first_time).as_secs_f64();
    if elapsed <= 0.0 {
        return None;
    }
    let ease = options.ease_linearity;
    let speed_vector = last.subtract(first).multiply(ease / elapsed);
    let speed = speed_vector.length();
    if speed <= 0.0 {
        return None;
    }

    let limited_speed = speed.min(options.inertia_max_speed);
    let limited_vector = speed_vector.multiply(limited_speed / speed);
    let deceleration = limited_speed / (options.inertia_deceleration * ease);
    let offset = limited_vector.multiply(deceleration / 2.0).round();
    if offset.is_zero() {
        return None;
    }
    // absurdly slow deceleration gives a glide no Duration can hold
    let duration = Duration::try_from_secs_f64(deceleration).ok()?;
    Some((offset, duration))
}

impl Default for Drag {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for Drag {
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
            PointerPhase::Down => self.on_pointer_down(event, contacts, map),
            PointerPhase::Move => self.on_pointer_move(event, map),
            PointerPhase::Up | PointerPhase::Cancel => self.on_pointer_end(event, map),
        }
    }

    fn cancel(&mut self, map: &mut MapState) {
        self.finish(map, None);
    }
}
