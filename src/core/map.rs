use crate::{
    animation::{EasingType, FrameScheduler, FrameTask, PanAnimation, ZoomAnimation},
    core::{
        config::MapOptions,
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    input::{
        drag::Drag,
        events::{EventHandled, MapEvent, PointerEvent},
        handler::{EventManager, Handler, ListenerId},
        pinch_zoom::PinchZoom,
        pointer::{PointerTracker, PointerUpdate},
    },
    prelude::{Duration, Instant},
    MapError, Result,
};
use crossbeam_channel::Receiver;

/// Components that can take control of the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewOwner {
    PinchZoom,
    Drag,
    Animation,
}

/// Proof of control over the view, issued by [`MapState::claim`].
///
/// Only the most recently issued token owns the view; frame tasks issued
/// under an older token are dropped when they come up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewToken {
    owner: ViewOwner,
    id: u64,
}

impl ViewToken {
    pub fn new(owner: ViewOwner, id: u64) -> Self {
        Self { owner, id }
    }

    pub fn owner(&self) -> ViewOwner {
        self.owner
    }
}

#[derive(Debug, Clone, Copy)]
struct RunningAnimation {
    token: ViewToken,
    zoom: bool,
}

/// Everything the handlers need from the host map: the view, the options,
/// the event bus and the frame queue.
pub struct MapState {
    viewport: Viewport,
    options: MapOptions,
    events: EventManager,
    frames: FrameScheduler,
    owner: Option<ViewToken>,
    next_token: u64,
    animation: Option<RunningAnimation>,
}

impl MapState {
    fn new(viewport: Viewport, options: MapOptions) -> Self {
        Self {
            viewport,
            options,
            events: EventManager::new(),
            frames: FrameScheduler::new(),
            owner: None,
            next_token: 0,
            animation: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn center(&self) -> LatLng {
        self.viewport.center
    }

    pub fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    pub fn min_zoom(&self) -> f64 {
        self.viewport.min_zoom
    }

    pub fn max_zoom(&self) -> f64 {
        self.viewport.max_zoom
    }

    pub fn size(&self) -> Point {
        self.viewport.size
    }

    pub fn events(&mut self) -> &mut EventManager {
        &mut self.events
    }

    pub fn frames(&mut self) -> &mut FrameScheduler {
        &mut self.frames
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn lat_lng_to_container_point(&self, lat_lng: &LatLng) -> Point {
        self.viewport.lat_lng_to_container_point(lat_lng)
    }

    pub fn container_point_to_lat_lng(&self, point: &Point) -> LatLng {
        self.viewport.container_point_to_lat_lng(point)
    }

    /// Projects in world pixels at an arbitrary zoom
    pub fn project(&self, lat_lng: &LatLng, zoom: f64) -> Point {
        self.viewport.project(lat_lng, Some(zoom))
    }

    pub fn unproject(&self, point: &Point, zoom: f64) -> LatLng {
        self.viewport.unproject(point, Some(zoom))
    }

    /// Zoom level reached by scaling the map by `scale` starting at `from_zoom`
    pub fn get_scale_zoom(&self, scale: f64, from_zoom: f64) -> f64 {
        from_zoom + scale.log2()
    }

    /// Snaps to `zoom_snap` (unless it is zero) and clamps to the zoom limits
    pub fn limit_zoom(&self, zoom: f64) -> f64 {
        let snap = self.options.zoom_snap;
        let zoom = if snap > 0.0 {
            (zoom / snap).round() * snap
        } else {
            zoom
        };
        zoom.clamp(self.min_zoom(), self.max_zoom())
    }

    /// Takes control of the view. Pending frames of the previous owner are dropped.
    pub fn claim(&mut self, owner: ViewOwner) -> ViewToken {
        self.next_token += 1;
        let token = ViewToken::new(owner, self.next_token);
        if let Some(previous) = self.owner.replace(token) {
            self.frames.cancel_owned(previous);
        }
        token
    }

    pub fn owns(&self, token: ViewToken) -> bool {
        self.owner == Some(token)
    }

    pub fn release(&mut self, token: ViewToken) {
        if self.owns(token) {
            self.owner = None;
        }
    }

    /// Stops a running view animation where it currently is
    pub fn stop(&mut self) {
        let Some(running) = self.animation.take() else {
            return;
        };
        log::debug!("stopping view animation {:?}", running.token);
        self.frames.cancel_owned(running.token);
        self.release(running.token);
        self.fire_move_end(running.zoom);
    }

    /// Applies a view and fires `zoom` (if the zoom changed) and `move`
    pub fn move_view(&mut self, center: LatLng, zoom: f64, pinch: bool) {
        let previous_zoom = self.viewport.zoom;
        self.viewport.set_zoom(zoom);
        self.viewport.set_center(center);
        let center = self.viewport.center;

        if self.viewport.zoom != previous_zoom {
            self.events.fire(MapEvent::Zoom {
                zoom: self.viewport.zoom,
                center,
                pinch,
            });
        }
        self.events.fire(MapEvent::Move { center, pinch });
    }

    /// Moves the map content by a pixel offset, firing `move`
    pub fn pan_by(&mut self, offset: Point) {
        self.viewport.pan(offset);
        let center = self.viewport.center;
        self.events.fire(MapEvent::Move {
            center,
            pinch: false,
        });
    }

    pub fn fire_move_start(&mut self, zoom_changed: bool) {
        if zoom_changed {
            let zoom = self.viewport.zoom;
            self.events.fire(MapEvent::ZoomStart { zoom });
        }
        let center = self.viewport.center;
        self.events.fire(MapEvent::MoveStart { center });
    }

    pub fn fire_move_end(&mut self, zoom_changed: bool) {
        if zoom_changed {
            let zoom = self.viewport.zoom;
            self.events.fire(MapEvent::ZoomEnd { zoom });
        }
        let center = self.viewport.center;
        self.events.fire(MapEvent::MoveEnd { center });
    }

    /// Jumps to a view, wrapping it in start/end events
    pub fn reset_view(&mut self, center: LatLng, zoom: f64) {
        let zoom_changed = self.viewport.zoom != zoom.clamp(self.min_zoom(), self.max_zoom());
        self.fire_move_start(zoom_changed);
        self.move_view(center, zoom, false);
        self.fire_view_reset();
        self.fire_move_end(zoom_changed);
    }

    /// Lands a gesture whose start events were already fired
    pub fn finish_gesture_view(&mut self, center: LatLng, zoom: f64) {
        self.move_view(center, zoom, false);
        self.fire_view_reset();
        self.fire_move_end(true);
    }

    fn fire_view_reset(&mut self) {
        let center = self.viewport.center;
        let zoom = self.viewport.zoom;
        self.events.fire(MapEvent::ViewReset { center, zoom });
    }

    /// Animates to a view over frames. `started` means a gesture already
    /// fired the start events.
    pub fn animate_zoom(&mut self, center: LatLng, zoom: f64, now: Instant, started: bool) {
        self.stop();
        let token = self.claim(ViewOwner::Animation);
        if !started {
            self.fire_move_start(true);
        }
        self.events.fire(MapEvent::ZoomAnim { center, zoom });

        let animation = ZoomAnimation::new(
            self.viewport.center,
            center,
            self.viewport.zoom,
            zoom,
            now,
            Duration::from_millis(self.options.zoom_animation_duration_ms),
        );
        self.frames.request(FrameTask::ZoomAnimation { token, animation });
        self.animation = Some(RunningAnimation { token, zoom: true });
    }

    /// Glides the content by `offset` pixels over `duration`
    pub fn animate_pan(&mut self, offset: Point, duration: Duration, easing: EasingType, now: Instant) {
        self.stop();
        let token = self.claim(ViewOwner::Animation);
        let animation = PanAnimation::new(offset, now, duration, easing);
        self.frames.request(FrameTask::PanAnimation { token, animation });
        self.animation = Some(RunningAnimation { token, zoom: false });
    }

    fn finish_animation(&mut self, token: ViewToken) {
        let zoom = match self.animation {
            Some(running) if running.token == token => running.zoom,
            _ => return,
        };
        self.animation = None;
        self.release(token);
        self.fire_move_end(zoom);
    }

    /// Runs every queued frame task. Returns how many were applied.
    pub fn run_frames(&mut self, now: Instant) -> usize {
        let mut applied = 0;

        for (id, task) in self.frames.take_all() {
            if !self.owns(task.token()) {
                log::trace!("dropping stale frame {:?} for {:?}", id, task.token());
                continue;
            }
            applied += 1;

            match task {
                FrameTask::PinchMove { center, zoom, .. } => {
                    self.move_view(center, zoom, true);
                }
                FrameTask::ZoomAnimation { token, animation } => {
                    let step = animation.step(now);
                    self.move_view(step.center, step.zoom, false);
                    if step.finished {
                        self.finish_animation(token);
                    } else {
                        self.frames
                            .request(FrameTask::ZoomAnimation { token, animation });
                    }
                }
                FrameTask::PanAnimation {
                    token,
                    mut animation,
                } => {
                    let (delta, finished) = animation.step(now);
                    if !delta.is_zero() {
                        self.pan_by(delta);
                    }
                    if finished {
                        self.finish_animation(token);
                    } else {
                        self.frames
                            .request(FrameTask::PanAnimation { token, animation });
                    }
                }
            }
        }

        applied
    }
}

/// A map view driven by pointer input
pub struct Map {
    state: MapState,
    contacts: PointerTracker,
    dragging: Drag,
    pinch_zoom: PinchZoom,
}

impl Map {
    /// Creates a map with an 800x600 container
    pub fn new(options: MapOptions) -> Result<Self> {
        Self::with_size(options, Point::new(800.0, 600.0))
    }

    pub fn with_size(options: MapOptions, size: Point) -> Result<Self> {
        options.validate()?;
        validate_size(size)?;

        let resolution = options.pinch_zoom_resolution();
        if let Some(warning) = resolution.warning {
            log::warn!("{}", warning);
        }

        let mut viewport = Viewport::new(options.center, 0.0, size);
        viewport.set_zoom_limits(options.min_zoom, options.max_zoom);
        viewport.set_zoom(options.zoom);

        let mut pinch_zoom = PinchZoom::new();
        if !resolution.enabled {
            pinch_zoom.disable();
        }
        let mut dragging = Drag::new();
        if !options.dragging {
            dragging.disable();
        }

        Ok(Self {
            state: MapState::new(viewport, options),
            contacts: PointerTracker::new(),
            dragging,
            pinch_zoom,
        })
    }

    pub fn state(&self) -> &MapState {
        &self.state
    }

    pub fn viewport(&self) -> &Viewport {
        self.state.viewport()
    }

    pub fn options(&self) -> &MapOptions {
        self.state.options()
    }

    pub fn center(&self) -> LatLng {
        self.state.center()
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom()
    }

    pub fn min_zoom(&self) -> f64 {
        self.state.min_zoom()
    }

    pub fn max_zoom(&self) -> f64 {
        self.state.max_zoom()
    }

    pub fn size(&self) -> Point {
        self.state.size()
    }

    pub fn set_size(&mut self, size: Point) -> Result<()> {
        validate_size(size)?;
        self.state.viewport.set_size(size);
        Ok(())
    }

    pub fn bounds(&self) -> LatLngBounds {
        self.state.viewport.bounds()
    }

    pub fn contacts(&self) -> &PointerTracker {
        &self.contacts
    }

    pub fn lat_lng_to_container_point(&self, lat_lng: &LatLng) -> Point {
        self.state.lat_lng_to_container_point(lat_lng)
    }

    pub fn container_point_to_lat_lng(&self, point: &Point) -> LatLng {
        self.state.container_point_to_lat_lng(point)
    }

    pub fn get_scale_zoom(&self, scale: f64, from_zoom: f64) -> f64 {
        self.state.get_scale_zoom(scale, from_zoom)
    }

    pub fn limit_zoom(&self, zoom: f64) -> f64 {
        self.state.limit_zoom(zoom)
    }

    /// Sets center and zoom. The zoom is snapped and clamped. With `animate`
    /// (and `zoom_animation` enabled) the change plays out over frames.
    pub fn set_view(&mut self, center: LatLng, zoom: f64, animate: bool) -> Result<()> {
        if !center.is_finite() || !zoom.is_finite() {
            return Err(MapError::InvalidCoordinates(format!(
                "cannot set view to {:?} @ {}",
                center, zoom
            )));
        }

        self.cancel_gestures();
        let zoom = self.state.limit_zoom(zoom);
        if animate && self.state.options.zoom_animation {
            self.state.animate_zoom(center, zoom, Instant::now(), false);
        } else {
            self.state.stop();
            let token = self.state.claim(ViewOwner::Animation);
            self.state.reset_view(center, zoom);
            self.state.release(token);
        }
        Ok(())
    }

    pub fn set_zoom(&mut self, zoom: f64, animate: bool) -> Result<()> {
        let center = self.center();
        self.set_view(center, zoom, animate)
    }

    /// Stops a running view animation
    pub fn stop(&mut self) {
        self.state.stop();
    }

    pub fn is_animating(&self) -> bool {
        self.state.is_animating()
    }

    pub fn on<F>(&mut self, event_type: &str, callback: F) -> ListenerId
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.state.events.on(event_type, callback)
    }

    pub fn once<F>(&mut self, event_type: &str, callback: F) -> ListenerId
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.state.events.once(event_type, callback)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.state.events.off(id)
    }

    pub fn subscribe(&mut self, event_type: &str) -> Receiver<MapEvent> {
        self.state.events.subscribe(event_type)
    }

    /// Routes a pointer event through the contact tracker and the handlers
    pub fn handle_pointer(&mut self, event: PointerEvent) -> EventHandled {
        if self.contacts.apply(&event) == PointerUpdate::Ignored {
            log::debug!("ignoring {:?} for pointer {}", event.phase, event.id);
            return EventHandled::NotHandled;
        }

        let dragged = self
            .dragging
            .handle_pointer(&event, &self.contacts, &mut self.state);
        let pinched = self
            .pinch_zoom
            .handle_pointer(&event, &self.contacts, &mut self.state);
        dragged.or(pinched)
    }

    /// Runs queued frame tasks (pinch updates and animations) for time `now`
    pub fn run_frames(&mut self, now: Instant) -> usize {
        self.state.run_frames(now)
    }

    pub fn pinch_zoom(&self) -> &PinchZoom {
        &self.pinch_zoom
    }

    pub fn enable_pinch_zoom(&mut self) {
        self.pinch_zoom.enable();
    }

    /// Disables pinch zoom, ending a gesture in progress without animation
    pub fn disable_pinch_zoom(&mut self) {
        self.pinch_zoom.cancel(&mut self.state);
        self.pinch_zoom.disable();
    }

    pub fn dragging(&self) -> &Drag {
        &self.dragging
    }

    pub fn enable_dragging(&mut self) {
        self.dragging.enable();
    }

    /// Disables dragging, ending a drag in progress without inertia
    pub fn disable_dragging(&mut self) {
        self.dragging.cancel(&mut self.state);
        self.dragging.disable();
    }

    fn cancel_gestures(&mut self) {
        self.dragging.cancel(&mut self.state);
        self.pinch_zoom.cancel(&mut self.state);
    }
}

fn validate_size(size: Point) -> Result<()> {
    if size.x > 0.0 && size.y > 0.0 && size.x.is_finite() && size.y.is_finite() {
        Ok(())
    } else {
        Err(MapError::InvalidOptions(format!(
            "container size must be positive, got {}x{}",
            size.x, size.y
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn map_at(center: LatLng, zoom: f64) -> Map {
        let options = MapOptions {
            center,
            zoom,
            ..Default::default()
        };
        Map::with_size(options, Point::new(600.0, 600.0)).unwrap()
    }

    fn recorder(map: &mut Map, types: &[&str]) -> Arc<Mutex<Vec<&'static str>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        for event_type in types {
            let log = log.clone();
            map.on(event_type, move |event| {
                log.lock().unwrap().push(event.event_type());
            });
        }
        log
    }

    #[test]
    fn test_map_creation() {
        let map = map_at(LatLng::new(10.0, 20.0), 4.0);
        assert_eq!(map.center(), LatLng::new(10.0, 20.0));
        assert_eq!(map.zoom(), 4.0);
        assert_eq!(map.size(), Point::new(600.0, 600.0));
        assert!(map.pinch_zoom().enabled());
        assert!(map.dragging().enabled());
    }

    #[test]
    fn test_invalid_size_is_rejected() {
        let result = Map::with_size(MapOptions::default(), Point::new(0.0, 600.0));
        assert!(matches!(result, Err(MapError::InvalidOptions(_))));
    }

    #[test]
    fn test_scale_zoom() {
        let map = map_at(LatLng::default(), 0.0);
        assert_eq!(map.get_scale_zoom(8.0, 1.0), 4.0);
        assert_eq!(map.get_scale_zoom(0.5, 4.0), 3.0);
        assert!((map.get_scale_zoom(9.0, 1.0) - 4.169925).abs() < 1e-6);
    }

    #[test]
    fn test_limit_zoom_snaps_and_clamps() {
        let map = map_at(LatLng::default(), 0.0);
        assert_eq!(map.limit_zoom(4.17), 4.0);
        assert_eq!(map.limit_zoom(0.83), 1.0);
        assert_eq!(map.limit_zoom(-3.0), 0.0);
        assert_eq!(map.limit_zoom(25.0), 18.0);

        let options = MapOptions {
            zoom_snap: 0.0,
            ..Default::default()
        };
        let free = Map::new(options).unwrap();
        assert_eq!(free.limit_zoom(4.17), 4.17);
    }

    #[test]
    fn test_set_view_fires_reset_sequence() {
        let mut map = map_at(LatLng::default(), 1.0);
        let log = recorder(
            &mut map,
            &["zoomstart", "movestart", "zoom", "move", "viewreset", "zoomend", "moveend"],
        );

        map.set_view(LatLng::new(5.0, 5.0), 3.0, false).unwrap();

        assert_eq!(map.zoom(), 3.0);
        assert!(map.center().equals(&LatLng::new(5.0, 5.0)));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["zoomstart", "movestart", "zoom", "move", "viewreset", "zoomend", "moveend"]
        );
    }

    #[test]
    fn test_set_view_rejects_non_finite_input() {
        let mut map = map_at(LatLng::default(), 1.0);
        let result = map.set_view(LatLng::new(f64::NAN, 0.0), 2.0, false);
        assert!(matches!(result, Err(MapError::InvalidCoordinates(_))));
        assert_eq!(map.zoom(), 1.0);
    }

    #[test]
    fn test_animated_set_view_runs_over_frames() {
        let mut map = map_at(LatLng::default(), 1.0);
        let ends = map.subscribe("zoomend");

        map.set_view(LatLng::default(), 3.0, true).unwrap();
        assert!(map.is_animating());
        assert_eq!(map.zoom(), 1.0);

        let later = Instant::now() + Duration::from_secs(1);
        assert_eq!(map.run_frames(later), 1);

        assert_eq!(map.zoom(), 3.0);
        assert!(!map.is_animating());
        assert_eq!(ends.try_iter().count(), 1);
        assert_eq!(map.run_frames(later), 0);
    }

    #[test]
    fn test_claim_drops_frames_of_previous_owner() {
        let mut map = map_at(LatLng::default(), 1.0);
        map.set_view(LatLng::default(), 3.0, true).unwrap();

        let state = &mut map.state;
        state.claim(ViewOwner::PinchZoom);
        assert!(state.frames().is_empty());
    }

    #[test]
    fn test_stop_ends_running_animation() {
        let mut map = map_at(LatLng::default(), 1.0);
        let ends = map.subscribe("zoomend");
        map.set_view(LatLng::default(), 5.0, true).unwrap();

        map.stop();

        assert!(!map.is_animating());
        assert_eq!(ends.try_iter().count(), 1);
        assert_eq!(map.run_frames(Instant::now() + Duration::from_secs(1)), 0);
        assert_eq!(map.zoom(), 1.0);
    }
}
