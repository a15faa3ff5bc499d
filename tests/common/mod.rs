//! Shared helpers for driving a map with synthetic touches
#![allow(dead_code)]

use pinchmap::prelude::*;

/// Container used by the gesture tests; its center is (300, 300)
pub const SIZE: f64 = 600.0;
pub const FRAME: Duration = Duration::from_millis(16);

/// Deterministic clock advanced one frame at a time
pub struct Clock {
    now: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            now: Instant::now(),
        }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn tick(&mut self) -> Instant {
        self.now += FRAME;
        self.now
    }
}

pub fn map_with(options: MapOptions) -> Map {
    #[cfg(feature = "debug")]
    pinchmap::init_logging();
    Map::with_size(options, Point::new(SIZE, SIZE)).unwrap()
}

pub fn map_at_zoom(zoom: f64, zoom_animation: bool) -> Map {
    map_with(MapOptions {
        zoom,
        zoom_animation,
        ..Default::default()
    })
}

/// Runs frames until nothing is animating or pending
pub fn settle(map: &mut Map, clock: &mut Clock) {
    for _ in 0..200 {
        let now = clock.tick();
        if map.run_frames(now) == 0 && !map.is_animating() {
            return;
        }
    }
    panic!("map did not settle");
}

/// Two fingers on the horizontal center line, `gap` pixels apart
fn fingers(gap: f64) -> (Point, Point) {
    let mid = SIZE / 2.0;
    (
        Point::new(mid - gap / 2.0, mid),
        Point::new(mid + gap / 2.0, mid),
    )
}

/// Symmetric pinch about the container center from `start_gap` to
/// `end_gap` pixels over `steps` frames, then both fingers lift
pub fn symmetric_pinch(map: &mut Map, clock: &mut Clock, start_gap: f64, end_gap: f64, steps: usize) {
    let (a, b) = fingers(start_gap);
    map.handle_pointer(PointerEvent::down(1, a, clock.now()));
    map.handle_pointer(PointerEvent::down(2, b, clock.now()));

    for step in 1..=steps {
        let gap = start_gap + (end_gap - start_gap) * step as f64 / steps as f64;
        let (a, b) = fingers(gap);
        let now = clock.tick();
        map.handle_pointer(PointerEvent::moved(1, a, now));
        map.handle_pointer(PointerEvent::moved(2, b, now));
        map.run_frames(now);
    }

    let (a, b) = fingers(end_gap);
    let now = clock.tick();
    map.handle_pointer(PointerEvent::up(1, a, now));
    map.handle_pointer(PointerEvent::up(2, b, now));
}

/// Single finger drag along `path`, lifting at the last point
pub fn drag(map: &mut Map, clock: &mut Clock, id: PointerId, path: &[Point]) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };
    map.handle_pointer(PointerEvent::down(id, *first, clock.now()));
    for point in rest {
        let now = clock.tick();
        map.handle_pointer(PointerEvent::moved(id, *point, now));
        map.run_frames(now);
    }
    let last = path.last().copied().unwrap_or(*first);
    map.handle_pointer(PointerEvent::up(id, last, clock.now()));
}
