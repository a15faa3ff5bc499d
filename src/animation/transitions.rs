use crate::core::geo::{LatLng, Point};
use crate::prelude::{Duration, Instant};
use crate::traits::Lerp;

/// Easing curves used by view animations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EasingType {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Smooth,
    /// `1 - (1 - t)^power`, the curve inertial panning decelerates along
    EaseOutPower(f64),
}

impl EasingType {
    /// Apply easing function to a normalized time value (0.0 to 1.0)
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::Linear => t,
            EasingType::EaseIn => t * t * t,
            EasingType::EaseOut => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            EasingType::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            // Smooth step (3t^2 - 2t^3)
            EasingType::Smooth => t * t * (3.0 - 2.0 * t),
            EasingType::EaseOutPower(power) => 1.0 - (1.0 - t).powf(power),
        }
    }
}

/// Normalized progress of an animation at `now`
fn progress(start_time: Instant, duration: Duration, now: Instant) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    if now <= start_time {
        return 0.0;
    }
    ((now - start_time).as_secs_f64() / duration.as_secs_f64()).min(1.0)
}

/// View state produced by one animation frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationStep {
    pub center: LatLng,
    pub zoom: f64,
    pub finished: bool,
}

/// Animated transition between two views
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomAnimation {
    start_time: Instant,
    duration: Duration,
    easing: EasingType,
    from_center: LatLng,
    to_center: LatLng,
    from_zoom: f64,
    to_zoom: f64,
}

impl ZoomAnimation {
    pub fn new(
        from_center: LatLng,
        to_center: LatLng,
        from_zoom: f64,
        to_zoom: f64,
        start_time: Instant,
        duration: Duration,
    ) -> Self {
        Self::with_easing(
            from_center,
            to_center,
            from_zoom,
            to_zoom,
            start_time,
            duration,
            EasingType::EaseOut,
        )
    }

    pub fn with_easing(
        from_center: LatLng,
        to_center: LatLng,
        from_zoom: f64,
        to_zoom: f64,
        start_time: Instant,
        duration: Duration,
        easing: EasingType,
    ) -> Self {
        Self {
            start_time,
            duration,
            easing,
            from_center,
            to_center,
            from_zoom,
            to_zoom,
        }
    }

    pub fn target_center(&self) -> LatLng {
        self.to_center
    }

    pub fn target_zoom(&self) -> f64 {
        self.to_zoom
    }

    /// View at `now`; the last step lands exactly on the target
    pub fn step(&self, now: Instant) -> AnimationStep {
        let t = progress(self.start_time, self.duration, now);
        if t >= 1.0 {
            return AnimationStep {
                center: self.to_center,
                zoom: self.to_zoom,
                finished: true,
            };
        }

        let eased = self.easing.apply(t);
        AnimationStep {
            center: self.from_center.lerp(&self.to_center, eased),
            zoom: self.from_zoom.lerp(&self.to_zoom, eased),
            finished: false,
        }
    }
}

/// Animated pan by a pixel offset, applied incrementally
#[derive(Debug, Clone, PartialEq)]
pub struct PanAnimation {
    start_time: Instant,
    duration: Duration,
    easing: EasingType,
    offset: Point,
    applied: Point,
}

impl PanAnimation {
    pub fn new(offset: Point, start_time: Instant, duration: Duration, easing: EasingType) -> Self {
        Self {
            start_time,
            duration,
            easing,
            offset,
            applied: Point::default(),
        }
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Advances to `now`, returning the pixel delta still to apply and
    /// whether the animation is done
    pub fn step(&mut self, now: Instant) -> (Point, bool) {
        let t = progress(self.start_time, self.duration, now);
        let target = if t >= 1.0 {
            self.offset
        } else {
            self.offset.multiply(self.easing.apply(t))
        };
        let delta = target.subtract(&self.applied);
        self.applied = target;
        (delta, t >= 1.0)
    }
}
