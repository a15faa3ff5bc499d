//! Map options and their validation
//!
//! Options can be built in code (starting from [`MapOptions::default`]) or
//! parsed from JSON using the same camelCase keys as the JavaScript map
//! options (`pinchZoom`, `zoomAnimation`, ...).

use crate::{core::geo::LatLng, MapError, Result};
use serde::{Deserialize, Serialize};

/// Warning logged when the deprecated `touchZoom` option is used.
pub const TOUCH_ZOOM_DEPRECATION: &str =
    "Map: touchZoom option is deprecated and will be removed in future versions. Use pinchZoom instead.";

/// Where a pinch gesture zooms around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinchZoomMode {
    /// Keep the point between the two fingers fixed
    #[default]
    Focal,
    /// Always zoom around the view center, ignoring finger translation
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapOptions {
    pub center: LatLng,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Enables two-finger pinch zoom. Unset means enabled.
    pub pinch_zoom: Option<bool>,
    /// Deprecated alias of `pinch_zoom`; wins when set.
    pub touch_zoom: Option<bool>,
    pub pinch_zoom_mode: PinchZoomMode,
    pub dragging: bool,
    pub inertia: bool,
    /// Rate at which inertial movement slows down, in pixels/second²
    pub inertia_deceleration: f64,
    /// Max speed of inertial movement, in pixels/second
    pub inertia_max_speed: f64,
    pub ease_linearity: f64,
    pub zoom_animation: bool,
    pub zoom_animation_duration_ms: u64,
    /// Zoom levels are snapped to multiples of this at the end of a gesture.
    /// `0.0` disables snapping.
    pub zoom_snap: f64,
    /// Pixels a single contact may travel before it counts as a drag
    pub click_tolerance: f64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: LatLng::new(0.0, 0.0),
            zoom: 0.0,
            min_zoom: 0.0,
            max_zoom: 18.0,
            pinch_zoom: None,
            touch_zoom: None,
            pinch_zoom_mode: PinchZoomMode::Focal,
            dragging: true,
            inertia: true,
            inertia_deceleration: 3400.0,
            inertia_max_speed: 1500.0,
            ease_linearity: 0.2,
            zoom_animation: true,
            zoom_animation_duration_ms: 250,
            zoom_snap: 1.0,
            click_tolerance: 3.0,
        }
    }
}

impl MapOptions {
    /// Parses options from a JSON object, filling missing keys with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let options: MapOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_zoom.is_finite() && self.max_zoom.is_finite()) || self.min_zoom > self.max_zoom {
            return Err(MapError::InvalidZoomLimits {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        if !self.zoom.is_finite() || !self.center.is_finite() {
            return Err(MapError::InvalidCoordinates(format!(
                "initial view {:?} @ {}",
                self.center, self.zoom
            )));
        }
        if !self.zoom_snap.is_finite() || self.zoom_snap < 0.0 {
            return Err(MapError::InvalidOptions(format!(
                "zoomSnap must be a non-negative number, got {}",
                self.zoom_snap
            )));
        }
        if !(self.ease_linearity > 0.0 && self.ease_linearity <= 1.0) {
            return Err(MapError::InvalidOptions(format!(
                "easeLinearity must be in (0, 1], got {}",
                self.ease_linearity
            )));
        }
        let positive = |value: f64| value.is_finite() && value > 0.0;
        if !positive(self.inertia_deceleration) || !positive(self.inertia_max_speed) {
            return Err(MapError::InvalidOptions(
                "inertia deceleration and max speed must be positive".to_string(),
            ));
        }
        if !self.click_tolerance.is_finite() || self.click_tolerance < 0.0 {
            return Err(MapError::InvalidOptions(format!(
                "clickTolerance must be a non-negative number, got {}",
                self.click_tolerance
            )));
        }
        Ok(())
    }

    /// Effective pinch zoom flag after applying the deprecated alias
    pub fn pinch_zoom_resolution(&self) -> PinchZoomResolution {
        resolve_pinch_zoom(self.touch_zoom, self.pinch_zoom)
    }
}

/// Outcome of resolving `pinchZoom` against its deprecated `touchZoom` alias
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinchZoomResolution {
    pub enabled: bool,
    pub warning: Option<&'static str>,
}

/// Resolves the effective pinch zoom flag.
///
/// Any explicit `touch_zoom` value overrides `pinch_zoom` and produces the
/// deprecation warning; otherwise `pinch_zoom` applies, defaulting to enabled.
pub fn resolve_pinch_zoom(touch_zoom: Option<bool>, pinch_zoom: Option<bool>) -> PinchZoomResolution {
    match touch_zoom {
        Some(enabled) => PinchZoomResolution {
            enabled,
            warning: Some(TOUCH_ZOOM_DEPRECATION),
        },
        None => PinchZoomResolution {
            enabled: pinch_zoom.unwrap_or(true),
            warning: None,
        },
    }
}
