//! Prelude module for common pinchmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use pinchmap::prelude::*;`

pub use crate::core::{
    config::{
        resolve_pinch_zoom, MapOptions, PinchZoomMode, PinchZoomResolution, TOUCH_ZOOM_DEPRECATION,
    },
    geo::{LatLng, LatLngBounds, Point},
    map::{Map, MapState},
    viewport::Viewport,
};

pub use crate::input::{
    drag::Drag,
    events::{EventHandled, MapEvent, PointerEvent, PointerId, PointerPhase},
    handler::{EventManager, Handler, ListenerId},
    pinch_zoom::{PinchSession, PinchZoom},
    pointer::{PointerContact, PointerTracker},
};

pub use crate::animation::{EasingType, FrameScheduler, FrameTask, PanAnimation, ZoomAnimation};

pub use crate::traits::Lerp;

pub use crate::{Error as MapError, Result};

pub use std::{collections::VecDeque, time::Duration};

pub use instant::Instant;

pub use fxhash::FxHashMap as HashMap;
