//! Deferred view updates.
//!
//! Handlers never mutate the view from inside a frame callback closure;
//! they queue a [`FrameTask`] describing the update instead, and the map
//! executes queued tasks when the host calls
//! [`Map::run_frames`](crate::core::map::Map::run_frames). Every task carries
//! the [`ViewToken`] it was issued under, so a task whose owner has lost
//! control of the view in the meantime is dropped rather than applied.

use crate::{
    animation::transitions::{PanAnimation, ZoomAnimation},
    core::{geo::LatLng, map::ViewToken},
};

/// Identifier of a queued frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u64);

/// Work to perform on the next frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameTask {
    /// Apply the latest pinch-computed view
    PinchMove {
        token: ViewToken,
        center: LatLng,
        zoom: f64,
    },
    ZoomAnimation {
        token: ViewToken,
        animation: ZoomAnimation,
    },
    PanAnimation {
        token: ViewToken,
        animation: PanAnimation,
    },
}

impl FrameTask {
    pub fn token(&self) -> ViewToken {
        match self {
            FrameTask::PinchMove { token, .. }
            | FrameTask::ZoomAnimation { token, .. }
            | FrameTask::PanAnimation { token, .. } => *token,
        }
    }
}

/// Queue of frame requests, run in request order
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    pending: Vec<(FrameId, FrameTask)>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, task: FrameTask) -> FrameId {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        self.pending.push((id, task));
        id
    }

    /// Removes a pending request. Returns `false` if it already ran or was cancelled.
    pub fn cancel(&mut self, id: FrameId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(pending, _)| *pending != id);
        self.pending.len() != before
    }

    /// Removes every pending request issued under `token`
    pub fn cancel_owned(&mut self, token: ViewToken) -> usize {
        let before = self.pending.len();
        self.pending.retain(|(_, task)| task.token() != token);
        before - self.pending.len()
    }

    /// Drains the queue. Requests made while running these go to the next frame.
    pub fn take_all(&mut self) -> Vec<(FrameId, FrameTask)> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
