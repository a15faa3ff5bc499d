pub mod frame;
pub mod transitions;

// Re-export commonly used types for convenience
pub use frame::{FrameId, FrameScheduler, FrameTask};
pub use transitions::{AnimationStep, EasingType, PanAnimation, ZoomAnimation};
