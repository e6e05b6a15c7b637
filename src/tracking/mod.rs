//! Hand tracking module
//!
//! Turns raw hand landmarks into an aim point and discrete fire events.
//!
//! ## Architecture
//!
//! ```text
//! LandmarkSource (thread) ──publish──> FrameSlot (latest wins)
//!                                         │
//!                                         │ latest(now)
//!                                         ▼
//!                              classify() ──> PoseClassification
//!                                         │
//!                                         ▼
//!                              TriggerDetector::update() ──> fire: bool
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let slot = FrameSlot::new(config.frame_timeout());
//! spawn_landmark_source(ScriptedSource::new(frames, interval), slot.clone())?;
//!
//! let frame = slot.latest(now);
//! let pose = classify(frame.as_ref());
//! let fired = trigger.update(frame.as_ref(), pose.is_aiming_pose, now);
//! ```

pub mod classifier;
pub mod landmarks;
pub mod source;
pub mod synthetic;
pub mod trigger;

// Re-export commonly used types
pub use classifier::{classify, AimCoordinate, PoseClassification};
pub use landmarks::{Landmark, LandmarkFrame, LANDMARK_COUNT};
pub use source::{
    spawn_landmark_source, FrameSlot, InputMode, LandmarkSource, ScriptedSource, SourceStatus,
    UnavailableSource,
};
pub use synthetic::HandPoseBuilder;
pub use trigger::{TriggerDetector, TriggerThresholds};
