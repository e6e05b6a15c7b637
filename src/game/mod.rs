//! Game simulation module
//!
//! Owns everything that happens inside a round once an aim point and a fire
//! event are known.
//!
//! ## Architecture
//!
//! ```text
//! TargetManager ── spawn_if_due / advance / remove ──> live targets
//!       ▲
//!       │ resolve(aim)
//! HitResolver ──> HitOutcome ──> ScoringEngine ──> ScoreState
//! ```

pub mod camera;
pub mod clock;
pub mod hit;
pub mod lifecycle;
pub mod scoring;
pub mod target;

// Re-export commonly used types
pub use camera::{Camera, Ray, Vec3};
pub use clock::{Clock, ManualClock, SystemClock};
pub use hit::{Aim, HitOutcome, HitResolver, InputOrigin};
pub use lifecycle::{SpawnPolicy, SpawnReport, TargetManager};
pub use scoring::{RoundSummary, ScoreState, ScoringEngine};
pub use target::{ColorClass, Target, TargetBlueprint, TargetId};
