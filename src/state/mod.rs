//! State management module
//!
//! Round lifecycle and the wall-clock countdown that bounds it.

pub mod round_state;

// Re-export commonly used types
pub use round_state::{CountdownTimer, EndReason, RoundState, RoundStateMachine, TransitionError};
