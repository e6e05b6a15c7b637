//! Session commands
//!
//! Commands represent requests to perform actions (imperative).
//! They are queued from any thread and drained at the start of each tick.
use crate::game::TargetId;

/// Session commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Begin the first round (Idle only)
    Start,

    /// Begin a fresh round after the previous one ended
    Restart,

    /// End the current round early
    Stop,

    /// Pointer click; `target` is whatever the UI found under the cursor
    PointerFire { target: Option<TargetId> },
}

impl Command {
    /// Get a human-readable description of the command
    pub fn description(&self) -> String {
        match self {
            Command::Start => "Start round".to_string(),
            Command::Restart => "Restart round".to_string(),
            Command::Stop => "Stop round".to_string(),
            Command::PointerFire { target: Some(id) } => format!("Pointer fire at {}", id),
            Command::PointerFire { target: None } => "Pointer fire at empty space".to_string(),
        }
    }
}
