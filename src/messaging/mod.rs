//! Messaging module for Event/Command architecture
//!
//! - **Commands**: requests from the UI (start, restart, stop, pointer fire),
//!   queued on a channel and applied at the start of the next tick
//! - **Events**: what happened during a tick, broadcast to every subscriber
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐   Command    ┌─────────────┐   Event    ┌───────────┐
//! │   UI    │ ───────────> │ GameSession │ ─────────> │ Event Bus │
//! └─────────┘              │   (tick)    │            └───────────┘
//!                          └─────────────┘                  │
//!                                                           ▼
//!                                                   renderer, audio, log
//! ```

pub mod bus;
pub mod commands;
pub mod events;

// Re-export commonly used types
pub use bus::{EventBus, SubscriberId};
pub use commands::Command;
pub use events::Event;
