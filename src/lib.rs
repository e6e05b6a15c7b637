//! Hand-gesture target shooting core.
//!
//! Turns per-frame hand landmarks into aim and fire events, runs the target
//! field and the round clock, and scores every shot.

pub mod config;
pub mod error;
pub mod game;
pub mod messaging;
pub mod persistence;
pub mod session;
pub mod state;
pub mod tracking;
pub mod utils;

pub use config::Config;
pub use error::{AppResult, CaptureError, ConfigError, FrameError, PersistenceError};
pub use session::{GameSession, SessionSnapshot};
