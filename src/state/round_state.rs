//! Round lifecycle state machine
//!
//! Represents the lifecycle of one game round with clear state transitions:
//! `Idle -> Running -> Ended -> (restart) -> Running`.

use std::time::{Duration, Instant};

/// State of the round
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum RoundState {
    /// Waiting for an explicit start
    #[default]
    Idle,

    /// Round in progress
    Running { remaining_secs: u64 },

    /// Round over, simulation frozen
    Ended { final_score: u64 },
}

impl RoundState {
    pub fn is_idle(&self) -> bool {
        matches!(self, RoundState::Idle)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, RoundState::Running { .. })
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, RoundState::Ended { .. })
    }

    pub fn remaining_secs(&self) -> Option<u64> {
        match self {
            RoundState::Running { remaining_secs } => Some(*remaining_secs),
            _ => None,
        }
    }

    /// Get a human-readable description of the state
    pub fn description(&self) -> &'static str {
        match self {
            RoundState::Idle => "Ready",
            RoundState::Running { .. } => "Playing",
            RoundState::Ended { .. } => "Game over",
        }
    }
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    TimeUp,
    Stopped,
}

/// State transition errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// Cannot start when already running
    AlreadyRunning,

    /// A finished round must be restarted, not started
    NotIdle,

    /// Only a finished round can be restarted
    NotEnded,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionError::AlreadyRunning => write!(f, "Round is already running"),
            TransitionError::NotIdle => write!(f, "Round has ended; use restart"),
            TransitionError::NotEnded => write!(f, "Only an ended round can be restarted"),
        }
    }
}

impl std::error::Error for TransitionError {}

/// Wall-clock countdown. Remaining time is derived from the start instant,
/// so tick rate never changes round length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTimer {
    started_at: Instant,
    duration: Duration,
}

impl CountdownTimer {
    pub fn new(started_at: Instant, duration: Duration) -> Self {
        Self {
            started_at,
            duration,
        }
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// Whole seconds left, counting down once per elapsed second
    pub fn remaining_secs(&self, now: Instant) -> u64 {
        self.duration
            .as_secs()
            .saturating_sub(self.elapsed(now).as_secs())
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.elapsed(now) >= self.duration
    }
}

/// State machine for round transitions
#[derive(Debug)]
pub struct RoundStateMachine {
    state: RoundState,
    duration: Duration,
    timer: Option<CountdownTimer>,
}

impl RoundStateMachine {
    /// Create a new state machine in the Idle state
    pub fn new(duration: Duration) -> Self {
        Self {
            state: RoundState::Idle,
            duration,
            timer: None,
        }
    }

    /// Get the current state
    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn timer(&self) -> Option<CountdownTimer> {
        self.timer
    }

    /// Idle -> Running
    pub fn start(&mut self, now: Instant) -> Result<(), TransitionError> {
        match self.state {
            RoundState::Idle => {
                self.enter_running(now);
                Ok(())
            }
            RoundState::Running { .. } => Err(TransitionError::AlreadyRunning),
            RoundState::Ended { .. } => Err(TransitionError::NotIdle),
        }
    }

    /// Ended -> Running
    pub fn restart(&mut self, now: Instant) -> Result<(), TransitionError> {
        match self.state {
            RoundState::Ended { .. } => {
                self.enter_running(now);
                Ok(())
            }
            RoundState::Running { .. } => Err(TransitionError::AlreadyRunning),
            RoundState::Idle => Err(TransitionError::NotEnded),
        }
    }

    /// Running -> Ended. Returns false (and changes nothing) otherwise.
    pub fn finish(&mut self, final_score: u64) -> bool {
        if !self.state.is_running() {
            return false;
        }
        self.state = RoundState::Ended { final_score };
        self.timer = None;
        true
    }

    /// Refresh the countdown. Returns true once the round time is up; the
    /// caller then ends the round with `finish`.
    pub fn poll_timer(&mut self, now: Instant) -> bool {
        let (RoundState::Running { remaining_secs }, Some(timer)) = (&mut self.state, self.timer)
        else {
            return false;
        };

        if timer.is_expired(now) {
            *remaining_secs = 0;
            return true;
        }
        *remaining_secs = timer.remaining_secs(now);
        false
    }

    fn enter_running(&mut self, now: Instant) {
        self.timer = Some(CountdownTimer::new(now, self.duration));
        self.state = RoundState::Running {
            remaining_secs: self.duration.as_secs(),
        };
    }
}

impl Default for RoundStateMachine {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}
