//! Game events
//!
//! Events represent things that have happened during a round (past tense).
//! They are broadcast to all subscribers after each tick.
use std::time::Instant;

use crate::game::{HitOutcome, InputOrigin, RoundSummary, ScoreState, TargetId};
use crate::state::EndReason;
use crate::tracking::InputMode;

/// Session events
#[derive(Debug, Clone)]
pub enum Event {
    /// A round entered Running
    RoundStarted { at: Instant, duration_secs: u64 },

    /// One fire event was resolved and scored
    ShotResolved {
        origin: InputOrigin,
        outcome: HitOutcome,
        awarded: u64,
        score: ScoreState,
    },

    /// A new target joined the live set
    TargetSpawned { id: TargetId },

    /// The oldest target was dropped to stay under the cap
    TargetEvicted { id: TargetId },

    /// The round is over; the summary is final
    RoundEnded {
        summary: RoundSummary,
        reason: EndReason,
    },

    /// Gesture input became unavailable or came back
    InputModeChanged { mode: InputMode },

    /// A command arrived in a state that does not accept it
    CommandRejected { command: String, reason: String },
}

impl Event {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            Event::RoundStarted { duration_secs, .. } => {
                format!("Round started ({}s)", duration_secs)
            }
            Event::ShotResolved {
                outcome, awarded, ..
            } => match outcome {
                HitOutcome::Hit { target_id, .. } => {
                    format!("Hit {} for {} points", target_id, awarded)
                }
                HitOutcome::Miss => "Miss".to_string(),
            },
            Event::TargetSpawned { id } => format!("Spawned {}", id),
            Event::TargetEvicted { id } => format!("Evicted {}", id),
            Event::RoundEnded { summary, reason } => format!(
                "Round ended ({:?}): {} points, {:.0}% accuracy",
                reason, summary.final_score, summary.accuracy
            ),
            Event::InputModeChanged { mode } => format!("Input mode: {:?}", mode),
            Event::CommandRejected { command, reason } => {
                format!("Rejected {}: {}", command, reason)
            }
        }
    }

    pub fn is_round_end(&self) -> bool {
        matches!(self, Event::RoundEnded { .. })
    }
}
