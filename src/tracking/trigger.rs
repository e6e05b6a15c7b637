//! Trigger-pull detector
//!
//! Fires when the thumb snaps toward the base of the index finger while the
//! aiming pose is held. A fixed cooldown after each shot keeps one slow pull
//! from registering as several.

use std::time::{Duration, Instant};

use super::landmarks::{LandmarkFrame, INDEX_MCP, THUMB_TIP};
use crate::config::Config;
use crate::utils::Cooldown;

/// Thresholds for the pull gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerThresholds {
    /// Minimum per-frame decrease of the thumb/index distance
    pub closing_delta: f64,
    /// Distance below which a closing thumb counts as a pull
    pub fire_distance: f64,
    /// Minimum time between two fire events
    pub cooldown: Duration,
}

impl Default for TriggerThresholds {
    fn default() -> Self {
        Self {
            closing_delta: 0.02,
            fire_distance: 0.08,
            cooldown: Duration::from_millis(300),
        }
    }
}

impl TriggerThresholds {
    pub fn from_config(config: &Config) -> Self {
        Self {
            closing_delta: config.pinch_closing_delta,
            fire_distance: config.pinch_fire_distance,
            cooldown: config.fire_cooldown(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TriggerDetector {
    thresholds: TriggerThresholds,
    /// Distance seen on the last frame with a detected hand.
    /// `None` after detection loss so re-acquisition can't look like a pull.
    previous_distance: Option<f64>,
    cooldown: Cooldown,
}

impl TriggerDetector {
    pub fn new(thresholds: TriggerThresholds) -> Self {
        Self {
            thresholds,
            previous_distance: None,
            cooldown: Cooldown::new(thresholds.cooldown),
        }
    }

    pub fn thresholds(&self) -> TriggerThresholds {
        self.thresholds
    }

    /// Feed one tick. Returns true on exactly the tick a pull is recognised.
    pub fn update(&mut self, frame: Option<&LandmarkFrame>, is_aiming_pose: bool, now: Instant) -> bool {
        let Some(frame) = frame else {
            // Hand lost: history is stale, cooldown keeps running.
            self.previous_distance = None;
            return false;
        };

        let distance = frame.planar_distance(THUMB_TIP, INDEX_MCP);
        let previous = self.previous_distance.replace(distance);

        if !is_aiming_pose || self.cooldown.is_active(now) {
            return false;
        }

        let Some(previous) = previous else {
            return false;
        };

        let closing = previous - distance;
        if closing > self.thresholds.closing_delta && distance < self.thresholds.fire_distance {
            self.cooldown.arm(now);
            tracing::debug!(
                "Trigger pulled (distance {:.3}, closed by {:.3})",
                distance,
                closing
            );
            return true;
        }

        false
    }

    pub fn is_cooling_down(&self, now: Instant) -> bool {
        self.cooldown.is_active(now)
    }

    pub fn previous_distance(&self) -> Option<f64> {
        self.previous_distance
    }

    /// Drop distance history and any in-flight cooldown
    pub fn reset(&mut self) {
        self.previous_distance = None;
        self.cooldown.reset();
    }
}

impl Default for TriggerDetector {
    fn default() -> Self {
        Self::new(TriggerThresholds::default())
    }
}
