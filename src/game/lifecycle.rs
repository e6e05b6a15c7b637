//! Target lifecycle: spawning, motion, eviction and removal.
//!
//! `TargetManager` is the only code that mutates the target set. Everyone
//! else gets clones via [`TargetManager::snapshot`].

use rand::Rng;
use std::time::{Duration, Instant};

use super::target::{Target, TargetBlueprint, TargetId};
use crate::config::Config;

/// Targets bounce off these walls
pub const BOUNDS_X: f64 = 6.0;
pub const BOUNDS_Y: f64 = 3.0;

/// When and how many targets appear
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPolicy {
    pub max_live: usize,
    pub initial_burst: usize,
    pub burst_stagger: Duration,
    pub interval_min: Duration,
    pub interval_max: Duration,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self {
            max_live: 15,
            initial_burst: 5,
            burst_stagger: Duration::from_millis(200),
            interval_min: Duration::from_millis(1500),
            interval_max: Duration::from_millis(2000),
        }
    }
}

impl SpawnPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_live: config.max_live_targets,
            initial_burst: config.initial_burst,
            burst_stagger: Duration::from_millis(config.burst_stagger_ms),
            interval_min: Duration::from_millis(config.spawn_interval_min_ms),
            interval_max: Duration::from_millis(config.spawn_interval_max_ms),
        }
    }

    fn next_interval<R: Rng>(&self, rng: &mut R) -> Duration {
        if self.interval_max <= self.interval_min {
            return self.interval_min;
        }
        rng.gen_range(self.interval_min..=self.interval_max)
    }
}

/// What one call to `spawn_if_due` changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub spawned: Vec<TargetId>,
    pub evicted: Vec<TargetId>,
}

impl SpawnReport {
    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty() && self.evicted.is_empty()
    }
}

#[derive(Debug)]
pub struct TargetManager {
    policy: SpawnPolicy,
    /// Live targets in spawn order (oldest first)
    targets: Vec<Target>,
    next_id: u64,
    next_spawn_at: Option<Instant>,
    burst_remaining: usize,
}

impl TargetManager {
    pub fn new(policy: SpawnPolicy) -> Self {
        Self {
            policy,
            targets: Vec::with_capacity(policy.max_live + 1),
            next_id: 1,
            next_spawn_at: None,
            burst_remaining: 0,
        }
    }

    pub fn policy(&self) -> SpawnPolicy {
        self.policy
    }

    /// Clear the field and schedule the opening burst from `now`. Without a
    /// burst the first target waits one regular interval.
    pub fn begin_round<R: Rng>(&mut self, now: Instant, rng: &mut R) {
        self.clear();
        self.burst_remaining = self.policy.initial_burst;
        self.next_spawn_at = if self.burst_remaining > 0 {
            Some(now)
        } else {
            Some(now + self.policy.next_interval(rng))
        };
    }

    /// Spawn every target whose time has come.
    ///
    /// Scheduling pauses while the field is full and resumes as soon as a
    /// slot frees up.
    pub fn spawn_if_due<R: Rng>(&mut self, now: Instant, rng: &mut R) -> SpawnReport {
        let mut report = SpawnReport::default();

        while let Some(due) = self.next_spawn_at {
            if due > now {
                break;
            }
            if self.targets.len() >= self.policy.max_live {
                self.next_spawn_at = Some(now);
                break;
            }

            let (id, evicted) = self.spawn(TargetBlueprint::random(rng));
            report.spawned.push(id);
            report.evicted.extend(evicted);

            let delay = if self.burst_remaining > 0 {
                self.burst_remaining -= 1;
                if self.burst_remaining > 0 {
                    self.policy.burst_stagger
                } else {
                    self.policy.next_interval(rng)
                }
            } else {
                self.policy.next_interval(rng)
            };
            self.next_spawn_at = Some(due + delay);
        }

        report
    }

    /// Insert a target now. Returns its id and any targets evicted to stay
    /// under the cap (oldest first, no score effect).
    pub fn spawn(&mut self, blueprint: TargetBlueprint) -> (TargetId, Vec<TargetId>) {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.targets.push(Target::from_blueprint(id, blueprint));

        let mut evicted = Vec::new();
        while self.targets.len() > self.policy.max_live {
            let oldest = self.targets.remove(0);
            tracing::debug!("Evicted {} to stay under the target cap", oldest.id);
            evicted.push(oldest.id);
        }

        tracing::debug!("Spawned {} ({} points)", id, blueprint.points);
        (id, evicted)
    }

    /// Integrate motion over `dt` seconds with elastic wall bounces
    pub fn advance(&mut self, dt: f64) {
        for target in &mut self.targets {
            target.position.x += target.direction.0 * target.speed * dt;
            target.position.y += target.direction.1 * target.speed * dt;

            if target.position.x.abs() > BOUNDS_X {
                target.direction.0 = -target.direction.0;
                target.position.x = BOUNDS_X.copysign(target.position.x);
            }
            if target.position.y.abs() > BOUNDS_Y {
                target.direction.1 = -target.direction.1;
                target.position.y = BOUNDS_Y.copysign(target.position.y);
            }
        }
    }

    /// Take a target out of the live set, marking it dead
    pub fn remove(&mut self, id: TargetId) -> Option<Target> {
        let index = self.targets.iter().position(|t| t.id == id)?;
        let mut target = self.targets.remove(index);
        target.alive = false;
        Some(target)
    }

    /// Drop every target and cancel pending spawns. Returns how many were live.
    pub fn clear(&mut self) -> usize {
        let count = self.targets.len();
        self.targets.clear();
        self.next_spawn_at = None;
        self.burst_remaining = 0;
        count
    }

    pub fn live(&self) -> &[Target] {
        &self.targets
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn snapshot(&self) -> Vec<Target> {
        self.targets.clone()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn next_spawn_at(&self) -> Option<Instant> {
        self.next_spawn_at
    }
}

impl Default for TargetManager {
    fn default() -> Self {
        Self::new(SpawnPolicy::default())
    }
}
