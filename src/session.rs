//! Per-tick game orchestration.
//!
//! A [`GameSession`] owns every piece of round state and advances it one
//! tick at a time. Each tick runs as a single ordered unit:
//!
//! 1. end the round if its time is up
//! 2. drain queued commands
//! 3. classify the latest frame and feed the trigger
//! 4. while Running: move and spawn targets, resolve a shot, score it
//! 5. publish the tick's events
//!
//! Nothing else mutates the session, so a hit always sees the target set
//! of the tick it was fired in.

use crossbeam_channel::{unbounded, Receiver, Sender};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

use crate::config::Config;
use crate::game::{
    Aim, HitResolver, RoundSummary, ScoreState, ScoringEngine, SpawnPolicy, Target, TargetManager,
};
use crate::messaging::{Command, Event, EventBus, SubscriberId};
use crate::state::{EndReason, RoundState, RoundStateMachine};
use crate::tracking::{
    classify, FrameSlot, InputMode, LandmarkFrame, PoseClassification, TriggerDetector,
    TriggerThresholds,
};

/// Read-only view of the session for rendering
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub round: RoundState,
    pub score: ScoreState,
    pub accuracy: f64,
    pub targets: Vec<Target>,
    pub pose: PoseClassification,
    pub input_mode: InputMode,
}

pub struct GameSession {
    round: RoundStateMachine,
    trigger: TriggerDetector,
    targets: TargetManager,
    resolver: HitResolver,
    scoring: ScoringEngine,
    rng: StdRng,
    bus: EventBus,
    command_tx: Sender<Command>,
    command_rx: Receiver<Command>,
    pose: PoseClassification,
    input_mode: InputMode,
    last_tick: Option<Instant>,
    last_summary: Option<RoundSummary>,
}

impl GameSession {
    /// Build an idle session. Spawning is deterministic when the config
    /// carries a seed.
    pub fn new(config: &Config) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (command_tx, command_rx) = unbounded();

        Self {
            round: RoundStateMachine::new(config.round_duration()),
            trigger: TriggerDetector::new(TriggerThresholds::from_config(config)),
            targets: TargetManager::new(SpawnPolicy::from_config(config)),
            resolver: HitResolver::from_config(config),
            scoring: ScoringEngine::new(),
            rng,
            bus: EventBus::new(),
            command_tx,
            command_rx,
            pose: PoseClassification::NO_HAND,
            input_mode: InputMode::Gesture,
            last_tick: None,
            last_summary: None,
        }
    }

    /// Queue handle for UI threads. Commands take effect on the next tick.
    pub fn command_sender(&self) -> Sender<Command> {
        self.command_tx.clone()
    }

    pub fn subscribe(&self) -> (Receiver<Event>, SubscriberId) {
        self.bus.subscribe()
    }

    pub fn event_bus(&self) -> EventBus {
        self.bus.clone()
    }

    pub fn round_state(&self) -> RoundState {
        self.round.state()
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// Final numbers of the last round, available once it has ended
    pub fn summary(&self) -> Option<RoundSummary> {
        if self.round.state().is_ended() {
            self.last_summary
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let score = self.scoring.state();
        SessionSnapshot {
            round: self.round.state(),
            score,
            accuracy: score.accuracy(),
            targets: self.targets.snapshot(),
            pose: self.pose,
            input_mode: self.input_mode,
        }
    }

    /// Switch between gesture and pointer-only input
    pub fn set_input_mode(&mut self, mode: InputMode) -> Option<Event> {
        if mode == self.input_mode {
            return None;
        }
        tracing::info!("Input mode changed: {:?} -> {:?}", self.input_mode, mode);
        self.input_mode = mode;
        if mode == InputMode::PointerOnly {
            self.trigger.reset();
        }
        Some(Event::InputModeChanged { mode })
    }

    /// Tick against the newest frame in `slot`, following its health
    pub fn tick_from_slot(&mut self, now: Instant, slot: &FrameSlot) -> Vec<Event> {
        let mut events = Vec::new();
        events.extend(self.set_input_mode(InputMode::from(&slot.status())));

        let frame = match self.input_mode {
            InputMode::Gesture => slot.latest(now),
            InputMode::PointerOnly => None,
        };
        events.extend(self.step(now, frame.as_ref()));

        self.bus.publish_all(events.iter().cloned());
        events
    }

    /// Advance the session to `now` with the latest detection (or none).
    /// Returns the events published during this tick.
    pub fn tick(&mut self, now: Instant, frame: Option<&LandmarkFrame>) -> Vec<Event> {
        let events = self.step(now, frame);
        self.bus.publish_all(events.iter().cloned());
        events
    }

    fn step(&mut self, now: Instant, frame: Option<&LandmarkFrame>) -> Vec<Event> {
        let mut events = Vec::new();

        // Expire first: a click queued after time ran out lands on an
        // ended round and is dropped.
        if self.round.poll_timer(now) {
            self.end_round(EndReason::TimeUp, &mut events);
        }

        let commands: Vec<Command> = self.command_rx.try_iter().collect();
        for command in commands {
            self.apply_command(command, now, &mut events);
        }

        let frame = match self.input_mode {
            InputMode::Gesture => frame,
            InputMode::PointerOnly => None,
        };
        self.pose = classify(frame);
        let fired = self.trigger.update(frame, self.pose.is_aiming_pose, now);

        let dt = self
            .last_tick
            .map(|last| now.saturating_duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last_tick = Some(now);

        if self.round.state().is_running() {
            self.targets.advance(dt);

            let report = self.targets.spawn_if_due(now, &mut self.rng);
            events.extend(report.evicted.into_iter().map(|id| Event::TargetEvicted { id }));
            events.extend(report.spawned.into_iter().map(|id| Event::TargetSpawned { id }));

            if fired {
                if let Some(aim) = self.pose.aim {
                    self.fire(Aim::Ray(aim), &mut events);
                }
            }
        } else if fired {
            tracing::debug!("Trigger pulled outside a round; ignored");
        }

        events
    }

    fn apply_command(&mut self, command: Command, now: Instant, events: &mut Vec<Event>) {
        tracing::debug!("Applying command: {}", command.description());

        match command {
            Command::Start => match self.round.start(now) {
                Ok(()) => self.begin_round(now, events),
                Err(e) => Self::reject(command, e.to_string(), events),
            },
            Command::Restart => match self.round.restart(now) {
                Ok(()) => self.begin_round(now, events),
                Err(e) => Self::reject(command, e.to_string(), events),
            },
            Command::Stop => {
                if self.round.state().is_running() {
                    self.end_round(EndReason::Stopped, events);
                }
            }
            Command::PointerFire { target } => {
                if self.round.state().is_running() {
                    self.fire(Aim::Pointer { target }, events);
                } else {
                    tracing::debug!("Pointer fire outside a round; ignored");
                }
            }
        }
    }

    fn reject(command: Command, reason: String, events: &mut Vec<Event>) {
        tracing::warn!("Rejected {}: {}", command.description(), reason);
        events.push(Event::CommandRejected {
            command: command.description(),
            reason,
        });
    }

    fn begin_round(&mut self, now: Instant, events: &mut Vec<Event>) {
        self.scoring.reset();
        self.targets.begin_round(now, &mut self.rng);
        self.trigger.reset();
        self.last_summary = None;
        self.last_tick = Some(now);

        let duration_secs = self.round.duration().as_secs();
        tracing::info!("Round started ({}s)", duration_secs);
        events.push(Event::RoundStarted {
            at: now,
            duration_secs,
        });
    }

    fn end_round(&mut self, reason: EndReason, events: &mut Vec<Event>) {
        let summary = RoundSummary::from(self.scoring.state());
        if !self.round.finish(summary.final_score) {
            return;
        }

        let cleared = self.targets.clear();
        self.trigger.reset();
        self.last_summary = Some(summary);

        tracing::info!(
            "Round ended ({:?}): score {}, accuracy {:.1}%, {} target(s) cleared",
            reason,
            summary.final_score,
            summary.accuracy,
            cleared
        );
        events.push(Event::RoundEnded { summary, reason });
    }

    fn fire(&mut self, aim: Aim, events: &mut Vec<Event>) {
        let outcome = self.resolver.resolve(&aim, &mut self.targets);
        let awarded = self.scoring.apply_outcome(outcome);

        events.push(Event::ShotResolved {
            origin: aim.origin(),
            outcome,
            awarded,
            score: self.scoring.state(),
        });
    }

    #[cfg(test)]
    fn targets_mut(&mut self) -> &mut TargetManager {
        &mut self.targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CaptureError;
    use crate::game::{HitOutcome, InputOrigin, TargetBlueprint, TargetId};
    use crate::tracking::{HandPoseBuilder, SourceStatus};
    use std::time::Duration;

    fn seeded() -> Config {
        Config {
            rng_seed: Some(7),
            ..Config::default()
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn started(config: &Config, t0: Instant) -> GameSession {
        let mut session = GameSession::new(config);
        session.command_sender().send(Command::Start).unwrap();
        session.tick(t0, None);
        session
    }

    fn place_on_aim(session: &mut GameSession, frame: &LandmarkFrame, points: u32) -> TargetId {
        let aim = classify(Some(frame)).aim.unwrap();
        let position = session.resolver.camera().point_on_ray(aim, -4.0);
        session
            .targets_mut()
            .spawn(TargetBlueprint::stationary(position, 0.8, points))
            .0
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = GameSession::new(&seeded());
        let snapshot = session.snapshot();

        assert_eq!(snapshot.round, RoundState::Idle);
        assert!(snapshot.targets.is_empty());
        assert_eq!(snapshot.accuracy, 100.0);
        assert!(session.summary().is_none());
    }

    #[test]
    fn test_start_spawns_opening_burst() {
        let t0 = Instant::now();
        let mut session = GameSession::new(&seeded());
        session.command_sender().send(Command::Start).unwrap();

        let events = session.tick(t0, None);
        assert!(matches!(events[0], Event::RoundStarted { duration_secs: 60, .. }));
        assert_eq!(session.snapshot().targets.len(), 1);

        for step in 1..=4 {
            session.tick(t0 + ms(200 * step), None);
        }
        assert_eq!(session.snapshot().targets.len(), 5);
    }

    #[test]
    fn test_round_ends_once_after_duration() {
        let t0 = Instant::now();
        let mut session = started(&seeded(), t0);
        let (rx, _id) = session.subscribe();

        let mut now = t0;
        while now < t0 + Duration::from_secs(62) {
            now += ms(100);
            session.tick(now, None);
        }

        let ended = rx.try_iter().filter(Event::is_round_end).count();
        assert_eq!(ended, 1);
        assert_eq!(session.round_state(), RoundState::Ended { final_score: 0 });
        assert!(session.snapshot().targets.is_empty());
        assert_eq!(
            session.summary(),
            Some(RoundSummary {
                final_score: 0,
                accuracy: 100.0,
                hits: 0,
                shots: 0
            })
        );
    }

    #[test]
    fn test_click_after_time_up_is_dropped() {
        let t0 = Instant::now();
        let mut session = started(&seeded(), t0);
        session.tick(t0 + ms(59_990), None);
        let id = session.snapshot().targets[0].id;

        session
            .command_sender()
            .send(Command::PointerFire { target: Some(id) })
            .unwrap();
        let events = session.tick(t0 + ms(60_500), None);

        assert!(!events
            .iter()
            .any(|e| matches!(e, Event::ShotResolved { .. })));
        assert!(matches!(
            events[0],
            Event::RoundEnded {
                reason: EndReason::TimeUp,
                ..
            }
        ));
        let summary = session.summary().unwrap();
        assert_eq!((summary.final_score, summary.shots, summary.hits), (0, 0, 0));
    }

    #[test]
    fn test_restart_queued_after_time_up_starts_new_round() {
        let t0 = Instant::now();
        let mut session = started(&seeded(), t0);

        session.command_sender().send(Command::Restart).unwrap();
        let events = session.tick(t0 + ms(61_000), None);

        assert!(events[0].is_round_end());
        assert!(matches!(events[1], Event::RoundStarted { .. }));
        assert!(session.round_state().is_running());
    }

    #[test]
    fn test_gesture_pull_hits_target_under_aim() {
        let t0 = Instant::now();
        let mut session = started(&seeded(), t0);

        let open = HandPoseBuilder::new().aim_at(0.3, 0.6).build();
        let pulled = HandPoseBuilder::new().aim_at(0.3, 0.6).pinch(0.05).build();
        let id = place_on_aim(&mut session, &open, 40);

        assert!(session.tick(t0 + ms(16), Some(&open)).is_empty());
        let events = session.tick(t0 + ms(32), Some(&pulled));

        let shot = events
            .iter()
            .find_map(|e| match e {
                Event::ShotResolved {
                    origin, outcome, ..
                } => Some((*origin, *outcome)),
                _ => None,
            })
            .unwrap();
        assert_eq!(
            shot,
            (
                InputOrigin::Gesture,
                HitOutcome::Hit {
                    target_id: id,
                    points: 40
                }
            )
        );
        assert_eq!(session.snapshot().score.score, 40);
    }

    #[test]
    fn test_pull_before_start_is_ignored() {
        let t0 = Instant::now();
        let mut session = GameSession::new(&seeded());

        session.tick(t0, Some(&HandPoseBuilder::new().build()));
        let events = session.tick(t0 + ms(16), Some(&HandPoseBuilder::new().pinch(0.05).build()));

        assert!(events.is_empty());
        assert_eq!(session.snapshot().score, ScoreState::default());
    }

    #[test]
    fn test_pointer_fire_scores_and_counts_shots() {
        let t0 = Instant::now();
        let mut session = started(&seeded(), t0);
        let frame = HandPoseBuilder::new().build();
        let id = place_on_aim(&mut session, &frame, 20);
        let commands = session.command_sender();

        commands.send(Command::PointerFire { target: Some(id) }).unwrap();
        commands.send(Command::PointerFire { target: None }).unwrap();
        session.tick(t0 + ms(16), None);

        let score = session.snapshot().score;
        assert_eq!(score.score, 20);
        assert_eq!((score.hits, score.shots, score.combo), (1, 2, 0));
        assert_eq!(session.snapshot().accuracy, 50.0);
    }

    #[test]
    fn test_events_after_end_are_ignored() {
        let t0 = Instant::now();
        let mut session = started(&seeded(), t0);
        let commands = session.command_sender();

        commands.send(Command::Stop).unwrap();
        session.tick(t0 + ms(16), None);
        assert!(session.round_state().is_ended());

        commands.send(Command::Stop).unwrap();
        commands.send(Command::PointerFire { target: Some(TargetId(1)) }).unwrap();
        let events = session.tick(t0 + ms(32), None);

        assert!(events.is_empty());
        assert_eq!(session.snapshot().score.shots, 0);
        assert!(session.snapshot().targets.is_empty());
    }

    #[test]
    fn test_restart_matches_fresh_start() {
        let t0 = Instant::now();
        let mut session = started(&seeded(), t0);
        let commands = session.command_sender();

        commands.send(Command::PointerFire { target: None }).unwrap();
        commands.send(Command::Stop).unwrap();
        session.tick(t0 + ms(500), None);
        assert_eq!(session.summary().map(|s| s.shots), Some(1));

        let t1 = t0 + Duration::from_secs(5);
        commands.send(Command::Restart).unwrap();
        let events = session.tick(t1, None);

        let snapshot = session.snapshot();
        assert!(matches!(events[0], Event::RoundStarted { .. }));
        assert_eq!(snapshot.round, RoundState::Running { remaining_secs: 60 });
        assert_eq!(snapshot.score, ScoreState::default());
        assert_eq!(snapshot.targets.len(), 1);
        assert!(session.summary().is_none());
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        let t0 = Instant::now();
        let mut session = GameSession::new(&seeded());
        let commands = session.command_sender();

        commands.send(Command::Restart).unwrap();
        let events = session.tick(t0, None);
        assert!(matches!(events[0], Event::CommandRejected { .. }));
        assert!(session.round_state().is_idle());

        commands.send(Command::Start).unwrap();
        commands.send(Command::Start).unwrap();
        let events = session.tick(t0 + ms(16), None);
        assert!(matches!(events[0], Event::RoundStarted { .. }));
        assert!(matches!(events[1], Event::CommandRejected { .. }));
    }

    #[test]
    fn test_unavailable_camera_switches_to_pointer_only() {
        let t0 = Instant::now();
        let mut session = started(&seeded(), t0);
        let slot = FrameSlot::new(ms(250));
        slot.publish_at(Some(HandPoseBuilder::new().build()), t0);
        slot.report_error(CaptureError::PermissionDenied);
        assert_eq!(slot.status(), SourceStatus::Unavailable(CaptureError::PermissionDenied));

        let events = session.tick_from_slot(t0 + ms(16), &slot);
        assert!(matches!(
            events[0],
            Event::InputModeChanged {
                mode: InputMode::PointerOnly
            }
        ));
        assert_eq!(session.input_mode(), InputMode::PointerOnly);
        assert_eq!(session.snapshot().pose, PoseClassification::NO_HAND);

        // Pointer input still plays
        session
            .command_sender()
            .send(Command::PointerFire { target: None })
            .unwrap();
        session.tick_from_slot(t0 + ms(32), &slot);
        assert_eq!(session.snapshot().score.shots, 1);
    }

    #[test]
    fn test_same_seed_same_targets() {
        let t0 = Instant::now();
        let a = started(&seeded(), t0);
        let b = started(&seeded(), t0);

        let positions = |s: &GameSession| -> Vec<(f64, f64, f64)> {
            s.snapshot()
                .targets
                .iter()
                .map(|t| (t.position.x, t.position.y, t.position.z))
                .collect()
        };
        assert_eq!(positions(&a), positions(&b));
    }
}
