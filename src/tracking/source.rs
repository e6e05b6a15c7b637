//! Landmark sources and the latest-frame slot they publish into.
//!
//! Sources run on their own thread and overwrite a single slot; the
//! simulation reads whatever is newest without blocking. There is no queue:
//! frames the simulation never saw are simply lost.

use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::landmarks::LandmarkFrame;
use crate::error::CaptureError;

/// Health of the landmark source as seen by the simulation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceStatus {
    /// No frame or error reported yet
    #[default]
    Initializing,

    /// Frames are flowing
    Active,

    /// Camera could not be acquired; only pointer input works
    Unavailable(CaptureError),
}

impl SourceStatus {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SourceStatus::Unavailable(_))
    }

    pub fn description(&self) -> String {
        match self {
            SourceStatus::Initializing => "Initializing camera...".to_string(),
            SourceStatus::Active => "Tracking".to_string(),
            SourceStatus::Unavailable(e) => e.to_string(),
        }
    }
}

/// Which inputs the session can currently accept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Gestures and pointer clicks
    Gesture,
    /// Camera unavailable; pointer clicks only
    PointerOnly,
}

impl From<&SourceStatus> for InputMode {
    fn from(status: &SourceStatus) -> Self {
        if status.is_unavailable() {
            InputMode::PointerOnly
        } else {
            InputMode::Gesture
        }
    }
}

#[derive(Debug, Clone)]
struct Published {
    frame: Option<LandmarkFrame>,
    at: Instant,
}

#[derive(Debug, Default)]
struct SlotInner {
    latest: Option<Published>,
    status: SourceStatus,
    closed: bool,
    published_count: u64,
}

/// Single-entry, most-recent-wins mailbox shared between a source thread and
/// the simulation tick.
#[derive(Debug, Clone)]
pub struct FrameSlot {
    inner: Arc<Mutex<SlotInner>>,
    max_age: Duration,
}

impl FrameSlot {
    /// `max_age`: frames older than this read as "no hand"
    pub fn new(max_age: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SlotInner::default())),
            max_age,
        }
    }

    /// Overwrite the slot with a detection (or its absence) captured now
    pub fn publish(&self, frame: Option<LandmarkFrame>) {
        self.publish_at(frame, Instant::now());
    }

    pub fn publish_at(&self, frame: Option<LandmarkFrame>, at: Instant) {
        let mut inner = self.inner.lock();
        inner.latest = Some(Published { frame, at });
        inner.status = SourceStatus::Active;
        inner.published_count += 1;
    }

    /// Newest frame, unless it is older than `max_age` at `now`
    pub fn latest(&self, now: Instant) -> Option<LandmarkFrame> {
        let inner = self.inner.lock();
        let published = inner.latest.as_ref()?;
        if now.saturating_duration_since(published.at) > self.max_age {
            return None;
        }
        published.frame.clone()
    }

    pub fn report_error(&self, error: CaptureError) {
        tracing::warn!("Landmark source failed: {}", error);
        let mut inner = self.inner.lock();
        inner.latest = None;
        inner.status = SourceStatus::Unavailable(error);
    }

    pub fn status(&self) -> SourceStatus {
        self.inner.lock().status.clone()
    }

    pub fn published_count(&self) -> u64 {
        self.inner.lock().published_count
    }

    /// Ask the source thread to stop
    pub fn close(&self) {
        self.inner.lock().closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }
}

/// Anything that can feed hand detections into a [`FrameSlot`].
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, slot: FrameSlot);
}

/// Spawn a landmark source on its own thread.
pub fn spawn_landmark_source<S: LandmarkSource>(
    source: S,
    slot: FrameSlot,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("landmark-source".to_string())
        .spawn(move || Box::new(source).run(slot))
}

/// Replays a fixed list of detections at a constant frame interval.
pub struct ScriptedSource {
    frames: Vec<Option<LandmarkFrame>>,
    frame_interval: Duration,
    looping: bool,
}

impl ScriptedSource {
    pub fn new(frames: Vec<Option<LandmarkFrame>>, frame_interval: Duration) -> Self {
        Self {
            frames,
            frame_interval,
            looping: false,
        }
    }

    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl LandmarkSource for ScriptedSource {
    fn run(self: Box<Self>, slot: FrameSlot) {
        if self.frames.is_empty() {
            slot.report_error(CaptureError::Disconnected);
            return;
        }

        tracing::info!("Scripted landmark source started ({} frames)", self.frames.len());

        'outer: loop {
            for frame in &self.frames {
                if slot.is_closed() {
                    break 'outer;
                }
                slot.publish(frame.clone());
                thread::sleep(self.frame_interval);
            }
            if !self.looping {
                break;
            }
        }

        tracing::info!("Scripted landmark source stopped");
    }
}

/// Source standing in for a camera that could not be opened
pub struct UnavailableSource {
    error: CaptureError,
}

impl UnavailableSource {
    pub fn new(error: CaptureError) -> Self {
        Self { error }
    }
}

impl LandmarkSource for UnavailableSource {
    fn run(self: Box<Self>, slot: FrameSlot) {
        slot.report_error(self.error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::synthetic::HandPoseBuilder;

    #[test]
    fn test_slot_most_recent_wins() {
        let slot = FrameSlot::new(Duration::from_millis(250));
        let t0 = Instant::now();

        let first = HandPoseBuilder::new().aim_at(0.1, 0.5).build();
        let second = HandPoseBuilder::new().aim_at(0.9, 0.5).build();
        slot.publish_at(Some(first), t0);
        slot.publish_at(Some(second.clone()), t0);

        assert_eq!(slot.latest(t0), Some(second));
        assert_eq!(slot.published_count(), 2);
        assert_eq!(slot.status(), SourceStatus::Active);
    }

    #[test]
    fn test_slot_read_does_not_consume() {
        let slot = FrameSlot::new(Duration::from_millis(250));
        let t0 = Instant::now();
        slot.publish_at(Some(HandPoseBuilder::new().build()), t0);

        assert!(slot.latest(t0).is_some());
        assert!(slot.latest(t0).is_some());
    }

    #[test]
    fn test_stale_frame_reads_as_no_hand() {
        let slot = FrameSlot::new(Duration::from_millis(250));
        let t0 = Instant::now();
        slot.publish_at(Some(HandPoseBuilder::new().build()), t0);

        assert!(slot.latest(t0 + Duration::from_millis(250)).is_some());
        assert!(slot.latest(t0 + Duration::from_millis(251)).is_none());
    }

    #[test]
    fn test_empty_slot() {
        let slot = FrameSlot::new(Duration::from_millis(250));
        assert!(slot.latest(Instant::now()).is_none());
        assert_eq!(slot.status(), SourceStatus::Initializing);
    }

    #[test]
    fn test_unavailable_source_reports_error() {
        let slot = FrameSlot::new(Duration::from_millis(250));
        let handle = spawn_landmark_source(
            UnavailableSource::new(CaptureError::PermissionDenied),
            slot.clone(),
        )
        .unwrap();
        handle.join().unwrap();

        assert_eq!(
            slot.status(),
            SourceStatus::Unavailable(CaptureError::PermissionDenied)
        );
        assert!(slot.status().is_unavailable());
        assert_eq!(InputMode::from(&slot.status()), InputMode::PointerOnly);
    }

    #[test]
    fn test_scripted_source_publishes_all_frames() {
        let slot = FrameSlot::new(Duration::from_secs(5));
        let frames = vec![
            Some(HandPoseBuilder::new().build()),
            None,
            Some(HandPoseBuilder::new().aim_at(0.7, 0.3).build()),
        ];
        let source = ScriptedSource::new(frames.clone(), Duration::from_millis(1));
        assert_eq!(source.len(), 3);

        spawn_landmark_source(source, slot.clone())
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(slot.published_count(), 3);
        assert_eq!(slot.latest(Instant::now()), frames[2]);
    }

    #[test]
    fn test_closed_slot_stops_looping_source() {
        let slot = FrameSlot::new(Duration::from_secs(5));
        slot.close();
        let source = ScriptedSource::new(
            vec![Some(HandPoseBuilder::new().build())],
            Duration::from_millis(1),
        )
        .looping();

        spawn_landmark_source(source, slot.clone())
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(slot.published_count(), 0);
    }
}
