//! Aiming-pose classifier
//!
//! Recognises the "finger gun": index extended, middle/ring/pinky curled.
//! Stateless; every call recomputes from the frame alone.

use super::landmarks::{
    LandmarkFrame, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP, PINKY_TIP, RING_PIP,
    RING_TIP,
};

/// Normalized aim point on screen, x mirrored for a selfie-view camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimCoordinate {
    pub x: f64,
    pub y: f64,
}

impl AimCoordinate {
    pub const CENTER: AimCoordinate = AimCoordinate { x: 0.5, y: 0.5 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Result of classifying one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseClassification {
    pub is_aiming_pose: bool,
    pub aim: Option<AimCoordinate>,
}

impl PoseClassification {
    pub const NO_HAND: PoseClassification = PoseClassification {
        is_aiming_pose: false,
        aim: None,
    };
}

/// Classify a frame. An absent frame is "no hand".
///
/// The aim point follows the index fingertip whenever a hand is present,
/// so a crosshair can track the hand before the pose is formed.
pub fn classify(frame: Option<&LandmarkFrame>) -> PoseClassification {
    let Some(frame) = frame else {
        return PoseClassification::NO_HAND;
    };

    // Image y grows downward: "above" means a smaller y.
    let index_extended = frame.get(INDEX_TIP).y < frame.get(INDEX_PIP).y;
    let middle_curled = frame.get(MIDDLE_TIP).y > frame.get(MIDDLE_PIP).y;
    let ring_curled = frame.get(RING_TIP).y > frame.get(RING_PIP).y;
    let pinky_curled = frame.get(PINKY_TIP).y > frame.get(PINKY_PIP).y;

    let tip = frame.get(INDEX_TIP);

    PoseClassification {
        is_aiming_pose: index_extended && middle_curled && ring_curled && pinky_curled,
        aim: Some(AimCoordinate::new(1.0 - tip.x, tip.y)),
    }
}
