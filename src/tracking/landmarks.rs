//! Hand landmark frame: 21 joints in normalized camera space.

use crate::error::FrameError;

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

pub const LANDMARK_COUNT: usize = 21;

/// A single joint. x/y are normalized image coordinates (y grows downward),
/// z is the model's relative depth.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One validated hand detection
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl LandmarkFrame {
    /// Validate raw points from the pose model.
    ///
    /// A frame with the wrong joint count, a NaN/infinite coordinate, or an
    /// x/y outside [0, 1] is rejected.
    pub fn from_points(points: &[Landmark]) -> Result<Self, FrameError> {
        if points.len() != LANDMARK_COUNT {
            return Err(FrameError::WrongJointCount {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            });
        }

        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (index, (slot, point)) in landmarks.iter_mut().zip(points).enumerate() {
            if !(point.x.is_finite() && point.y.is_finite() && point.z.is_finite()) {
                return Err(FrameError::NonFinite { index });
            }
            if !(0.0..=1.0).contains(&point.x) || !(0.0..=1.0).contains(&point.y) {
                return Err(FrameError::OutOfRange {
                    index,
                    x: point.x,
                    y: point.y,
                });
            }
            *slot = *point;
        }

        Ok(Self { landmarks })
    }

    /// Convert a raw detection into an optional frame, logging rejects.
    ///
    /// Malformed data is indistinguishable from "no hand" downstream.
    pub fn sanitize(points: Option<&[Landmark]>) -> Option<Self> {
        let points = points?;
        match Self::from_points(points) {
            Ok(frame) => Some(frame),
            Err(e) => {
                tracing::warn!("Dropping malformed landmark frame: {}", e);
                None
            }
        }
    }

    /// Build from joints already known to be in range
    pub(crate) fn from_array(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    pub fn get(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    /// Distance between two joints in the image plane (z ignored)
    pub fn planar_distance(&self, a: usize, b: usize) -> f64 {
        let p = self.landmarks[a];
        let q = self.landmarks[b];
        ((p.x - q.x).powi(2) + (p.y - q.y).powi(2)).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_points() -> Vec<Landmark> {
        (0..LANDMARK_COUNT)
            .map(|i| Landmark::new(0.5, 0.02 * i as f64, 0.0))
            .collect()
    }

    #[test]
    fn test_valid_frame() {
        let frame = LandmarkFrame::from_points(&flat_points()).unwrap();
        assert_eq!(frame.get(WRIST).y, 0.0);
        assert!((frame.get(PINKY_TIP).y - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_joint_count() {
        let points = &flat_points()[..5];
        assert_eq!(
            LandmarkFrame::from_points(points),
            Err(FrameError::WrongJointCount {
                expected: 21,
                actual: 5
            })
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut points = flat_points();
        points[INDEX_TIP].y = f64::NAN;
        assert_eq!(
            LandmarkFrame::from_points(&points),
            Err(FrameError::NonFinite { index: INDEX_TIP })
        );
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut points = flat_points();
        points[THUMB_TIP].x = 1.2;
        assert!(matches!(
            LandmarkFrame::from_points(&points),
            Err(FrameError::OutOfRange { index: THUMB_TIP, .. })
        ));
    }

    #[test]
    fn test_sanitize_maps_errors_to_none() {
        assert!(LandmarkFrame::sanitize(None).is_none());
        assert!(LandmarkFrame::sanitize(Some(&flat_points()[..3])).is_none());
        assert!(LandmarkFrame::sanitize(Some(&flat_points())).is_some());
    }

    #[test]
    fn test_planar_distance_ignores_depth() {
        let mut points = flat_points();
        points[THUMB_TIP] = Landmark::new(0.3, 0.4, 0.9);
        points[INDEX_MCP] = Landmark::new(0.6, 0.8, -0.9);
        let frame = LandmarkFrame::from_points(&points).unwrap();
        assert!((frame.planar_distance(THUMB_TIP, INDEX_MCP) - 0.5).abs() < 1e-12);
    }
}
