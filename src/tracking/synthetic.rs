//! Synthetic hand poses for scripted sources, demos and tests.

use super::landmarks::*;

/// Default thumb-tip to index-base distance for a relaxed thumb
pub const RELAXED_PINCH: f64 = 0.15;

/// Index finger length from base to tip in normalized units
const INDEX_LENGTH: f64 = 0.11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// (base x offset, base y offset) relative to the index base
    fn base_offset(self) -> (f64, f64) {
        match self {
            Finger::Index => (0.0, 0.0),
            Finger::Middle => (0.03, 0.01),
            Finger::Ring => (0.06, 0.02),
            Finger::Pinky => (0.09, 0.035),
        }
    }

    fn joints(self) -> [usize; 4] {
        match self {
            Finger::Index => [INDEX_MCP, INDEX_PIP, INDEX_DIP, INDEX_TIP],
            Finger::Middle => [MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP],
            Finger::Ring => [RING_MCP, RING_PIP, RING_DIP, RING_TIP],
            Finger::Pinky => [PINKY_MCP, PINKY_PIP, PINKY_DIP, PINKY_TIP],
        }
    }
}

/// Builds a plausible right-hand frame around a chosen aim point.
///
/// Defaults to a finger gun aimed at the screen centre with a relaxed thumb.
#[derive(Debug, Clone)]
pub struct HandPoseBuilder {
    aim_x: f64,
    aim_y: f64,
    pinch: f64,
    extended: [bool; 4],
}

impl Default for HandPoseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HandPoseBuilder {
    pub fn new() -> Self {
        Self {
            aim_x: 0.5,
            aim_y: 0.5,
            pinch: RELAXED_PINCH,
            extended: [true, false, false, false],
        }
    }

    /// All four fingers extended
    pub fn open_hand() -> Self {
        Self {
            extended: [true; 4],
            ..Self::new()
        }
    }

    /// Place the index fingertip so the mirrored aim lands on (x, y)
    pub fn aim_at(mut self, x: f64, y: f64) -> Self {
        self.aim_x = x;
        self.aim_y = y;
        self
    }

    /// Thumb-tip to index-base distance
    pub fn pinch(mut self, distance: f64) -> Self {
        self.pinch = distance;
        self
    }

    pub fn index_curled(mut self) -> Self {
        self.extended[0] = false;
        self
    }

    pub fn middle_extended(mut self) -> Self {
        self.extended[1] = true;
        self
    }

    pub fn ring_extended(mut self) -> Self {
        self.extended[2] = true;
        self
    }

    pub fn pinky_extended(mut self) -> Self {
        self.extended[3] = true;
        self
    }

    pub fn build(&self) -> LandmarkFrame {
        let mut points = [Landmark::default(); LANDMARK_COUNT];

        let base_x = 1.0 - self.aim_x;
        let base_y = self.aim_y + INDEX_LENGTH;

        for (i, finger) in [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky]
            .into_iter()
            .enumerate()
        {
            let (dx, dy) = finger.base_offset();
            let (x, y) = (base_x + dx, base_y + dy);
            let [mcp, pip, dip, tip] = finger.joints();

            points[mcp] = Landmark::new(x, y, 0.0);
            if self.extended[i] {
                points[pip] = Landmark::new(x, y - 0.05, -0.01);
                points[dip] = Landmark::new(x, y - 0.08, -0.02);
                points[tip] = Landmark::new(x, y - INDEX_LENGTH, -0.03);
            } else {
                points[pip] = Landmark::new(x, y - 0.04, -0.01);
                points[dip] = Landmark::new(x + 0.015, y - 0.02, 0.0);
                points[tip] = Landmark::new(x + 0.015, y + 0.01, 0.01);
            }
        }

        points[WRIST] = Landmark::new(base_x + 0.05, base_y + 0.15, 0.0);
        points[THUMB_CMC] = Landmark::new(base_x - 0.02, base_y + 0.11, 0.0);
        points[THUMB_MCP] = Landmark::new(base_x - 0.04, base_y + 0.07, -0.01);
        points[THUMB_TIP] = Landmark::new(base_x - self.pinch, base_y, -0.02);
        points[THUMB_IP] = Landmark::new(
            (points[THUMB_MCP].x + points[THUMB_TIP].x) / 2.0,
            (points[THUMB_MCP].y + points[THUMB_TIP].y) / 2.0,
            -0.015,
        );

        for p in points.iter_mut() {
            p.x = sanitize_coord(p.x);
            p.y = sanitize_coord(p.y);
        }

        LandmarkFrame::from_array(points)
    }
}

fn sanitize_coord(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_frame_passes_validation() {
        let frame = HandPoseBuilder::new().aim_at(0.2, 0.3).pinch(0.05).build();
        assert!(LandmarkFrame::from_points(frame.landmarks()).is_ok());
    }

    #[test]
    fn test_pinch_distance_is_exact() {
        let frame = HandPoseBuilder::new().pinch(0.07).build();
        let d = frame.planar_distance(THUMB_TIP, INDEX_MCP);
        assert!((d - 0.07).abs() < 1e-12);
    }

    #[test]
    fn test_extreme_aim_is_clamped() {
        let frame = HandPoseBuilder::new().aim_at(-3.0, 9.0).build();
        assert!(LandmarkFrame::from_points(frame.landmarks()).is_ok());
    }
}
