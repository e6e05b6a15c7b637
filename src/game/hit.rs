//! Hit resolution for a single fire event.

use super::camera::Camera;
use super::lifecycle::TargetManager;
use super::target::{Target, TargetId};
use crate::config::Config;
use crate::tracking::AimCoordinate;

/// Where a shot was aimed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aim {
    /// Gesture input: a ray cast through the aim coordinate
    Ray(AimCoordinate),

    /// Pointer fallback: the UI already knows which target (if any) was clicked
    Pointer { target: Option<TargetId> },
}

/// Which input path produced a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOrigin {
    Gesture,
    Pointer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Hit { target_id: TargetId, points: u32 },
    Miss,
}

impl Aim {
    pub fn origin(&self) -> InputOrigin {
        match self {
            Aim::Ray(_) => InputOrigin::Gesture,
            Aim::Pointer { .. } => InputOrigin::Pointer,
        }
    }
}

impl HitOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, HitOutcome::Hit { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResolver {
    camera: Camera,
    radius_factor: f64,
}

impl HitResolver {
    pub fn new(camera: Camera, radius_factor: f64) -> Self {
        Self {
            camera,
            radius_factor,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Camera::new(config.viewport_aspect), config.hit_radius_factor)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Pick the target a shot would hit without touching the live set.
    ///
    /// The nearest target within its hit radius wins; on equal distance the
    /// earlier-spawned target wins.
    pub fn find_hit(&self, aim: &Aim, targets: &[Target]) -> Option<TargetId> {
        match aim {
            Aim::Pointer { target } => {
                let id = (*target)?;
                targets.iter().find(|t| t.id == id && t.alive).map(|t| t.id)
            }
            Aim::Ray(coordinate) => {
                let ray = self.camera.ray(*coordinate);
                let mut best: Option<(TargetId, f64)> = None;

                for target in targets.iter().filter(|t| t.alive) {
                    let distance = ray.distance_to_point(target.position);
                    if distance >= target.hit_radius(self.radius_factor) {
                        continue;
                    }
                    if best.map_or(true, |(_, d)| distance < d) {
                        best = Some((target.id, distance));
                    }
                }

                best.map(|(id, _)| id)
            }
        }
    }

    /// Resolve a fire event. A hit target leaves the live set in the same
    /// call, so it can never be hit twice.
    pub fn resolve(&self, aim: &Aim, targets: &mut TargetManager) -> HitOutcome {
        let Some(id) = self.find_hit(aim, targets.live()) else {
            return HitOutcome::Miss;
        };

        match targets.remove(id) {
            Some(target) => HitOutcome::Hit {
                target_id: target.id,
                points: target.points,
            },
            None => HitOutcome::Miss,
        }
    }
}

impl Default for HitResolver {
    fn default() -> Self {
        Self::new(Camera::default(), 1.5)
    }
}
