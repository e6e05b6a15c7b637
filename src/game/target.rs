//! Target data and the random draw that produces new ones.

use rand::Rng;
use std::fmt;

use super::camera::Vec3;

/// Unique for the lifetime of a session; never reused across rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u64);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorClass {
    Cyan,
    Magenta,
    Yellow,
    Green,
}

impl ColorClass {
    pub const ALL: [ColorClass; 4] = [
        ColorClass::Cyan,
        ColorClass::Magenta,
        ColorClass::Yellow,
        ColorClass::Green,
    ];

    pub fn hex(&self) -> &'static str {
        match self {
            ColorClass::Cyan => "#00ffff",
            ColorClass::Magenta => "#ff00ff",
            ColorClass::Yellow => "#ffff00",
            ColorClass::Green => "#00ff00",
        }
    }
}

pub const MIN_POINTS: u32 = 10;
pub const MAX_POINTS: u32 = 60;

/// Spawn volume in front of the camera
pub const SPAWN_HALF_WIDTH: f64 = 5.0;
pub const SPAWN_HALF_HEIGHT: f64 = 2.5;
pub const SPAWN_NEAR_Z: f64 = -3.0;
pub const SPAWN_FAR_Z: f64 = -6.0;

pub const MIN_SCALE: f64 = 0.6;
pub const MAX_SCALE: f64 = 1.0;
pub const MIN_SPEED: f64 = 0.5;
pub const MAX_SPEED: f64 = 1.5;

/// Every attribute of a target that is chosen at spawn time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetBlueprint {
    pub position: Vec3,
    pub scale: f64,
    pub color: ColorClass,
    pub points: u32,
    /// Direction in the x/y plane, length <= 1
    pub direction: (f64, f64),
    pub speed: f64,
}

impl TargetBlueprint {
    /// Draw a blueprint uniformly from the spawn ranges.
    ///
    /// The direction is uniform over the unit disk, so its length (and with
    /// it the effective speed) varies from target to target.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let radius: f64 = rng.gen::<f64>().sqrt();
        let theta = rng.gen_range(0.0..std::f64::consts::TAU);

        Self {
            position: Vec3::new(
                rng.gen_range(-SPAWN_HALF_WIDTH..=SPAWN_HALF_WIDTH),
                rng.gen_range(-SPAWN_HALF_HEIGHT..=SPAWN_HALF_HEIGHT),
                rng.gen_range(SPAWN_FAR_Z..=SPAWN_NEAR_Z),
            ),
            scale: rng.gen_range(MIN_SCALE..=MAX_SCALE),
            color: ColorClass::ALL[rng.gen_range(0..ColorClass::ALL.len())],
            points: rng.gen_range(MIN_POINTS..=MAX_POINTS),
            direction: (radius * theta.cos(), radius * theta.sin()),
            speed: rng.gen_range(MIN_SPEED..=MAX_SPEED),
        }
    }

    /// Stationary target at `position`
    pub fn stationary(position: Vec3, scale: f64, points: u32) -> Self {
        Self {
            position,
            scale,
            color: ColorClass::Cyan,
            points,
            direction: (0.0, 0.0),
            speed: 0.0,
        }
    }
}

/// A live (or just-removed) target
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub position: Vec3,
    pub scale: f64,
    pub color: ColorClass,
    pub points: u32,
    pub direction: (f64, f64),
    pub speed: f64,
    pub alive: bool,
}

impl Target {
    pub fn from_blueprint(id: TargetId, blueprint: TargetBlueprint) -> Self {
        Self {
            id,
            position: blueprint.position,
            scale: blueprint.scale,
            color: blueprint.color,
            points: blueprint.points,
            direction: blueprint.direction,
            speed: blueprint.speed,
            alive: true,
        }
    }

    /// Radius within which a shot counts as a hit
    pub fn hit_radius(&self, factor: f64) -> f64 {
        self.scale * factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_blueprint_within_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let b = TargetBlueprint::random(&mut rng);
            assert!(b.position.x.abs() <= SPAWN_HALF_WIDTH);
            assert!(b.position.y.abs() <= SPAWN_HALF_HEIGHT);
            assert!(b.position.z >= SPAWN_FAR_Z && b.position.z <= SPAWN_NEAR_Z);
            assert!((MIN_SCALE..=MAX_SCALE).contains(&b.scale));
            assert!((MIN_POINTS..=MAX_POINTS).contains(&b.points));
            assert!((MIN_SPEED..=MAX_SPEED).contains(&b.speed));
            let (dx, dy) = b.direction;
            assert!(dx * dx + dy * dy <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn test_random_blueprint_is_reproducible() {
        let a = TargetBlueprint::random(&mut StdRng::seed_from_u64(42));
        let b = TargetBlueprint::random(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_target_id_display() {
        assert_eq!(TargetId(12).to_string(), "target-12");
    }

    #[test]
    fn test_hit_radius() {
        let t = Target::from_blueprint(
            TargetId(1),
            TargetBlueprint::stationary(Vec3::default(), 0.8, 10),
        );
        assert!((t.hit_radius(1.5) - 1.2).abs() < 1e-12);
        assert!(t.alive);
    }
}
