//! Fixed perspective camera used to turn a 2D aim point into a 3D ray.

use std::ops::{Add, Mul, Sub};

use crate::tracking::AimCoordinate;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len > 0.0 {
            self * (1.0 / len)
        } else {
            self
        }
    }

    pub fn distance(self, other: Vec3) -> f64 {
        (self - other).length()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, k: f64) -> Vec3 {
        Vec3::new(self.x * k, self.y * k, self.z * k)
    }
}

/// Half-line from `origin` along unit `direction`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Shortest distance from the ray to `point`.
    /// Points behind the origin measure to the origin itself.
    pub fn distance_to_point(&self, point: Vec3) -> f64 {
        let t = (point - self.origin).dot(self.direction);
        if t < 0.0 {
            return self.origin.distance(point);
        }
        (self.origin + self.direction * t).distance(point)
    }
}

/// Camera at (0, 0, 8) looking down -z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub vertical_fov_deg: f64,
    pub aspect: f64,
}

impl Camera {
    pub const DEFAULT_Z: f64 = 8.0;
    pub const DEFAULT_FOV_DEG: f64 = 60.0;

    pub fn new(aspect: f64) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, Self::DEFAULT_Z),
            vertical_fov_deg: Self::DEFAULT_FOV_DEG,
            aspect,
        }
    }

    /// Ray through a normalized screen point (origin top-left, y down)
    pub fn ray(&self, aim: AimCoordinate) -> Ray {
        let ndc_x = (aim.x - 0.5) * 2.0;
        let ndc_y = -(aim.y - 0.5) * 2.0;
        let half_height = (self.vertical_fov_deg.to_radians() / 2.0).tan();

        let direction = Vec3::new(ndc_x * half_height * self.aspect, ndc_y * half_height, -1.0);
        Ray {
            origin: self.position,
            direction: direction.normalized(),
        }
    }

    /// Point on the aim ray at world depth `z`
    pub fn point_on_ray(&self, aim: AimCoordinate, z: f64) -> Vec3 {
        let ray = self.ray(aim);
        let t = (z - ray.origin.z) / ray.direction.z;
        ray.origin + ray.direction * t
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}
