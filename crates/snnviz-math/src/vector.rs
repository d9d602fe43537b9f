//! Three-component vectors for world-space positions and camera axes
//!
//! `Vec3` is `Copy` and every operation is total: normalizing a zero-length
//! vector yields [`Vec3::UP`] rather than NaN.

use crate::{constants::EPSILON, Float};
use core::fmt;
use core::ops::{Add, AddAssign, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point or direction in 3D world space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec3 {
    /// X component (screen right at yaw 0)
    pub x: Float,
    /// Y component (world up)
    pub y: Float,
    /// Z component
    pub z: Float,
}

impl Vec3 {
    /// The origin
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// World up axis, also the fallback direction for degenerate normalization
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);

    /// Create a new vector
    pub const fn new(x: Float, y: Float, z: Float) -> Self {
        Self { x, y, z }
    }

    /// Dot product
    pub fn dot(self, other: Vec3) -> Float {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product `self × other`
    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Squared L2 norm
    pub fn norm_squared(self) -> Float {
        self.dot(self)
    }

    /// L2 norm (Euclidean length)
    pub fn norm(self) -> Float {
        self.norm_squared().sqrt()
    }

    /// Unit vector in the same direction, or `None` for (near) zero length
    /// and non-finite input
    pub fn try_normalize(self) -> Option<Vec3> {
        let norm = self.norm();
        if !norm.is_finite() || norm < EPSILON {
            return None;
        }
        Some(self.scaled(1.0 / norm))
    }

    /// Unit vector in the same direction, falling back to [`Vec3::UP`]
    pub fn normalize(self) -> Vec3 {
        self.try_normalize().unwrap_or(Vec3::UP)
    }

    /// Scalar multiplication
    pub fn scaled(self, scalar: Float) -> Vec3 {
        Vec3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }

    /// Projection onto the horizontal (XZ) plane
    pub fn horizontal(self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.z)
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Vec3) -> Float {
        (self - other).norm()
    }

    /// True when every component is finite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Replace non-finite components with zero
    pub fn sanitized(self) -> Vec3 {
        fn finite_or_zero(v: Float) -> Float {
            if v.is_finite() {
                v
            } else {
                0.0
            }
        }
        Vec3::new(finite_or_zero(self.x), finite_or_zero(self.y), finite_or_zero(self.z))
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Vec3) {
        *self = *self + other;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<Float> for Vec3 {
    type Output = Vec3;

    fn mul(self, scalar: Float) -> Vec3 {
        self.scaled(scalar)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl From<[Float; 3]> for Vec3 {
    fn from(v: [Float; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

impl From<Vec3> for [Float; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}
