//! 3D vector math for the snnviz workspace
//!
//! The camera, the projector and the topology builder all work in the same
//! right-handed world space with +Y up. Everything here is plain `f32`
//! arithmetic; degenerate inputs (zero-length vectors) fall back to safe
//! defaults instead of producing NaN.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod vector;

pub use vector::Vec3;

/// Floating point type used across the workspace
pub type Float = f32;

/// Numeric constants
pub mod constants {
    use crate::Float;

    /// Lengths below this are treated as zero when normalizing
    pub const EPSILON: Float = 1e-6;

    /// Pi
    pub const PI: Float = core::f32::consts::PI;
}

/// Clamp `value` into `[min, max]`, mapping NaN to `min`.
///
/// `f32::clamp` propagates NaN, which is exactly what the camera and config
/// setters must never store.
pub fn clamp_finite(value: Float, min: Float, max: Float) -> Float {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_finite() {
        assert_eq!(clamp_finite(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp_finite(-5.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp_finite(0.25, 0.0, 1.0), 0.25);
        assert_eq!(clamp_finite(Float::NAN, 0.0, 1.0), 0.0);
        assert_eq!(clamp_finite(Float::INFINITY, 0.0, 1.0), 1.0);
    }
}
