//! Perspective projection onto a 2D canvas
//!
//! A [`Projector`] snapshots the camera basis once per frame and then maps
//! world points to screen coordinates. It never fails: points behind or at
//! the camera are clamped to a view distance of 1, and non-finite inputs
//! collapse to 0 instead of leaking NaN into the renderer.

use crate::camera::{CameraBasis, OrbitCamera};
use snnviz_math::{clamp_finite, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Focal length in pixels
pub const FOCAL_LENGTH: f32 = 1000.0;

/// Smallest view distance used for scaling
pub const MIN_VIEW_DISTANCE: f32 = 1.0;

/// Largest accepted canvas edge in pixels
const MAX_VIEWPORT_EDGE: f32 = 1e5;

/// Canvas size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Viewport {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    /// Create a viewport, clamping both edges to at least one pixel
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }.sanitized()
    }

    /// Copy with both edges finite and at least one pixel
    pub fn sanitized(self) -> Self {
        Self {
            width: clamp_finite(self.width, 1.0, MAX_VIEWPORT_EDGE),
            height: clamp_finite(self.height, 1.0, MAX_VIEWPORT_EDGE),
        }
    }

    /// Canvas centre
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Screen-space result of projecting one world point
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Projection {
    /// Screen x in pixels, growing right
    pub x: f32,
    /// Screen y in pixels, growing down
    pub y: f32,
    /// Size multiplier, `FOCAL_LENGTH / view distance`
    pub scale: f32,
    /// Signed camera-space depth; negative is behind the camera
    pub depth: f32,
}

impl Projection {
    /// True if the point lies in front of the camera
    pub fn is_in_front(&self) -> bool {
        self.depth > 0.0
    }

    /// True if the point lies on the canvas grown by `margin` on every side
    pub fn on_screen(&self, viewport: &Viewport, margin: f32) -> bool {
        self.x >= -margin
            && self.x <= viewport.width + margin
            && self.y >= -margin
            && self.y <= viewport.height + margin
    }
}

/// Projects world points for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    basis: CameraBasis,
    viewport: Viewport,
}

impl Projector {
    /// Snapshot the camera's current basis
    pub fn new(camera: &OrbitCamera, viewport: Viewport) -> Self {
        Self::from_basis(camera.basis(), viewport)
    }

    /// Projector for an explicit basis
    pub fn from_basis(basis: CameraBasis, viewport: Viewport) -> Self {
        Self {
            basis,
            viewport: viewport.sanitized(),
        }
    }

    /// The camera frame in use
    pub fn basis(&self) -> &CameraBasis {
        &self.basis
    }

    /// Target canvas
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Project a world point
    pub fn project(&self, world: Vec3) -> Projection {
        let d = world - self.basis.position;
        let camera = Vec3::new(
            d.dot(self.basis.right),
            d.dot(self.basis.up),
            d.dot(self.basis.forward),
        )
        .sanitized();

        let view_distance = camera.z.max(MIN_VIEW_DISTANCE);
        let scale = FOCAL_LENGTH / view_distance;
        let (cx, cy) = self.viewport.center();

        Projection {
            x: cx + camera.x * scale,
            y: cy - camera.y * scale,
            scale,
            depth: camera.z,
        }
    }
}
