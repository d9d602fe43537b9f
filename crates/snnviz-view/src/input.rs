//! Input accumulated between frames
//!
//! Hosts record raw pointer, wheel and key events into a [`PendingInput`] as
//! they arrive. The camera consumes it once per frame in
//! [`OrbitCamera::apply_input`](crate::OrbitCamera::apply_input), so event
//! timing never interleaves with a simulation tick.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Held movement in camera-local axes, each component in `[-1, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveInput {
    /// Along the flattened view direction
    pub forward: f32,
    /// Along screen right
    pub right: f32,
    /// Along world up
    pub up: f32,
}

impl MoveInput {
    /// Create a move vector
    pub const fn new(forward: f32, right: f32, up: f32) -> Self {
        Self { forward, right, up }
    }

    /// Components clamped to `[-1, 1]`, NaN to 0
    pub fn clamped(self) -> Self {
        fn axis(v: f32) -> f32 {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(-1.0, 1.0)
            }
        }
        Self::new(axis(self.forward), axis(self.right), axis(self.up))
    }

    /// True if no axis is held
    pub fn is_idle(&self) -> bool {
        self.forward == 0.0 && self.right == 0.0 && self.up == 0.0
    }
}

/// Deltas gathered since the last frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingInput {
    pub(crate) orbit: (f32, f32),
    pub(crate) pan: (f32, f32),
    pub(crate) zoom: f32,
    pub(crate) held: MoveInput,
    pub(crate) reset: bool,
}

impl PendingInput {
    /// Add an orbit drag in pixels
    pub fn orbit_drag(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() && dy.is_finite() {
            self.orbit.0 += dx;
            self.orbit.1 += dy;
        }
    }

    /// Add a pan drag in pixels
    pub fn pan_drag(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() && dy.is_finite() {
            self.pan.0 += dx;
            self.pan.1 += dy;
        }
    }

    /// Add wheel steps; positive zooms out
    pub fn wheel(&mut self, steps: f32) {
        if steps.is_finite() {
            self.zoom += steps;
        }
    }

    /// Replace the held move vector
    pub fn set_held(&mut self, held: MoveInput) {
        self.held = held.clamped();
    }

    /// Currently held move vector
    pub fn held(&self) -> MoveInput {
        self.held
    }

    /// Ask for a camera reset on the next frame
    pub fn request_reset(&mut self) {
        self.reset = true;
    }

    /// True if applying this input would change nothing
    pub fn is_idle(&self) -> bool {
        !self.reset
            && self.orbit == (0.0, 0.0)
            && self.pan == (0.0, 0.0)
            && self.zoom == 0.0
            && self.held.is_idle()
    }

    /// Drop one-shot deltas, keeping the held move vector
    pub fn clear_deltas(&mut self) {
        self.orbit = (0.0, 0.0);
        self.pan = (0.0, 0.0);
        self.zoom = 0.0;
        self.reset = false;
    }
}
