//! Orbit camera around a movable anchor
//!
//! The camera stores only `target`, `distance`, `yaw` and `pitch`; its
//! world position is always derived from them. Every mutator clamps, so the
//! stored state is finite and within range after any call sequence.

use crate::input::{MoveInput, PendingInput};
use snnviz_math::{clamp_finite, constants::PI, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pitch magnitude the camera may never reach
pub const PITCH_LIMIT: f32 = PI / 2.1;

/// Stored pitch stays this far inside [`PITCH_LIMIT`]
const PITCH_MARGIN: f32 = 1e-4;

/// Forward direction used when target and position coincide
const FALLBACK_FORWARD: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Right direction used when forward is vertical
const FALLBACK_RIGHT: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// Tunables and defaults of an [`OrbitCamera`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CameraParams {
    /// World units per frame for a fully held move key
    pub move_speed: f32,
    /// Radians of orbit per dragged pixel
    pub orbit_sensitivity: f32,
    /// World units of pan per dragged pixel
    pub pan_speed: f32,
    /// Distance change per wheel step
    pub zoom_step: f32,
    /// Closest allowed distance
    pub min_distance: f32,
    /// Farthest allowed distance
    pub max_distance: f32,
    /// Yaw after reset
    pub default_yaw: f32,
    /// Pitch after reset
    pub default_pitch: f32,
    /// Distance after reset
    pub default_distance: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            orbit_sensitivity: 0.006,
            pan_speed: 0.9,
            zoom_step: 40.0,
            min_distance: 200.0,
            max_distance: 5000.0,
            default_yaw: -0.5,
            default_pitch: 0.2,
            default_distance: 1800.0,
        }
    }
}

impl CameraParams {
    /// Copy with finite, ordered values
    pub fn sanitized(&self) -> Self {
        let a = clamp_finite(self.min_distance.abs(), 1.0, 1e6);
        let b = clamp_finite(self.max_distance.abs(), 1.0, 1e6);
        let (min_distance, max_distance) = (a.min(b), a.max(b));
        Self {
            move_speed: clamp_finite(self.move_speed, 0.0, 1e4),
            orbit_sensitivity: clamp_finite(self.orbit_sensitivity, 0.0, 1.0),
            pan_speed: clamp_finite(self.pan_speed, 0.0, 1e4),
            zoom_step: clamp_finite(self.zoom_step, 0.0, 1e5),
            min_distance,
            max_distance,
            default_yaw: clamp_finite(self.default_yaw, -1e3, 1e3),
            default_pitch: clamp_pitch(self.default_pitch),
            default_distance: clamp_finite(self.default_distance, min_distance, max_distance),
        }
    }
}

/// Orthonormal camera frame for one frame's worth of projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    /// Camera position in world space
    pub position: Vec3,
    /// Unit view direction
    pub forward: Vec3,
    /// Unit screen-right direction
    pub right: Vec3,
    /// Unit screen-up direction
    pub up: Vec3,
}

impl CameraBasis {
    /// Frame looking from `position` towards `target` with +Y as world up
    ///
    /// Never yields NaN: a zero-length view direction falls back to +Z and a
    /// vertical one to +X for `right`.
    pub fn look_at(position: Vec3, target: Vec3) -> Self {
        let position = position.sanitized();
        let forward = (target.sanitized() - position)
            .try_normalize()
            .unwrap_or(FALLBACK_FORWARD);
        let right = Vec3::UP
            .cross(forward)
            .try_normalize()
            .unwrap_or(FALLBACK_RIGHT);
        let up = forward.cross(right);
        Self {
            position,
            forward,
            right,
            up,
        }
    }
}

/// Orbit camera state
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    target: Vec3,
    distance: f32,
    yaw: f32,
    pitch: f32,
    held: MoveInput,
    params: CameraParams,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CameraParams::default())
    }
}

impl OrbitCamera {
    /// Camera in its reset pose
    pub fn new(params: CameraParams) -> Self {
        let params = params.sanitized();
        Self {
            target: Vec3::ZERO,
            distance: params.default_distance,
            yaw: params.default_yaw,
            pitch: params.default_pitch,
            held: MoveInput::default(),
            params,
        }
    }

    /// Pan anchor
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Orbit radius
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Yaw in radians
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in radians, strictly inside `(-PITCH_LIMIT, PITCH_LIMIT)`
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Tunables
    pub fn params(&self) -> &CameraParams {
        &self.params
    }

    /// Move vector applied on every [`OrbitCamera::apply_input`]
    pub fn held_move(&self) -> MoveInput {
        self.held
    }

    /// Place the anchor; non-finite components become 0
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target.sanitized();
    }

    /// Set the orbit angles directly, clamping pitch
    pub fn set_angles(&mut self, yaw: f32, pitch: f32) {
        if yaw.is_finite() {
            self.yaw = yaw;
        }
        if pitch.is_finite() {
            self.pitch = clamp_pitch(pitch);
        }
    }

    /// Set the orbit radius, clamped to the configured range
    pub fn set_distance(&mut self, distance: f32) {
        self.distance = clamp_finite(
            distance,
            self.params.min_distance,
            self.params.max_distance,
        );
    }

    /// Move the anchor in camera-local axes
    ///
    /// Forward motion follows the view direction flattened onto the XZ
    /// plane, so looking down does not sink the anchor. `up` moves along
    /// world Y.
    pub fn apply_move(&mut self, input: MoveInput) {
        let input = input.clamped();
        let speed = self.params.move_speed;
        let basis = self.basis();

        let mut delta = basis.right * (input.right * speed);
        if let Some(forward) = basis.forward.horizontal().try_normalize() {
            delta += forward * (input.forward * speed);
        }
        delta.y += input.up * speed;
        self.target = (self.target + delta).sanitized();
    }

    /// Rotate the orbit; `pitch` is clamped away from the poles
    pub fn apply_orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        if delta_yaw.is_finite() {
            self.yaw -= delta_yaw;
        }
        if delta_pitch.is_finite() {
            self.pitch = clamp_pitch(self.pitch - delta_pitch);
        }
    }

    /// Change the orbit radius; positive moves away from the target
    pub fn apply_zoom(&mut self, delta: f32) {
        if delta.is_finite() {
            self.set_distance(self.distance + delta);
        }
    }

    /// Zoom by whole wheel steps of `zoom_step` each
    pub fn zoom_steps(&mut self, steps: f32) {
        self.apply_zoom(steps * self.params.zoom_step);
    }

    /// Drag the anchor across the screen plane by `(dx, dy)` pixels
    pub fn apply_pan(&mut self, dx: f32, dy: f32) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        let basis = self.basis();
        let shift = (basis.right * dx - basis.up * dy) * self.params.pan_speed;
        self.target = (self.target - shift).sanitized();
    }

    /// World position from target, distance, yaw and pitch
    pub fn derive_position(&self) -> Vec3 {
        let h = self.distance * self.pitch.cos();
        let v = self.distance * self.pitch.sin();
        self.target + Vec3::new(-h * self.yaw.sin(), v, -h * self.yaw.cos())
    }

    /// Orthonormal frame for the current pose
    pub fn basis(&self) -> CameraBasis {
        CameraBasis::look_at(self.derive_position(), self.target)
    }

    /// Restore the default pose; the held move vector is released
    pub fn reset(&mut self) {
        self.target = Vec3::ZERO;
        self.yaw = self.params.default_yaw;
        self.pitch = self.params.default_pitch;
        self.distance = self.params.default_distance;
        self.held = MoveInput::default();
        log::debug!("Camera reset to {}", self.derive_position());
    }

    /// Apply everything accumulated in `input` since the last frame
    ///
    /// Order: reset, orbit, pan, zoom, held move. One-shot deltas are
    /// cleared afterwards; the held move vector stays until released.
    pub fn apply_input(&mut self, input: &mut PendingInput) {
        if input.reset {
            self.reset();
        }

        let sensitivity = self.params.orbit_sensitivity;
        let (ox, oy) = input.orbit;
        if ox != 0.0 || oy != 0.0 {
            self.apply_orbit(ox * sensitivity, oy * sensitivity);
        }

        let (px, py) = input.pan;
        if px != 0.0 || py != 0.0 {
            self.apply_pan(px, py);
        }

        if input.zoom != 0.0 {
            self.zoom_steps(input.zoom);
        }

        self.held = input.held.clamped();
        if !self.held.is_idle() {
            self.apply_move(self.held);
        }

        input.clear_deltas();
    }
}

fn clamp_pitch(pitch: f32) -> f32 {
    let limit = PITCH_LIMIT - PITCH_MARGIN;
    clamp_finite(pitch, -limit, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).norm() < 1e-3
    }

    #[test]
    fn test_default_pose() {
        let camera = OrbitCamera::default();
        assert_eq!(camera.target(), Vec3::ZERO);
        assert_eq!(camera.distance(), 1800.0);
        assert_eq!(camera.yaw(), -0.5);
        assert_eq!(camera.pitch(), 0.2);
        assert!((camera.derive_position().norm() - 1800.0).abs() < 1e-2);
    }

    #[test]
    fn test_derive_position_spherical() {
        let mut camera = OrbitCamera::default();
        camera.set_angles(0.0, 0.0);
        camera.set_distance(1000.0);
        assert!(approx(camera.derive_position(), Vec3::new(0.0, 0.0, -1000.0)));

        camera.set_target(Vec3::new(10.0, 20.0, 30.0));
        camera.set_angles(PI / 2.0, 0.0);
        assert!(approx(camera.derive_position(), Vec3::new(-990.0, 20.0, 30.0)));
    }

    #[test]
    fn test_zoom_in_five_steps() {
        let mut camera = OrbitCamera::default();
        for _ in 0..5 {
            camera.apply_zoom(-40.0);
        }
        assert_eq!(camera.distance(), 1600.0);

        camera.zoom_steps(100.0);
        assert_eq!(camera.distance(), 5000.0);
        camera.zoom_steps(-1000.0);
        assert_eq!(camera.distance(), 200.0);
    }

    #[test]
    fn test_orbit_clamps_pitch() {
        let mut camera = OrbitCamera::default();
        camera.apply_orbit(0.3, -10.0);
        assert!(camera.pitch() < PITCH_LIMIT);
        assert!((camera.yaw() - -0.8).abs() < 1e-6);

        camera.apply_orbit(0.0, 10.0);
        assert!(camera.pitch() > -PITCH_LIMIT);

        camera.apply_orbit(f32::NAN, f32::INFINITY);
        assert!(camera.pitch().is_finite() && camera.yaw().is_finite());
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let camera = OrbitCamera::default();
        let b = camera.basis();
        for v in [b.forward, b.right, b.up] {
            assert!((v.norm() - 1.0).abs() < 1e-4);
        }
        assert!(b.forward.dot(b.right).abs() < 1e-4);
        assert!(b.forward.dot(b.up).abs() < 1e-4);
        assert!(b.right.dot(b.up).abs() < 1e-4);
        assert_eq!(b.right.y, 0.0);
        assert!(b.up.y > 0.0);
    }

    #[test]
    fn test_degenerate_basis_falls_back() {
        let p = Vec3::new(5.0, 5.0, 5.0);
        let b = CameraBasis::look_at(p, p);
        assert_eq!(b.forward, FALLBACK_FORWARD);
        assert_eq!(b.right, FALLBACK_RIGHT);
        assert_eq!(b.up, Vec3::UP);

        let b = CameraBasis::look_at(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO);
        assert_eq!(b.right, FALLBACK_RIGHT);
        assert!(b.up.is_finite());
    }

    #[test]
    fn test_move_is_horizontal_for_forward() {
        let mut camera = OrbitCamera::default();
        camera.set_angles(0.0, 1.2);
        camera.apply_move(MoveInput::new(1.0, 0.0, 0.0));
        let t = camera.target();
        assert_eq!(t.y, 0.0);
        assert!((t.z - 3.0).abs() < 1e-4);

        camera.apply_move(MoveInput::new(0.0, 0.0, -1.0));
        assert!((camera.target().y + 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_pan_moves_target_against_drag() {
        let mut camera = OrbitCamera::default();
        camera.set_angles(0.0, 0.0);
        // Basis: right = +X, up = +Y
        camera.apply_pan(10.0, 0.0);
        assert!(approx(camera.target(), Vec3::new(-9.0, 0.0, 0.0)));
        camera.apply_pan(0.0, 10.0);
        assert!(approx(camera.target(), Vec3::new(-9.0, 9.0, 0.0)));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut camera = OrbitCamera::default();
        camera.apply_orbit(1.0, 0.4);
        camera.apply_zoom(700.0);
        camera.apply_pan(50.0, -20.0);
        camera.reset();
        assert_eq!(camera, OrbitCamera::default());
    }

    #[test]
    fn test_apply_input_order_and_clearing() {
        let mut camera = OrbitCamera::default();
        let mut input = PendingInput::default();
        input.orbit_drag(100.0, 0.0);
        input.wheel(-2.0);
        input.set_held(MoveInput::new(0.0, 0.0, 1.0));

        camera.apply_input(&mut input);
        assert!((camera.yaw() - (-0.5 - 0.6)).abs() < 1e-5);
        assert_eq!(camera.distance(), 1720.0);
        assert_eq!(camera.target().y, 3.0);

        // Deltas are gone, the held key keeps moving
        camera.apply_input(&mut input);
        assert_eq!(camera.distance(), 1720.0);
        assert_eq!(camera.target().y, 6.0);

        // Reset runs before the remaining deltas
        input.request_reset();
        input.wheel(1.0);
        input.set_held(MoveInput::default());
        camera.apply_input(&mut input);
        assert_eq!(camera.distance(), 1840.0);
        assert_eq!(camera.target(), Vec3::ZERO);
    }
}
