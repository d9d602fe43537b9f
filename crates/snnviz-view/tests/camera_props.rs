use proptest::prelude::*;
use snnviz_math::Vec3;
use snnviz_view::{
    CameraBasis, MoveInput, OrbitCamera, PendingInput, Projector, Viewport, MIN_VIEW_DISTANCE,
    PITCH_LIMIT,
};

#[derive(Debug, Clone)]
enum Op {
    Orbit(f32, f32),
    Zoom(f32),
    Pan(f32, f32),
    Move(f32, f32, f32),
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-1e3f32..1e3, -1e3f32..1e3).prop_map(|(a, b)| Op::Orbit(a, b)),
        (-1e4f32..1e4).prop_map(Op::Zoom),
        (-500f32..500.0, -500f32..500.0).prop_map(|(a, b)| Op::Pan(a, b)),
        (-2f32..2.0, -2f32..2.0, -2f32..2.0).prop_map(|(f, r, u)| Op::Move(f, r, u)),
        Just(Op::Reset),
    ]
}

fn apply(camera: &mut OrbitCamera, op: &Op) {
    match *op {
        Op::Orbit(a, b) => camera.apply_orbit(a, b),
        Op::Zoom(d) => camera.apply_zoom(d),
        Op::Pan(x, y) => camera.apply_pan(x, y),
        Op::Move(f, r, u) => camera.apply_move(MoveInput::new(f, r, u)),
        Op::Reset => camera.reset(),
    }
}

proptest! {
    #[test]
    fn prop_camera_stays_in_range(ops in prop::collection::vec(op(), 1..64)) {
        let mut camera = OrbitCamera::default();
        for op in &ops {
            apply(&mut camera, op);
            prop_assert!((200.0..=5000.0).contains(&camera.distance()));
            prop_assert!(camera.pitch() > -PITCH_LIMIT && camera.pitch() < PITCH_LIMIT);
            prop_assert!(camera.target().is_finite());
            prop_assert!(camera.derive_position().is_finite());
        }
    }

    #[test]
    fn prop_pending_input_keeps_clamps(
        drags in prop::collection::vec((-2e3f32..2e3, -2e3f32..2e3, -50f32..50.0), 1..32),
    ) {
        let mut camera = OrbitCamera::default();
        let mut input = PendingInput::default();
        for (dx, dy, steps) in drags {
            input.orbit_drag(dx, dy);
            input.pan_drag(dy, dx);
            input.wheel(steps);
            camera.apply_input(&mut input);
            prop_assert!((200.0..=5000.0).contains(&camera.distance()));
            prop_assert!(camera.pitch().abs() < PITCH_LIMIT);
        }
    }

    #[test]
    fn prop_projection_is_finite(
        px in -1e4f32..1e4, py in -1e4f32..1e4, pz in -1e4f32..1e4,
        wx in -1e4f32..1e4, wy in -1e4f32..1e4, wz in -1e4f32..1e4,
        tx in -1e4f32..1e4, ty in -1e4f32..1e4, tz in -1e4f32..1e4,
    ) {
        let basis = CameraBasis::look_at(Vec3::new(px, py, pz), Vec3::new(tx, ty, tz));
        let projector = Projector::from_basis(basis, Viewport::default());

        for world in [Vec3::new(wx, wy, wz), basis.position] {
            let p = projector.project(world);
            prop_assert!(p.x.is_finite() && p.y.is_finite());
            prop_assert!(p.scale.is_finite() && p.depth.is_finite());
            prop_assert!(p.scale <= snnviz_view::FOCAL_LENGTH / MIN_VIEW_DISTANCE);
        }
    }
}

#[test]
fn five_zoom_ins_from_default() {
    let mut camera = OrbitCamera::default();
    let mut input = PendingInput::default();
    for _ in 0..5 {
        input.wheel(-1.0);
        camera.apply_input(&mut input);
    }
    assert_eq!(camera.distance(), 1600.0);
}

#[test]
fn projecting_the_camera_position_is_safe() {
    let camera = OrbitCamera::default();
    let projector = Projector::new(&camera, Viewport::new(640.0, 480.0));
    let p = projector.project(camera.derive_position());
    assert_eq!(p.scale, snnviz_view::FOCAL_LENGTH);
    assert!((p.x - 320.0).abs() < 1e-3 && (p.y - 240.0).abs() < 1e-3);
}
