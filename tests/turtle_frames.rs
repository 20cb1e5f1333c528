// tests/turtle_frames.rs
use glam::{Mat3, Vec3};
use std::f32::consts::{FRAC_PI_2, PI};
use symbios_grove::{PartKind, STANDARD_SYMBOLS, TurtleOp, TurtleState, rotation_about};

fn assert_orthonormal(turtle: &TurtleState) {
    for axis in [turtle.grow, turtle.forward, turtle.right] {
        assert!((axis.length() - 1.0).abs() < 1e-5);
    }
    assert!(turtle.grow.dot(turtle.forward).abs() < 1e-5);
    assert!(turtle.grow.dot(turtle.right).abs() < 1e-5);
    assert!(turtle.forward.dot(turtle.right).abs() < 1e-5);
    assert!(
        turtle
            .right
            .abs_diff_eq(turtle.grow.cross(turtle.forward), 1e-5)
    );
}

#[test]
fn test_initial_frame() {
    let turtle = TurtleState::at(Vec3::new(0.0, -0.5, 0.0));
    assert_eq!(turtle.grow, Vec3::Y);
    assert_eq!(turtle.forward, Vec3::Z);
    assert_eq!(turtle.right, Vec3::X);
    assert_orthonormal(&turtle);
    assert_eq!(TurtleState::default().position, Vec3::ZERO);
}

#[test]
fn test_frame_stays_orthonormal_under_long_sequences() {
    let mut turtle = TurtleState::default();
    let angle = 25f32.to_radians();
    for i in 0..10_000 {
        match i % 7 {
            0 => turtle.yaw(angle),
            1 => turtle.pitch(-angle),
            2 => turtle.roll(angle),
            3 => turtle.pitch(angle * 0.3),
            4 => turtle.turn_around(),
            5 => turtle.yaw(-angle * 1.7),
            _ => turtle.advance(0.1),
        }
    }
    assert_orthonormal(&turtle);
}

#[test]
fn test_rotations_move_expected_axes() {
    let mut yawed = TurtleState::default();
    yawed.yaw(FRAC_PI_2);
    assert!(yawed.grow.abs_diff_eq(Vec3::NEG_X, 1e-6));
    assert!(yawed.forward.abs_diff_eq(Vec3::Z, 1e-6));
    assert_orthonormal(&yawed);

    let mut pitched = TurtleState::default();
    pitched.pitch(FRAC_PI_2);
    assert!(pitched.grow.abs_diff_eq(Vec3::Z, 1e-6));
    assert!(pitched.right.abs_diff_eq(Vec3::X, 1e-6));
    assert_orthonormal(&pitched);

    let mut rolled = TurtleState::default();
    rolled.roll(FRAC_PI_2);
    assert!(rolled.grow.abs_diff_eq(Vec3::Y, 1e-6));
    assert!(rolled.forward.abs_diff_eq(Vec3::X, 1e-6));
    assert_orthonormal(&rolled);
}

#[test]
fn test_turn_around_reverses_heading() {
    let mut turtle = TurtleState::default();
    turtle.turn_around();
    assert!(turtle.grow.abs_diff_eq(Vec3::Y, 1e-6));
    assert!(turtle.forward.abs_diff_eq(Vec3::NEG_Z, 1e-6));
    assert!(turtle.right.abs_diff_eq(Vec3::NEG_X, 1e-6));
}

#[test]
fn test_advance_follows_grow() {
    let mut turtle = TurtleState::default();
    turtle.advance(2.0);
    turtle.yaw(FRAC_PI_2);
    turtle.advance(1.0);
    assert!(turtle.position.abs_diff_eq(Vec3::new(-1.0, 2.0, 0.0), 1e-6));
}

#[test]
fn test_saved_state_is_restored_exactly() {
    let mut turtle = TurtleState::default();
    turtle.pitch(0.3);
    turtle.advance(1.0);
    let saved = turtle;

    turtle.yaw(1.1);
    turtle.roll(-0.4);
    turtle.advance(3.0);
    assert_ne!(turtle, saved);

    turtle = saved;
    assert_eq!(turtle, saved);
}

#[test]
fn test_rodrigues_rotation() {
    // Axis length does not matter.
    let rotation = rotation_about(Vec3::new(0.0, 0.0, 2.0), FRAC_PI_2);
    assert!((rotation * Vec3::X).abs_diff_eq(Vec3::Y, 1e-6));

    let axis = Vec3::new(1.0, 2.0, 3.0);
    let ours = rotation_about(axis, 0.7);
    let reference = Mat3::from_axis_angle(axis.normalize(), 0.7);
    assert!(ours.abs_diff_eq(reference, 1e-5));

    // Points on the axis are fixed, half a turn flips perpendicular vectors.
    assert!((ours * axis).abs_diff_eq(axis, 1e-5));
    assert!((rotation_about(Vec3::Y, PI) * Vec3::X).abs_diff_eq(Vec3::NEG_X, 1e-6));
}

#[test]
fn test_zero_axis_is_identity() {
    assert_eq!(rotation_about(Vec3::ZERO, 1.0), Mat3::IDENTITY);
}

#[test]
fn test_standard_symbol_table() {
    let lookup = |symbol: char| {
        STANDARD_SYMBOLS
            .iter()
            .find(|(c, _)| *c == symbol)
            .map(|(_, op)| *op)
    };

    assert_eq!(lookup('F'), Some(TurtleOp::Grow(PartKind::Trunk)));
    assert_eq!(lookup('X'), Some(TurtleOp::Grow(PartKind::Branch)));
    assert_eq!(lookup('L'), Some(TurtleOp::Grow(PartKind::Leaf)));
    assert_eq!(lookup('B'), Some(TurtleOp::Ground));
    assert_eq!(lookup('f'), Some(TurtleOp::Move));
    assert_eq!(lookup('+'), Some(TurtleOp::Yaw(1.0)));
    assert_eq!(lookup('-'), Some(TurtleOp::Yaw(-1.0)));
    assert_eq!(lookup('>'), Some(TurtleOp::Pitch(1.0)));
    assert_eq!(lookup('<'), Some(TurtleOp::Pitch(-1.0)));
    assert_eq!(lookup('^'), Some(TurtleOp::Roll(1.0)));
    assert_eq!(lookup('&'), Some(TurtleOp::Roll(-1.0)));
    assert_eq!(lookup('|'), Some(TurtleOp::TurnAround));
    assert_eq!(lookup('['), Some(TurtleOp::Push));
    assert_eq!(lookup(']'), Some(TurtleOp::Pop));
    assert_eq!(lookup('?'), None);
}
