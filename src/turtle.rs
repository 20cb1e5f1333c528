//! Turtle state and operations for plant interpretation.

use crate::blueprint::PartKind;
use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// The state of the growth turtle.
///
/// Tracks position and an explicit orthonormal frame. The frame is right-handed with
/// `right = grow × forward`; every rotation re-derives the two vectors it did not rotate
/// so floating-point drift never accumulates across a long symbol string.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    /// Current world-space position of the "cursor".
    pub position: Vec3,

    /// Direction segments grow in. Starts as +Y.
    pub grow: Vec3,

    /// Heading perpendicular to growth. Starts as +Z.
    pub forward: Vec3,

    /// Completes the frame. Starts as +X.
    pub right: Vec3,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl TurtleState {
    /// A turtle at `position` with the canonical frame.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            grow: Vec3::Y,
            forward: Vec3::Z,
            right: Vec3::X,
        }
    }

    /// Advances along the grow direction by `distance`.
    pub fn advance(&mut self, distance: f32) {
        self.position += self.grow * distance;
    }

    /// Rotates the grow direction about the forward axis by `angle` radians (Yaw).
    pub fn yaw(&mut self, angle: f32) {
        self.grow = (rotation_about(self.forward, angle) * self.grow).normalize();
        self.right = self.grow.cross(self.forward).normalize();
        self.forward = self.right.cross(self.grow).normalize();
    }

    /// Rotates the grow direction about the right axis by `angle` radians (Pitch).
    pub fn pitch(&mut self, angle: f32) {
        self.grow = (rotation_about(self.right, angle) * self.grow).normalize();
        self.forward = self.right.cross(self.grow).normalize();
        self.right = self.grow.cross(self.forward).normalize();
    }

    /// Rotates the forward direction about the grow axis by `angle` radians (Roll).
    pub fn roll(&mut self, angle: f32) {
        self.forward = (rotation_about(self.grow, angle) * self.forward).normalize();
        self.right = self.grow.cross(self.forward).normalize();
        self.grow = self.forward.cross(self.right).normalize();
    }

    /// Spins the forward direction half a turn about the grow axis.
    pub fn turn_around(&mut self) {
        self.roll(PI);
    }
}

/// Rotation matrix for `angle` radians about `axis`, built with Rodrigues' formula.
///
/// `axis` need not be normalised. A zero axis yields the identity.
pub fn rotation_about(axis: Vec3, angle: f32) -> Mat3 {
    let Some(k) = axis.try_normalize() else {
        return Mat3::IDENTITY;
    };
    let (sin, cos) = angle.sin_cos();

    // Cross-product matrix [k]x, so that [k]x * v == k × v.
    let cross = Mat3::from_cols(
        Vec3::new(0.0, k.z, -k.y),
        Vec3::new(-k.z, 0.0, k.x),
        Vec3::new(k.y, -k.x, 0.0),
    );

    Mat3::IDENTITY + cross * sin + cross * cross * (1.0 - cos)
}

/// Operations that can be performed by the growth turtle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TurtleOp {
    // --- Geometry ---
    /// Grow one segment of the given part and move to its end (`F`, `X`, `L`).
    Grow(PartKind),
    /// Lay a ground slab beneath the turtle without moving (`B`).
    Ground,

    // --- Spatial Navigation ---
    /// Move along the grow direction without spawning geometry (`f`).
    Move,
    /// Rotate grow about forward (`+`/`-`).
    Yaw(f32),
    /// Rotate grow about right (`>`/`<`).
    Pitch(f32),
    /// Rotate forward about grow (`^`/`&`).
    Roll(f32),
    /// Turn 180 degrees about grow (`|`).
    TurnAround,

    // --- Flow Control ---
    /// Save the full turtle state onto the stack (`[`).
    Push,
    /// Restore the most recently pushed turtle state (`]`).
    Pop,
    /// No-op; the symbol has no registered meaning.
    Ignore,
}

/// The conventional symbol for every [`TurtleOp`] the standard tree grammar uses.
pub const STANDARD_SYMBOLS: [(char, TurtleOp); 14] = [
    // Geometry
    ('F', TurtleOp::Grow(PartKind::Trunk)),
    ('X', TurtleOp::Grow(PartKind::Branch)),
    ('L', TurtleOp::Grow(PartKind::Leaf)),
    ('B', TurtleOp::Ground),
    // Spatial
    ('f', TurtleOp::Move),
    ('+', TurtleOp::Yaw(1.0)),
    ('-', TurtleOp::Yaw(-1.0)),
    ('>', TurtleOp::Pitch(1.0)),
    ('<', TurtleOp::Pitch(-1.0)),
    ('^', TurtleOp::Roll(1.0)),
    ('&', TurtleOp::Roll(-1.0)),
    ('|', TurtleOp::TurnAround),
    // Flow
    ('[', TurtleOp::Push),
    (']', TurtleOp::Pop),
];
