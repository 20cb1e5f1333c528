//! Tessellators for the canonical unit primitives.
//!
//! Every primitive is centred at the origin with extent `[-0.5, 0.5]` and its long axis
//! along Y. Tessellation parameters below a shape's minimum are raised to it, so a
//! request always yields a valid closed polyhedron.

mod cone;
mod cube;
mod cylinder;
mod sphere;

pub use cone::cone;
pub use cube::cube;
pub use cylinder::cylinder;
pub use sphere::sphere;

use crate::mesh::TessellatedMesh;
use bevy_math::primitives::{Cone, Cuboid, Cylinder, Measured3d, Sphere};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Primitive shapes the tessellators can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveShape {
    /// Unit cube.
    Cube,
    /// Cylinder of radius 0.5 and height 1, capped at both ends.
    Cylinder,
    /// Cone with a base of radius 0.5 at `y = -0.5` and its apex at `y = 0.5`.
    Cone,
    /// Sphere of radius 0.5.
    Sphere,
}

impl PrimitiveShape {
    /// Analytic surface area of the canonical primitive.
    pub fn surface_area(self) -> f32 {
        match self {
            Self::Cube => Cuboid::new(1.0, 1.0, 1.0).area(),
            Self::Cylinder => Cylinder::new(0.5, 1.0).area(),
            Self::Cone => Cone {
                radius: 0.5,
                height: 1.0,
            }
            .area(),
            Self::Sphere => Sphere::new(0.5).area(),
        }
    }

    /// Analytic volume of the canonical primitive.
    pub fn volume(self) -> f32 {
        match self {
            Self::Cube => Cuboid::new(1.0, 1.0, 1.0).volume(),
            Self::Cylinder => Cylinder::new(0.5, 1.0).volume(),
            Self::Cone => Cone {
                radius: 0.5,
                height: 1.0,
            }
            .volume(),
            Self::Sphere => Sphere::new(0.5).volume(),
        }
    }
}

/// Two subdivision counts, interpreted per shape.
///
/// | Shape | `param1` | `param2` |
/// |---|---|---|
/// | Cube | tiles per face edge (min 1) | unused |
/// | Cylinder | height segments (min 1) | radial segments (min 3) |
/// | Cone | height segments (min 1) | radial segments (min 3) |
/// | Sphere | phi slices (min 2) | theta slices (min 3) |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tessellation {
    pub param1: u32,
    pub param2: u32,
}

impl Tessellation {
    pub const fn new(param1: u32, param2: u32) -> Self {
        Self { param1, param2 }
    }

    /// Raises both parameters to the minimums of `shape`.
    pub fn clamped_for(self, shape: PrimitiveShape) -> Self {
        let (min1, min2) = match shape {
            PrimitiveShape::Cube => (1, 0),
            PrimitiveShape::Cylinder | PrimitiveShape::Cone => (1, 3),
            PrimitiveShape::Sphere => (2, 3),
        };
        Self::new(self.param1.max(min1), self.param2.max(min2))
    }
}

impl Default for Tessellation {
    fn default() -> Self {
        Self::new(12, 12)
    }
}

/// Tessellates `shape` with `tessellation`, clamping parameters as documented on
/// [`Tessellation`].
pub fn tessellate(shape: PrimitiveShape, tessellation: Tessellation) -> TessellatedMesh {
    let Tessellation { param1, param2 } = tessellation;
    match shape {
        PrimitiveShape::Cube => cube(param1),
        PrimitiveShape::Cylinder => cylinder(param1, param2),
        PrimitiveShape::Cone => cone(param1, param2),
        PrimitiveShape::Sphere => sphere(param1, param2),
    }
}

/// Angle of radial sample `i` out of `segments`.
fn theta(i: u32, segments: u32) -> f32 {
    i as f32 * TAU / segments as f32
}

/// Point on a horizontal circle of `radius` at angle `theta`, using the side-wall
/// convention `z = -sin θ` so that increasing θ winds counter-clockwise seen from +Y.
fn side_point(radius: f32, theta: f32, y: f32) -> Vec3 {
    Vec3::new(radius * theta.cos(), y, -radius * theta.sin())
}

/// U coordinate of a wrap-around texture at angle `theta`.
fn wrap_u(theta: f32) -> f32 {
    theta / TAU
}
