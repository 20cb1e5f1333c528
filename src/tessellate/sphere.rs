use super::wrap_u;
use crate::mesh::{TessellatedMesh, Vertex};
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// Sphere of radius 0.5 on a latitude/longitude grid.
///
/// `phi_slices` (minimum 2) split the polar angle, `theta_slices` (minimum 3) the
/// azimuth. Every cell emits two triangles; cells touching a pole contain one
/// zero-area triangle.
pub fn sphere(phi_slices: u32, theta_slices: u32) -> TessellatedMesh {
    let phi_slices = phi_slices.max(2);
    let theta_slices = theta_slices.max(3);
    let mut mesh = TessellatedMesh::with_capacity(2 * (phi_slices * theta_slices) as usize);

    for t in 0..theta_slices {
        let theta0 = t as f32 / theta_slices as f32 * TAU;
        let theta1 = (t + 1) as f32 / theta_slices as f32 * TAU;

        for p in 0..phi_slices {
            let phi0 = p as f32 / phi_slices as f32 * PI;
            let phi1 = (p + 1) as f32 / phi_slices as f32 * PI;

            let a = vertex(phi0, theta0);
            let b = vertex(phi1, theta0);
            let c = vertex(phi1, theta1);
            let d = vertex(phi0, theta1);

            mesh.push_triangle(a, b, c);
            mesh.push_triangle(a, c, d);
        }
    }

    mesh
}

fn vertex(phi: f32, theta: f32) -> Vertex {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    let position = Vec3::new(
        0.5 * cos_theta * sin_phi,
        0.5 * cos_phi,
        -0.5 * sin_theta * sin_phi,
    );
    Vertex::new(
        position,
        position.normalize(),
        Vec2::new(wrap_u(theta), 1.0 - phi / PI),
    )
}
