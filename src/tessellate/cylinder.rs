use super::{side_point, theta, wrap_u};
use crate::mesh::{TessellatedMesh, Vertex};
use glam::{Vec2, Vec3};

/// Capped cylinder of radius 0.5 spanning `y ∈ [-0.5, 0.5]`.
///
/// The side wall has `height_segments × radial_segments` quads with radial normals. Each
/// cap is split into `height_segments` concentric rings of `radial_segments` wedges so
/// its vertex density matches the wall; cap normals are a constant ±Y.
pub fn cylinder(height_segments: u32, radial_segments: u32) -> TessellatedMesh {
    let height_segments = height_segments.max(1);
    let radial_segments = radial_segments.max(3);
    let mut mesh =
        TessellatedMesh::with_capacity(6 * (height_segments * radial_segments) as usize);

    cap(&mut mesh, true, height_segments, radial_segments);
    for i in 0..radial_segments {
        wall_wedge(
            &mut mesh,
            theta(i, radial_segments),
            theta(i + 1, radial_segments),
            height_segments,
        );
    }
    cap(&mut mesh, false, height_segments, radial_segments);

    mesh
}

fn wall_wedge(mesh: &mut TessellatedMesh, theta0: f32, theta1: f32, height_segments: u32) {
    let step = 1.0 / height_segments as f32;
    let normal_left = side_point(1.0, theta0, 0.0);
    let normal_right = side_point(1.0, theta1, 0.0);
    let (u0, u1) = (wrap_u(theta0), wrap_u(theta1));

    for i in 0..height_segments {
        let y0 = i as f32 * step - 0.5;
        let y1 = (i + 1) as f32 * step - 0.5;

        let bottom_left = Vertex::new(
            side_point(0.5, theta0, y0),
            normal_left,
            Vec2::new(u0, y0 + 0.5),
        );
        let bottom_right = Vertex::new(
            side_point(0.5, theta1, y0),
            normal_right,
            Vec2::new(u1, y0 + 0.5),
        );
        let top_left = Vertex::new(
            side_point(0.5, theta0, y1),
            normal_left,
            Vec2::new(u0, y1 + 0.5),
        );
        let top_right = Vertex::new(
            side_point(0.5, theta1, y1),
            normal_right,
            Vec2::new(u1, y1 + 0.5),
        );

        mesh.push_triangle(top_left, bottom_left, bottom_right);
        mesh.push_triangle(top_left, bottom_right, top_right);
    }
}

fn cap(mesh: &mut TessellatedMesh, top: bool, rings: u32, radial_segments: u32) {
    let (y, normal) = if top { (0.5, Vec3::Y) } else { (-0.5, Vec3::NEG_Y) };
    let ring_width = 0.5 / rings as f32;
    // Mirrors V on the top cap so the texture reads the same way from outside.
    let v_sign = if top { -1.0 } else { 1.0 };

    let corner = |radius: f32, theta: f32| {
        let (sin, cos) = theta.sin_cos();
        Vertex::new(
            Vec3::new(radius * cos, y, radius * sin),
            normal,
            Vec2::new(0.5 + radius * cos, 0.5 + v_sign * radius * sin),
        )
    };

    for ring in 0..rings {
        let inner = ring as f32 * ring_width;
        let outer = (ring + 1) as f32 * ring_width;

        for i in 0..radial_segments {
            let theta0 = theta(i, radial_segments);
            let theta1 = theta(i + 1, radial_segments);
            let inner0 = corner(inner, theta0);
            let inner1 = corner(inner, theta1);
            let outer0 = corner(outer, theta0);
            let outer1 = corner(outer, theta1);

            if top {
                mesh.push_triangle(inner0, outer1, outer0);
                mesh.push_triangle(inner0, inner1, outer1);
            } else {
                mesh.push_triangle(inner0, outer0, outer1);
                mesh.push_triangle(inner0, outer1, inner1);
            }
        }
    }
}
