use super::{side_point, theta, wrap_u};
use crate::mesh::{TessellatedMesh, Vertex};
use glam::{Vec2, Vec3};

/// Rise of the side-wall normal: radius / height of the canonical cone.
const SLOPE: f32 = 0.5;

/// Cone with a base of radius 0.5 at `y = -0.5` tapering to an apex at `y = 0.5`.
///
/// Each wedge is a stack of `height_segments` quads except the topmost slice, which is a
/// single triangle touching the apex. The base is one radial fan with a -Y normal.
pub fn cone(height_segments: u32, radial_segments: u32) -> TessellatedMesh {
    let height_segments = height_segments.max(1);
    let radial_segments = radial_segments.max(3);
    let mut mesh = TessellatedMesh::with_capacity(
        (2 * (height_segments - 1) * radial_segments + 2 * radial_segments) as usize,
    );

    for i in 0..radial_segments {
        wedge(
            &mut mesh,
            theta(i, radial_segments),
            theta(i + 1, radial_segments),
            height_segments,
        );
    }
    base(&mut mesh, radial_segments);

    mesh
}

/// Normal of the side wall at angle `theta`.
fn side_normal(theta: f32) -> Vec3 {
    (side_point(1.0, theta, 0.0) + Vec3::new(0.0, SLOPE, 0.0)).normalize()
}

/// Apex normal shared by the two wedge edges meeting at the tip.
///
/// The average of both side normals is flattened to the horizontal plane, renormalised,
/// then given the wall's slope again. This keeps the tip shading continuous across the
/// wedge instead of showing one seam per wedge.
fn apex_normal(left: Vec3, right: Vec3) -> Vec3 {
    let mut normal = (left + right).normalize();
    normal.y = 0.0;
    let mut normal = normal.normalize_or_zero();
    normal.y = SLOPE;
    normal.normalize()
}

fn wedge(mesh: &mut TessellatedMesh, theta0: f32, theta1: f32, height_segments: u32) {
    let height_step = 1.0 / height_segments as f32;
    let radius_step = 0.5 / height_segments as f32;
    let normal_left = side_normal(theta0);
    let normal_right = side_normal(theta1);
    let (u0, u1) = (wrap_u(theta0), wrap_u(theta1));

    for i in 0..height_segments {
        let y0 = i as f32 * height_step - 0.5;
        let y1 = (i + 1) as f32 * height_step - 0.5;
        let r0 = 0.5 - i as f32 * radius_step;
        let r1 = 0.5 - (i + 1) as f32 * radius_step;

        let bottom_left = Vertex::new(
            side_point(r0, theta0, y0),
            normal_left,
            Vec2::new(u0, y0 + 0.5),
        );
        let bottom_right = Vertex::new(
            side_point(r0, theta1, y0),
            normal_right,
            Vec2::new(u1, y0 + 0.5),
        );

        if i + 1 == height_segments {
            let apex = Vertex::new(
                Vec3::new(0.0, 0.5, 0.0),
                apex_normal(normal_left, normal_right),
                Vec2::new(0.5, 1.0),
            );
            mesh.push_triangle(apex, bottom_left, bottom_right);
        } else {
            let top_left = Vertex::new(
                side_point(r1, theta0, y1),
                normal_left,
                Vec2::new(u0, y1 + 0.5),
            );
            let top_right = Vertex::new(
                side_point(r1, theta1, y1),
                normal_right,
                Vec2::new(u1, y1 + 0.5),
            );
            mesh.push_triangle(top_left, bottom_left, bottom_right);
            mesh.push_triangle(top_left, bottom_right, top_right);
        }
    }
}

fn base(mesh: &mut TessellatedMesh, radial_segments: u32) {
    let center = Vertex::new(Vec3::new(0.0, -0.5, 0.0), Vec3::NEG_Y, Vec2::splat(0.5));
    let edge = |theta: f32| {
        let (sin, cos) = theta.sin_cos();
        Vertex::new(
            Vec3::new(0.5 * cos, -0.5, 0.5 * sin),
            Vec3::NEG_Y,
            Vec2::new(0.5 + 0.5 * cos, 0.5 + 0.5 * sin),
        )
    };

    for i in 0..radial_segments {
        mesh.push_triangle(
            center,
            edge(theta(i, radial_segments)),
            edge(theta(i + 1, radial_segments)),
        );
    }
}
