use crate::mesh::{TessellatedMesh, Vertex};
use glam::{Vec2, Vec3};

/// Face corners as `(top_left, top_right, bottom_left, bottom_right)`, ordered so that
/// `(bottom_right - bottom_left) × (top_left - bottom_left)` points out of the cube.
const FACES: [[Vec3; 4]; 6] = [
    // +Z
    [
        Vec3::new(-0.5, 0.5, 0.5),
        Vec3::new(0.5, 0.5, 0.5),
        Vec3::new(-0.5, -0.5, 0.5),
        Vec3::new(0.5, -0.5, 0.5),
    ],
    // -Z
    [
        Vec3::new(0.5, 0.5, -0.5),
        Vec3::new(-0.5, 0.5, -0.5),
        Vec3::new(0.5, -0.5, -0.5),
        Vec3::new(-0.5, -0.5, -0.5),
    ],
    // -X
    [
        Vec3::new(-0.5, 0.5, -0.5),
        Vec3::new(-0.5, 0.5, 0.5),
        Vec3::new(-0.5, -0.5, -0.5),
        Vec3::new(-0.5, -0.5, 0.5),
    ],
    // +X
    [
        Vec3::new(0.5, 0.5, 0.5),
        Vec3::new(0.5, 0.5, -0.5),
        Vec3::new(0.5, -0.5, 0.5),
        Vec3::new(0.5, -0.5, -0.5),
    ],
    // +Y
    [
        Vec3::new(-0.5, 0.5, -0.5),
        Vec3::new(0.5, 0.5, -0.5),
        Vec3::new(-0.5, 0.5, 0.5),
        Vec3::new(0.5, 0.5, 0.5),
    ],
    // -Y
    [
        Vec3::new(-0.5, -0.5, 0.5),
        Vec3::new(0.5, -0.5, 0.5),
        Vec3::new(-0.5, -0.5, -0.5),
        Vec3::new(0.5, -0.5, -0.5),
    ],
];

/// Unit cube with every face split into `tiles × tiles` quads (minimum 1).
///
/// Faces do not share vertices; each carries its own constant outward normal. UVs run
/// from `(0, 1)` at a face's top-left corner to `(1, 0)` at its bottom-right.
pub fn cube(tiles: u32) -> TessellatedMesh {
    let tiles = tiles.max(1);
    let mut mesh = TessellatedMesh::with_capacity(6 * (tiles * tiles) as usize * 2);

    for [top_left, top_right, bottom_left, bottom_right] in FACES {
        let normal = (bottom_right - bottom_left)
            .cross(top_left - bottom_left)
            .normalize();
        let step = 1.0 / tiles as f32;

        for i in 0..tiles {
            let row = i as f32 * step;
            let next_row = (i + 1) as f32 * step;
            let left = top_left.lerp(bottom_left, row);
            let right = top_right.lerp(bottom_right, row);
            let next_left = top_left.lerp(bottom_left, next_row);
            let next_right = top_right.lerp(bottom_right, next_row);

            for j in 0..tiles {
                let col = j as f32 * step;
                let next_col = (j + 1) as f32 * step;

                let tl = Vertex::new(left.lerp(right, col), normal, Vec2::new(col, 1.0 - row));
                let tr = Vertex::new(
                    left.lerp(right, next_col),
                    normal,
                    Vec2::new(next_col, 1.0 - row),
                );
                let bl = Vertex::new(
                    next_left.lerp(next_right, col),
                    normal,
                    Vec2::new(col, 1.0 - next_row),
                );
                let br = Vertex::new(
                    next_left.lerp(next_right, next_col),
                    normal,
                    Vec2::new(next_col, 1.0 - next_row),
                );

                mesh.push_triangle(tl, bl, br);
                mesh.push_triangle(tl, br, tr);
            }
        }
    }

    mesh
}
