//! Flat triangle-list meshes ready for upload.

use crate::error::{GroveError, Result};
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// One interleaved vertex: position, normal, UV (8 floats, 32 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: Vec3,
    /// Object-space unit normal.
    pub normal: Vec3,
    /// Texture coordinate.
    pub uv: Vec2,
}

impl Vertex {
    /// Number of `f32` values per vertex.
    pub const STRIDE: usize = 8;

    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// A fully expanded triangle list: every three consecutive vertices form one triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TessellatedMesh {
    vertices: Vec<Vertex>,
}

impl TessellatedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(triangles * 3),
        }
    }

    /// Builds a mesh from interleaved `[px, py, pz, nx, ny, nz, u, v]` floats, the layout a
    /// scene loader produces for imported meshes.
    pub fn from_interleaved(data: &[f32]) -> Result<Self> {
        if data.len() % Vertex::STRIDE != 0 {
            return Err(GroveError::MalformedVertexData {
                floats: data.len(),
                stride: Vertex::STRIDE,
            });
        }
        let vertex_count = data.len() / Vertex::STRIDE;
        if vertex_count % 3 != 0 {
            return Err(GroveError::IncompleteTriangle {
                vertices: vertex_count,
            });
        }

        let vertices = data
            .chunks_exact(Vertex::STRIDE)
            .map(|v| {
                Vertex::new(
                    Vec3::new(v[0], v[1], v[2]),
                    Vec3::new(v[3], v[4], v[5]),
                    Vec2::new(v[6], v[7]),
                )
            })
            .collect();
        Ok(Self { vertices })
    }

    /// Appends one triangle. Winding is taken as given.
    pub fn push_triangle(&mut self, a: Vertex, b: Vertex, c: Vertex) {
        self.vertices.extend([a, b, c]);
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates the triangles as vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> {
        self.vertices
            .chunks_exact(3)
            .map(|tri| [&tri[0], &tri[1], &tri[2]])
    }

    /// Sum of the triangle areas, degenerate triangles contributing zero.
    pub fn surface_area(&self) -> f32 {
        self.triangles()
            .map(|[a, b, c]| {
                0.5 * (b.position - a.position)
                    .cross(c.position - a.position)
                    .length()
            })
            .sum()
    }

    /// The vertex stream as raw bytes for a GPU buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
