//! Pairs placed instances with tessellated meshes to form renderable units.
//!
//! The entry point is [`ShapeAssembler`]. Meshes are cached by shape and tessellation,
//! so a forest of thousands of segments shares a handful of vertex buffers.

use crate::blueprint::{Material, PlacedInstance};
use crate::mesh::TessellatedMesh;
use crate::tessellate::{PrimitiveShape, Tessellation, tessellate};
use glam::{Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Below this `|direction × +Y|` the reference axis switches to +X.
const PARALLEL_EPSILON: f32 = 0.001;

/// Transform mapping the canonical primitive onto the segment `start → end`.
///
/// The primitive's long axis (Y, extent ±0.5) is scaled to the segment length and
/// aligned with `end - start`; X and Z are scaled to `thickness`. The canonical points
/// `(0, -0.5, 0)` and `(0, 0.5, 0)` land exactly on `start` and `end`, so consecutive
/// segments sharing an endpoint meet without gaps.
///
/// A zero-length segment has no direction. It keeps the identity orientation and
/// collapses to zero length at `start` instead of producing NaN.
pub fn segment_transform(start: Vec3, end: Vec3, thickness: f32) -> Mat4 {
    let offset = end - start;
    let Some(direction) = offset.try_normalize() else {
        return Mat4::from_scale_rotation_translation(
            Vec3::new(thickness, 0.0, thickness),
            Quat::IDENTITY,
            start,
        );
    };
    let length = offset.length();

    let reference = if direction.cross(Vec3::Y).length() < PARALLEL_EPSILON {
        Vec3::X
    } else {
        Vec3::Y
    };
    let right = reference.cross(direction).normalize();
    let up = direction.cross(right).normalize();

    let rotation = Mat4::from_cols(
        up.extend(0.0),
        direction.extend(0.0),
        right.extend(0.0),
        Vec4::W,
    );
    let scale = Mat4::from_scale(Vec3::new(thickness, length, thickness));
    let translation = Mat4::from_translation(start + direction * (0.5 * length));

    translation * rotation * scale
}

/// Tessellation used for each primitive shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationTable {
    pub cube: Tessellation,
    pub cylinder: Tessellation,
    pub cone: Tessellation,
    pub sphere: Tessellation,
}

impl Default for TessellationTable {
    fn default() -> Self {
        Self::uniform(Tessellation::default())
    }
}

impl TessellationTable {
    /// The same tessellation for every shape.
    pub fn uniform(tessellation: Tessellation) -> Self {
        Self {
            cube: tessellation,
            cylinder: tessellation,
            cone: tessellation,
            sphere: tessellation,
        }
    }

    pub fn for_shape(&self, shape: PrimitiveShape) -> Tessellation {
        match shape {
            PrimitiveShape::Cube => self.cube,
            PrimitiveShape::Cylinder => self.cylinder,
            PrimitiveShape::Cone => self.cone,
            PrimitiveShape::Sphere => self.sphere,
        }
    }
}

/// A mesh, its world transform and its material: one draw call.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderableUnit {
    pub mesh: Arc<TessellatedMesh>,
    pub transform: Mat4,
    pub material: Material,
}

/// Geometry of a non-procedural scene shape.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneGeometry {
    /// A canonical primitive, tessellated with the scene tessellation.
    Primitive(PrimitiveShape),
    /// Raw triangles supplied by a mesh loader.
    Mesh(Arc<TessellatedMesh>),
}

/// An already-parsed scene shape.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneShape {
    pub geometry: SceneGeometry,
    pub transform: Mat4,
    pub material: Material,
}

/// Builds renderable units, caching one mesh per `(shape, tessellation)`.
#[derive(Clone, Debug, Default)]
pub struct ShapeAssembler {
    tessellation: TessellationTable,
    cache: HashMap<(PrimitiveShape, Tessellation), Arc<TessellatedMesh>>,
}

impl ShapeAssembler {
    pub fn new(tessellation: TessellationTable) -> Self {
        Self {
            tessellation,
            cache: HashMap::new(),
        }
    }

    pub fn tessellation(&self) -> &TessellationTable {
        &self.tessellation
    }

    /// Changes the per-shape tessellation. Cached meshes stay valid because the cache
    /// key includes the tessellation.
    pub fn set_tessellation(&mut self, tessellation: TessellationTable) {
        self.tessellation = tessellation;
    }

    /// Number of distinct meshes generated so far.
    pub fn cached_meshes(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Drops every cached mesh for which `keep` returns false. Units that already
    /// hold a dropped mesh keep it alive until they are released.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(PrimitiveShape, Tessellation) -> bool,
    {
        let before = self.cache.len();
        self.cache
            .retain(|&(shape, tessellation), _| keep(shape, tessellation));
        let evicted = before - self.cache.len();
        if evicted > 0 {
            tracing::debug!(evicted, cached_meshes = self.cache.len(), "evicted meshes");
        }
    }

    /// The shared mesh for `shape` at `tessellation`, generated on first use.
    ///
    /// Parameters are clamped before lookup so requests that degrade to the same
    /// polyhedron share one entry.
    pub fn mesh(
        &mut self,
        shape: PrimitiveShape,
        tessellation: Tessellation,
    ) -> Arc<TessellatedMesh> {
        let key = (shape, tessellation.clamped_for(shape));
        if let Some(mesh) = self.cache.get(&key) {
            tracing::trace!(?shape, ?tessellation, "mesh cache hit");
            return Arc::clone(mesh);
        }

        let mesh = Arc::new(tessellate(key.0, key.1));
        tracing::debug!(
            ?shape,
            tessellation = ?key.1,
            triangles = mesh.triangle_count(),
            "tessellated primitive"
        );
        self.cache.insert(key, Arc::clone(&mesh));
        mesh
    }

    /// One renderable unit per instance, in instance order.
    pub fn assemble(&mut self, instances: &[PlacedInstance]) -> Vec<RenderableUnit> {
        let units: Vec<RenderableUnit> = instances
            .iter()
            .map(|instance| {
                let tessellation = self.tessellation.for_shape(instance.shape);
                RenderableUnit {
                    mesh: self.mesh(instance.shape, tessellation),
                    transform: instance.transform,
                    material: instance.material,
                }
            })
            .collect();

        tracing::debug!(
            units = units.len(),
            cached_meshes = self.cache.len(),
            "assembled instances"
        );
        units
    }

    /// One renderable unit per scene shape. Primitives share `tessellation`; raw meshes
    /// are passed through untouched.
    pub fn assemble_scene(
        &mut self,
        shapes: &[SceneShape],
        tessellation: Tessellation,
    ) -> Vec<RenderableUnit> {
        shapes
            .iter()
            .map(|shape| {
                let mesh = match &shape.geometry {
                    SceneGeometry::Primitive(primitive) => self.mesh(*primitive, tessellation),
                    SceneGeometry::Mesh(mesh) => Arc::clone(mesh),
                };
                RenderableUnit {
                    mesh,
                    transform: shape.transform,
                    material: shape.material,
                }
            })
            .collect()
    }
}
