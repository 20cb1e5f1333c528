use crate::tessellate::PrimitiveShape;
use glam::{Mat4, Vec4};
use serde::{Deserialize, Serialize};

/// Opaque handle to a texture owned by the renderer backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

/// The role a placed primitive plays in the plant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartKind {
    /// Full-length structural segment (`F`).
    Trunk,
    /// Half-length thinner segment (`X`).
    Branch,
    /// Foliage (`L`).
    Leaf,
    /// Soil slab beneath the plant or forest.
    Ground,
}

/// A texture bound to a material, with its blending and tiling factors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureBinding {
    pub handle: TextureHandle,
    /// Mix between the lit colour (0) and the texel colour (1).
    pub blend: f32,
    pub repeat_u: f32,
    pub repeat_v: f32,
}

impl TextureBinding {
    /// Binds `handle` fully blended with no tiling.
    pub fn new(handle: TextureHandle) -> Self {
        Self {
            handle,
            blend: 1.0,
            repeat_u: 1.0,
            repeat_v: 1.0,
        }
    }
}

/// Phong material of a placed primitive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub shininess: f32,
    pub texture: Option<TextureBinding>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec4::new(0.5, 0.5, 0.5, 1.0),
            diffuse: Vec4::new(0.5, 0.5, 0.5, 1.0),
            specular: Vec4::ONE,
            shininess: 16.0,
            texture: None,
        }
    }
}

impl Material {
    /// Brown bark used for trunks and branches.
    pub fn bark() -> Self {
        Self {
            ambient: Vec4::new(0.4, 0.3, 0.2, 1.0),
            diffuse: Vec4::new(0.5, 0.4, 0.3, 1.0),
            specular: Vec4::ONE,
            shininess: 32.0,
            texture: None,
        }
    }

    /// Saturated green foliage.
    pub fn leaf() -> Self {
        Self {
            ambient: Vec4::new(0.0, 0.8, 0.0, 1.0),
            diffuse: Vec4::new(0.1, 0.9, 0.1, 1.0),
            specular: Vec4::new(0.5, 0.5, 0.5, 1.0),
            shininess: 16.0,
            texture: None,
        }
    }

    /// Dark soil for the ground slab.
    pub fn soil() -> Self {
        Self {
            ambient: Vec4::new(0.2, 0.1, 0.0, 1.0),
            diffuse: Vec4::new(0.3, 0.2, 0.1, 1.0),
            specular: Vec4::new(0.1, 0.1, 0.1, 1.0),
            shininess: 16.0,
            texture: None,
        }
    }

    /// Returns this material with `texture` bound (builder pattern).
    pub fn with_texture(mut self, texture: Option<TextureBinding>) -> Self {
        self.texture = texture;
        self
    }
}

/// One primitive occurrence with its world transform and material.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedInstance {
    pub kind: PartKind,

    /// The canonical primitive this instance is drawn with.
    pub shape: PrimitiveShape,

    /// Maps the canonical primitive (extent ±0.5, long axis Y) into world space.
    pub transform: Mat4,

    pub material: Material,
}

impl PlacedInstance {
    /// This instance moved by the pre-multiplied world transform `offset`.
    pub fn transformed(&self, offset: Mat4) -> Self {
        Self {
            transform: offset * self.transform,
            ..*self
        }
    }
}

/// The complete, engine-agnostic geometry of a plant (or a forest of copies).
///
/// This is the "Phenotype" generated from an L-System: an ordered list of placed
/// primitives whose order is draw order only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantBlueprint {
    pub instances: Vec<PlacedInstance>,
}

impl PlantBlueprint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_instance(&mut self, instance: PlacedInstance) {
        self.instances.push(instance);
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Number of instances of the given kind.
    pub fn count(&self, kind: PartKind) -> usize {
        self.instances.iter().filter(|i| i.kind == kind).count()
    }
}
