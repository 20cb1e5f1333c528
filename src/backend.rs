//! The boundary to the renderer that owns every GPU resource.

use crate::assembler::RenderableUnit;
use crate::blueprint::{Material, TextureBinding, TextureHandle};
use crate::mesh::TessellatedMesh;
use glam::Mat4;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A renderer that draws meshes and hands out texture handles.
///
/// The generation core never holds GPU state; it only passes geometry to `submit` and
/// stores the opaque handles returned by `request_texture`.
pub trait RenderBackend {
    /// Draws `mesh` with `transform` and `material`.
    fn submit(&mut self, mesh: &TessellatedMesh, transform: &Mat4, material: &Material);

    /// Loads (or looks up) the texture at `path`.
    fn request_texture(&mut self, path: &Path) -> TextureHandle;
}

/// Submits every unit in order.
pub fn submit_all<B: RenderBackend + ?Sized>(backend: &mut B, units: &[RenderableUnit]) {
    for unit in units {
        backend.submit(&unit.mesh, &unit.transform, &unit.material);
    }
}

/// Texture files for the plant parts. Any entry may be absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TexturePaths {
    pub ground: Option<PathBuf>,
    pub trunk: Option<PathBuf>,
    pub branch: Option<PathBuf>,
    pub leaf: Option<PathBuf>,
}

/// Texture bindings resolved through a backend, one per plant part.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TexturePalette {
    pub ground: Option<TextureBinding>,
    pub trunk: Option<TextureBinding>,
    pub branch: Option<TextureBinding>,
    pub leaf: Option<TextureBinding>,
}

impl TexturePalette {
    /// Requests every configured texture from `backend` once.
    pub fn request<B: RenderBackend + ?Sized>(backend: &mut B, paths: &TexturePaths) -> Self {
        let mut resolve = |path: &Option<PathBuf>| {
            path.as_deref()
                .map(|p| TextureBinding::new(backend.request_texture(p)))
        };

        Self {
            ground: resolve(&paths.ground),
            trunk: resolve(&paths.trunk),
            branch: resolve(&paths.branch),
            leaf: resolve(&paths.leaf),
        }
    }
}
