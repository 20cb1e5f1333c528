//! # symbios-grove
//!
//! A procedural plant-geometry crate for [Symbios](https://crates.io/crates/symbios)-style
//! L-Systems that produces engine-agnostic, GPU-ready geometry.
//!
//! It decouples the *Genotype* (L-System String) from the *Phenotype* (placed meshes):
//! a [`Grammar`] is rewritten into a symbol string, a [`TreeInterpreter`] walks it with a
//! 3D turtle into a [`PlantBlueprint`], and a [`ShapeAssembler`] pairs every placed
//! instance with a cached [`TessellatedMesh`] for submission to any [`RenderBackend`].

pub mod assembler;
pub mod backend;
pub mod blueprint;
pub mod error;
pub mod grammar;
pub mod grove;
pub mod interpreter;
pub mod mesh;
pub mod settings;
pub mod tessellate;
pub mod turtle;

pub use assembler::*;
pub use backend::*;
pub use blueprint::*;
pub use error::{GroveError, Result};
pub use grammar::*;
pub use grove::*;
pub use interpreter::*;
pub use mesh::*;
pub use settings::*;
pub use tessellate::{PrimitiveShape, Tessellation, cone, cube, cylinder, sphere, tessellate};
pub use turtle::*;
