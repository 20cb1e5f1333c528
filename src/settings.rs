//! User-facing generation settings and change detection.
//!
//! Regeneration is driven by comparing an explicit `(old, new)` pair of [`Settings`]
//! with [`SettingsChange::between`], so each stage only reruns when one of its inputs
//! actually moved.

use crate::assembler::TessellationTable;
use crate::backend::TexturePaths;
use crate::error::{GroveError, Result};
use crate::grammar::Grammar;
use crate::interpreter::ForestLayout;
use crate::tessellate::Tessellation;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Scale from the length slider to world units.
const LENGTH_PER_SLIDER_STEP: f32 = 0.1;

/// Scale from the angle slider to degrees.
const DEGREES_PER_SLIDER_STEP: f32 = 5.5;

/// Parameters of the procedural tree.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    /// Grammar generations.
    pub iterations: u32,
    pub angle_degrees: f32,
    pub segment_length: f32,
    /// Grow a ring of copies instead of a single tree.
    pub replicate_forest: bool,
    /// Use the grammar variant that ends every sub-branch in a leaf.
    pub dense_leaves: bool,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::from_sliders(3, 5, 5)
    }
}

impl TreeParams {
    /// Maps the renderer's integer sliders to tree parameters.
    pub fn from_sliders(iterations: u32, length_slider: u32, angle_slider: u32) -> Self {
        Self {
            iterations,
            angle_degrees: DEGREES_PER_SLIDER_STEP * angle_slider as f32,
            segment_length: LENGTH_PER_SLIDER_STEP * length_slider as f32,
            replicate_forest: false,
            dense_leaves: false,
        }
    }
}

/// Everything the generation pipeline reads from the outside world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tree: TreeParams,
    /// Upper bound applied to `tree.iterations` before rewriting.
    pub max_iterations: u32,
    /// Longest symbol string the grammar may produce; deeper iterations are dropped
    /// until the output fits.
    pub max_symbols: usize,
    /// Ring of copies grown when `tree.replicate_forest` is set.
    pub forest: ForestLayout,
    /// Tessellation of the procedural plant's primitives.
    pub plant_tessellation: TessellationTable,
    /// Tessellation shared by non-procedural scene primitives.
    pub scene_tessellation: Tessellation,
    pub near_plane: f32,
    pub far_plane: f32,
    pub textures: TexturePaths,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tree: TreeParams::default(),
            max_iterations: 5,
            max_symbols: 250_000,
            forest: ForestLayout::default(),
            plant_tessellation: TessellationTable::default(),
            scene_tessellation: Tessellation::default(),
            near_plane: 0.1,
            far_plane: 100.0,
            textures: TexturePaths::default(),
        }
    }
}

impl Settings {
    /// Parses settings from a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Loads settings from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| GroveError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Iteration count after applying `max_iterations`.
    pub fn bounded_iterations(&self) -> u32 {
        self.tree.iterations.min(self.max_iterations)
    }

    /// The tree grammar selected by `tree.dense_leaves`.
    pub fn grammar(&self) -> Grammar {
        Grammar::tree(self.tree.dense_leaves)
    }

    /// Iteration count actually rewritten: [`Settings::bounded_iterations`], lowered
    /// further until the output fits in `max_symbols`.
    pub fn effective_iterations(&self) -> u32 {
        self.grammar()
            .iterations_within(self.bounded_iterations(), self.max_symbols)
    }
}

/// Which pipeline stages a settings change invalidates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SettingsChange {
    /// The symbol string must be rewritten.
    pub grammar: bool,
    /// The symbol string must be re-interpreted and re-assembled.
    pub plant: bool,
    /// Scene primitives must be re-tessellated.
    pub scene: bool,
    /// The camera projection must be rebuilt.
    pub projection: bool,
    /// Textures must be requested again.
    pub textures: bool,
}

impl SettingsChange {
    /// Compares two settings snapshots.
    pub fn between(old: &Settings, new: &Settings) -> Self {
        let grammar = old.effective_iterations() != new.effective_iterations()
            || old.tree.dense_leaves != new.tree.dense_leaves;
        let textures = old.textures != new.textures;
        let plant = grammar
            || textures
            || old.tree.angle_degrees != new.tree.angle_degrees
            || old.tree.segment_length != new.tree.segment_length
            || old.tree.replicate_forest != new.tree.replicate_forest
            || old.forest != new.forest
            || old.plant_tessellation != new.plant_tessellation;

        Self {
            grammar,
            plant,
            scene: old.scene_tessellation != new.scene_tessellation,
            projection: old.near_plane != new.near_plane || old.far_plane != new.far_plane,
            textures,
        }
    }

    /// True when nothing needs to rerun.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
