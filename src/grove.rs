//! The synchronous generation pipeline: grammar → turtle → assembler.
//!
//! [`Grove`] owns the latest results of every stage. Applying new [`Settings`] reruns
//! only the stages the change touches, and each rerun replaces its stage's output in
//! full before anything can be submitted.

use crate::assembler::{RenderableUnit, SceneGeometry, SceneShape, ShapeAssembler};
use crate::backend::{RenderBackend, TexturePalette, submit_all};
use crate::blueprint::PlantBlueprint;
use crate::interpreter::{InterpreterConfig, TreeInterpreter};
use crate::settings::{Settings, SettingsChange};
use crate::tessellate::{PrimitiveShape, Tessellation};
use std::collections::HashSet;

pub struct Grove {
    settings: Settings,
    palette: TexturePalette,
    interpreter: TreeInterpreter,
    assembler: ShapeAssembler,
    /// Rewritten string for the current grammar and iteration count.
    symbols: String,
    blueprint: PlantBlueprint,
    plant_units: Vec<RenderableUnit>,
    scene: Vec<SceneShape>,
    scene_units: Vec<RenderableUnit>,
}

impl Grove {
    /// Requests textures from `backend` and runs every stage once.
    pub fn new<B: RenderBackend + ?Sized>(settings: Settings, backend: &mut B) -> Self {
        let palette = TexturePalette::request(backend, &settings.textures);
        let interpreter = TreeInterpreter::new(interpreter_config(&settings, &palette));
        let assembler = ShapeAssembler::new(settings.plant_tessellation);

        let mut grove = Self {
            settings,
            palette,
            interpreter,
            assembler,
            symbols: String::new(),
            blueprint: PlantBlueprint::new(),
            plant_units: Vec::new(),
            scene: Vec::new(),
            scene_units: Vec::new(),
        };
        grove.rewrite();
        grove.regrow();
        grove
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The current L-System string.
    pub fn symbols(&self) -> &str {
        &self.symbols
    }

    pub fn blueprint(&self) -> &PlantBlueprint {
        &self.blueprint
    }

    pub fn assembler(&self) -> &ShapeAssembler {
        &self.assembler
    }

    /// Plant units followed by scene units.
    pub fn units(&self) -> impl Iterator<Item = &RenderableUnit> {
        self.plant_units.iter().chain(&self.scene_units)
    }

    pub fn plant_units(&self) -> &[RenderableUnit] {
        &self.plant_units
    }

    pub fn scene_units(&self) -> &[RenderableUnit] {
        &self.scene_units
    }

    /// Replaces the non-procedural scene shapes and assembles them.
    pub fn set_scene(&mut self, shapes: Vec<SceneShape>) {
        self.scene = shapes;
        self.reassemble_scene();
        self.evict_stale_meshes();
    }

    /// Moves to `new` settings, rerunning only the stages that changed.
    ///
    /// The returned [`SettingsChange`] also tells the caller whether to rebuild its
    /// projection matrix, which lives outside this crate.
    pub fn apply_settings<B: RenderBackend + ?Sized>(
        &mut self,
        new: Settings,
        backend: &mut B,
    ) -> SettingsChange {
        let change = SettingsChange::between(&self.settings, &new);
        self.settings = new;
        if change.is_empty() {
            return change;
        }

        if change.textures {
            self.palette = TexturePalette::request(backend, &self.settings.textures);
        }
        if change.plant {
            self.interpreter
                .set_config(interpreter_config(&self.settings, &self.palette));
            self.assembler
                .set_tessellation(self.settings.plant_tessellation);
        }
        if change.grammar {
            self.rewrite();
        }
        if change.plant {
            self.regrow();
        }
        if change.scene {
            self.reassemble_scene();
        }
        if change.plant || change.scene {
            self.evict_stale_meshes();
        }

        tracing::info!(?change, "applied settings");
        change
    }

    /// Submits every unit to `backend`.
    pub fn submit<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        submit_all(backend, &self.plant_units);
        submit_all(backend, &self.scene_units);
    }

    fn rewrite(&mut self) {
        let requested = self.settings.tree.iterations;
        let bounded = self.settings.bounded_iterations();
        if bounded < requested {
            tracing::warn!(
                requested,
                max_iterations = self.settings.max_iterations,
                "iteration count clamped"
            );
        }
        let iterations = self.settings.effective_iterations();
        if iterations < bounded {
            tracing::warn!(
                requested = bounded,
                iterations,
                max_symbols = self.settings.max_symbols,
                "symbol budget exceeded, iteration count lowered"
            );
        }
        self.symbols = self.settings.grammar().generate(iterations);
    }

    fn regrow(&mut self) {
        self.blueprint = self.interpreter.build_blueprint(&self.symbols);
        self.plant_units = self.assembler.assemble(&self.blueprint.instances);
    }

    fn reassemble_scene(&mut self) {
        self.scene_units = self
            .assembler
            .assemble_scene(&self.scene, self.settings.scene_tessellation);
    }

    /// Keeps only the meshes the current blueprint and scene draw with.
    fn evict_stale_meshes(&mut self) {
        let plant = self.settings.plant_tessellation;
        let scene = self.settings.scene_tessellation;
        let mut live: HashSet<(PrimitiveShape, Tessellation)> = self
            .blueprint
            .instances
            .iter()
            .map(|instance| instance.shape)
            .map(|shape| (shape, plant.for_shape(shape).clamped_for(shape)))
            .collect();
        live.extend(self.scene.iter().filter_map(|shape| match shape.geometry {
            SceneGeometry::Primitive(primitive) => Some((primitive, scene.clamped_for(primitive))),
            SceneGeometry::Mesh(_) => None,
        }));
        self.assembler
            .retain(|shape, tessellation| live.contains(&(shape, tessellation)));
    }
}

fn interpreter_config(settings: &Settings, palette: &TexturePalette) -> InterpreterConfig {
    InterpreterConfig {
        angle_degrees: settings.tree.angle_degrees,
        segment_length: settings.tree.segment_length,
        replicate_forest: settings.tree.replicate_forest,
        forest: settings.forest,
        ..Default::default()
    }
    .with_textures(palette)
}
