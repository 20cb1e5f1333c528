//! Interpreter that converts an L-System symbol sequence into a [`PlantBlueprint`].
//!
//! The entry point is [`TreeInterpreter`]. Configure it with an [`InterpreterConfig`],
//! optionally remap symbols via [`TreeInterpreter::set_symbol`], then call
//! [`TreeInterpreter::build_blueprint`] with a generated string. Derivations produced
//! by the Symbios engine are supported through [`TreeInterpreter::interpret_state`]
//! after registering ids with [`TreeInterpreter::populate_standard_symbols`].

use crate::assembler::segment_transform;
use crate::backend::TexturePalette;
use crate::blueprint::{Material, PartKind, PlacedInstance, PlantBlueprint};
use crate::tessellate::PrimitiveShape;
use crate::turtle::{STANDARD_SYMBOLS, TurtleOp, TurtleState};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f32::consts::TAU;
use symbios::{SymbiosState, SymbolTable};

/// How thick a segment is, as a function of its height above the plant's origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Thickness {
    /// The same thickness everywhere.
    Fixed(f32),
    /// `max(base - rate * height, min)`: thins linearly towards the crown.
    Taper { base: f32, rate: f32, min: f32 },
}

impl Thickness {
    /// Thickness of a segment starting `height` above the origin.
    pub fn at_height(self, height: f32) -> f32 {
        match self {
            Self::Fixed(thickness) => thickness,
            Self::Taper { base, rate, min } => (base - rate * height).max(min),
        }
    }
}

/// Geometry and look of one growable part.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartStyle {
    /// Segment length as a fraction of [`InterpreterConfig::segment_length`].
    pub length_scale: f32,
    /// Cross-section width of the emitted primitive.
    pub thickness: Thickness,
    /// Primitive stretched over each segment.
    pub shape: PrimitiveShape,
    /// Material of every emitted instance.
    pub material: Material,
}

/// The soil slab laid under a plant, sized in segment lengths.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroundStyle {
    /// Width and depth of the slab in segment lengths.
    pub extent: f32,
    /// Height of the slab in segment lengths.
    pub thickness: f32,
    /// Material of the slab.
    pub material: Material,
}

/// Placement of tree copies when a whole forest is grown from one template.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestLayout {
    /// Number of copies, evenly spaced around the circle.
    pub trees: usize,
    /// Circle radius in world units.
    pub radius: f32,
}

impl Default for ForestLayout {
    fn default() -> Self {
        Self {
            trees: 6,
            radius: 4.0,
        }
    }
}

impl ForestLayout {
    /// World offset of every copy, starting on +X and proceeding counter-clockwise
    /// seen from above.
    pub fn offsets(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..self.trees).map(move |i| {
            let angle = i as f32 * TAU / self.trees as f32;
            Vec3::new(self.radius * angle.cos(), 0.0, self.radius * angle.sin())
        })
    }
}

/// Configuration for plant interpretation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterpreterConfig {
    /// Rotation angle (in degrees) for Yaw/Pitch/Roll.
    pub angle_degrees: f32,
    /// Length of a full (trunk) segment.
    pub segment_length: f32,
    /// Where the turtle starts; also the reference height of the taper law.
    pub origin: Vec3,
    /// Maximum stack depth for push/pop operations.
    pub max_stack_depth: usize,
    /// Style of `F` segments.
    pub trunk: PartStyle,
    /// Style of `X` segments.
    pub branch: PartStyle,
    /// Style of `L` leaves.
    pub leaf: PartStyle,
    /// The slab laid under the plant and by `B`.
    pub ground: GroundStyle,
    /// Replicate the tree around [`InterpreterConfig::forest`].
    pub replicate_forest: bool,
    /// Ring of copies used when `replicate_forest` is set.
    pub forest: ForestLayout,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            angle_degrees: 25.0,
            segment_length: 0.1,
            origin: Vec3::new(0.0, -0.5, 0.0),
            max_stack_depth: 4096,
            trunk: PartStyle {
                length_scale: 1.0,
                thickness: Thickness::Taper {
                    base: 0.03,
                    rate: 0.01,
                    min: 0.01,
                },
                shape: PrimitiveShape::Cylinder,
                material: Material::bark(),
            },
            branch: PartStyle {
                length_scale: 0.5,
                thickness: Thickness::Taper {
                    base: 0.02,
                    rate: 0.01,
                    min: 0.005,
                },
                shape: PrimitiveShape::Cylinder,
                material: Material::bark(),
            },
            leaf: PartStyle {
                length_scale: 0.5,
                thickness: Thickness::Fixed(0.1),
                shape: PrimitiveShape::Cube,
                material: Material::leaf(),
            },
            ground: GroundStyle {
                extent: 10.0,
                thickness: 0.2,
                material: Material::soil(),
            },
            replicate_forest: false,
            forest: ForestLayout::default(),
        }
    }
}

impl InterpreterConfig {
    /// Binds the palette's textures into the part materials (builder pattern).
    pub fn with_textures(mut self, palette: &TexturePalette) -> Self {
        self.trunk.material = self.trunk.material.with_texture(palette.trunk);
        self.branch.material = self.branch.material.with_texture(palette.branch);
        self.leaf.material = self.leaf.material.with_texture(palette.leaf);
        self.ground.material = self.ground.material.with_texture(palette.ground);
        self
    }

    /// Style of a growable part. Ground has no segment style.
    pub fn part(&self, kind: PartKind) -> Option<&PartStyle> {
        match kind {
            PartKind::Trunk => Some(&self.trunk),
            PartKind::Branch => Some(&self.branch),
            PartKind::Leaf => Some(&self.leaf),
            PartKind::Ground => None,
        }
    }
}

/// Interprets L-System output to build a PlantBlueprint.
pub struct TreeInterpreter {
    symbols: HashMap<char, TurtleOp>,
    op_map: Vec<TurtleOp>,
    config: InterpreterConfig,
}

impl TreeInterpreter {
    /// Creates a new interpreter with the standard character symbols registered and an
    /// empty Symbios id map.
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            symbols: STANDARD_SYMBOLS.into_iter().collect(),
            op_map: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: InterpreterConfig) {
        self.config = config;
    }

    /// Assigns an operation to a character. Use [`TurtleOp::Ignore`] to turn a symbol
    /// into a pure rewriting variable.
    pub fn set_symbol(&mut self, symbol: char, op: TurtleOp) {
        self.symbols.insert(symbol, op);
    }

    /// The operation bound to `symbol`; unbound symbols are ignored.
    pub fn op_for(&self, symbol: char) -> TurtleOp {
        self.symbols
            .get(&symbol)
            .copied()
            .unwrap_or(TurtleOp::Ignore)
    }

    /// Replaces the entire Symbios id-to-operation map in one step (builder pattern).
    ///
    /// `map` is indexed by symbol ID as returned by [`symbios::SymbolTable`].
    /// Any ID that falls outside the slice is treated as [`TurtleOp::Ignore`].
    pub fn with_map(mut self, map: Vec<TurtleOp>) -> Self {
        self.op_map = map;
        self
    }

    /// Assigns a single [`TurtleOp`] to a Symbios symbol ID.
    ///
    /// The map is grown automatically when `sym_id` exceeds its current length;
    /// gaps are filled with [`TurtleOp::Ignore`].
    pub fn set_op(&mut self, sym_id: u16, op: TurtleOp) {
        let idx = sym_id as usize;
        if idx >= self.op_map.len() {
            self.op_map.resize(idx + 1, TurtleOp::Ignore);
        }
        self.op_map[idx] = op;
    }

    /// Registers the conventional mapping for every standard symbol found in `interner`.
    ///
    /// Symbols that are not present in the interner are silently skipped.
    pub fn populate_standard_symbols(&mut self, interner: &SymbolTable) {
        for (symbol, op) in STANDARD_SYMBOLS {
            if let Some(id) = interner.resolve_id(&symbol.to_string()) {
                self.set_op(id, op);
            }
        }
    }

    /// Walks `symbols` left to right and returns the placed instances of one plant.
    ///
    /// The turtle starts at [`InterpreterConfig::origin`] growing along `+Y`.
    ///
    /// # Geometry placement
    ///
    /// A grow symbol moves the turtle `segment_length × length_scale` along its grow
    /// direction and emits the part's primitive stretched over the travelled segment,
    /// with a thickness given by the part's [`Thickness`] at the segment's start height.
    ///
    /// # Push / Pop
    ///
    /// `[` saves a copy of the full turtle state; `]` restores the latest copy. A `]`
    /// with nothing saved does nothing, and pushes beyond `max_stack_depth` are dropped,
    /// so unbalanced input never aborts the walk.
    pub fn interpret(&self, symbols: &str) -> Vec<PlacedInstance> {
        self.walk(symbols.chars().map(|c| (self.op_for(c), None)))
    }

    /// Interprets a Symbios derivation.
    ///
    /// Parameter 0 of a grow or move symbol overrides its length; parameter 0 of a
    /// rotation symbol overrides the angle, in degrees.
    pub fn interpret_state(&self, state: &SymbiosState) -> Vec<PlacedInstance> {
        let ops = (0..state.len())
            .map_while(|i| state.get_view(i))
            .map(|view| {
                let op = self
                    .op_map
                    .get(view.sym as usize)
                    .copied()
                    .unwrap_or(TurtleOp::Ignore);
                (op, view.params.first().map(|&x| x as f32))
            });
        self.walk(ops)
    }

    /// Interprets `symbols` and lays the result out as a single tree or a forest.
    pub fn build_blueprint(&self, symbols: &str) -> PlantBlueprint {
        self.lay_out(self.interpret(symbols))
    }

    /// [`TreeInterpreter::build_blueprint`] for a Symbios derivation.
    pub fn build_blueprint_from_state(&self, state: &SymbiosState) -> PlantBlueprint {
        self.lay_out(self.interpret_state(state))
    }

    /// Places one tree's instances in the world and adds a single ground slab.
    ///
    /// With `replicate_forest` the tree is a template copied unchanged to every
    /// [`ForestLayout::offsets`] position, and the ground grows to cover the circle.
    ///
    /// Slabs laid by the `B` symbol are lifted out of the template. The first one fixes
    /// the height of the shared slab; without any, the slab sits at the turtle origin.
    /// Either way the blueprint ends with exactly one ground instance.
    pub fn lay_out(&self, tree: Vec<PlacedInstance>) -> PlantBlueprint {
        let (grounds, tree): (Vec<_>, Vec<_>) = tree
            .into_iter()
            .partition(|instance| instance.kind == PartKind::Ground);
        let surface = grounds.first().map_or(self.config.origin, |slab| {
            slab.transform.transform_point3(Vec3::new(0.0, 0.5, 0.0))
        });
        if grounds.len() > 1 {
            tracing::debug!(slabs = grounds.len(), "merged ground slabs into one");
        }

        let mut blueprint = PlantBlueprint::new();
        let ground_margin = if self.config.replicate_forest {
            let copies = self.config.forest.trees;
            blueprint.instances.reserve(tree.len() * copies + 1);
            for offset in self.config.forest.offsets() {
                let translation = Mat4::from_translation(offset);
                for instance in &tree {
                    blueprint.add_instance(instance.transformed(translation));
                }
            }
            2.0 * self.config.forest.radius
        } else {
            blueprint.instances = tree;
            0.0
        };

        blueprint.add_instance(self.ground(surface, ground_margin));

        tracing::debug!(
            instances = blueprint.len(),
            forest = self.config.replicate_forest,
            "laid out plant blueprint"
        );
        blueprint
    }

    fn walk<I>(&self, ops: I) -> Vec<PlacedInstance>
    where
        I: IntoIterator<Item = (TurtleOp, Option<f32>)>,
    {
        let config = &self.config;
        let mut instances = Vec::new();
        let mut turtle = TurtleState::at(config.origin);
        let mut stack: Vec<TurtleState> = Vec::new();
        let mut dropped_pushes = 0usize;

        for (op, param) in ops {
            let turn = |sign: f32| param.unwrap_or(config.angle_degrees).to_radians() * sign;

            match op {
                // --- GEOMETRY ---
                TurtleOp::Grow(kind) => match config.part(kind) {
                    Some(style) => {
                        let length =
                            param.unwrap_or(config.segment_length * style.length_scale);
                        let start = turtle.position;
                        turtle.advance(length);
                        let thickness = style.thickness.at_height(start.y - config.origin.y);

                        instances.push(PlacedInstance {
                            kind,
                            shape: style.shape,
                            transform: segment_transform(start, turtle.position, thickness),
                            material: style.material,
                        });
                    }
                    None => instances.push(self.ground(turtle.position, 0.0)),
                },
                TurtleOp::Ground => instances.push(self.ground(turtle.position, 0.0)),

                // --- SPATIAL ---
                TurtleOp::Move => turtle.advance(param.unwrap_or(config.segment_length)),
                TurtleOp::Yaw(s) => turtle.yaw(turn(s)),
                TurtleOp::Pitch(s) => turtle.pitch(turn(s)),
                TurtleOp::Roll(s) => turtle.roll(turn(s)),
                TurtleOp::TurnAround => turtle.turn_around(),

                // --- FLOW ---
                TurtleOp::Push => {
                    if stack.len() < config.max_stack_depth {
                        stack.push(turtle);
                    } else {
                        dropped_pushes += 1;
                    }
                }
                TurtleOp::Pop => {
                    if let Some(saved) = stack.pop() {
                        turtle = saved;
                    }
                }
                TurtleOp::Ignore => {}
            }
        }

        if dropped_pushes > 0 {
            tracing::warn!(
                dropped_pushes,
                max_stack_depth = config.max_stack_depth,
                "turtle stack full, pushes dropped"
            );
        }
        tracing::debug!(instances = instances.len(), "interpreted symbol string");
        instances
    }

    /// A ground slab whose top face is level with `surface`, widened by `margin`.
    fn ground(&self, surface: Vec3, margin: f32) -> PlacedInstance {
        let style = &self.config.ground;
        let width = self.config.segment_length * style.extent + margin;
        let size = Vec3::new(width, self.config.segment_length * style.thickness, width);
        let center = surface - Vec3::new(0.0, size.y / 2.0, 0.0);

        PlacedInstance {
            kind: PartKind::Ground,
            shape: PrimitiveShape::Cube,
            transform: Mat4::from_translation(center) * Mat4::from_scale(size),
            material: style.material,
        }
    }
}

/// Interprets `symbols` with the standard symbol table and default part styles.
pub fn interpret(symbols: &str, angle_degrees: f32, segment_length: f32) -> Vec<PlacedInstance> {
    TreeInterpreter::new(InterpreterConfig {
        angle_degrees,
        segment_length,
        ..Default::default()
    })
    .interpret(symbols)
}
