// tests/settings.rs
use glam::{Mat4, Vec3};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use symbios_grove::{
    ForestLayout, Grammar, Grove, GroveError, Material, PartKind, PrimitiveShape, RenderBackend,
    SceneGeometry, SceneShape, Settings, SettingsChange, TessellatedMesh, Tessellation,
    TessellationTable, TextureHandle, TreeParams,
};

#[derive(Default)]
struct Recorder {
    submitted: usize,
    requested: Vec<PathBuf>,
}

impl RenderBackend for Recorder {
    fn submit(&mut self, _mesh: &TessellatedMesh, _transform: &Mat4, _material: &Material) {
        self.submitted += 1;
    }

    fn request_texture(&mut self, path: &Path) -> TextureHandle {
        self.requested.push(path.to_path_buf());
        TextureHandle(self.requested.len() as u64)
    }
}

#[test]
fn test_slider_mapping() {
    let params = TreeParams::from_sliders(4, 5, 5);
    assert_eq!(params.iterations, 4);
    assert!((params.segment_length - 0.5).abs() < 1e-6);
    assert!((params.angle_degrees - 27.5).abs() < 1e-6);
    assert_eq!(TreeParams::default(), TreeParams::from_sliders(3, 5, 5));
}

#[test]
fn test_toml_fills_missing_keys_with_defaults() {
    let settings = Settings::from_toml_str(
        r#"
        max_iterations = 5
        near_plane = 0.5

        [tree]
        iterations = 4
        replicate_forest = true

        [plant_tessellation.cylinder]
        param1 = 2
        param2 = 8

        [textures]
        leaf = "textures/leaf.png"
        "#,
    )
    .unwrap();

    let defaults = Settings::default();
    assert_eq!(settings.max_iterations, 5);
    assert_eq!(settings.near_plane, 0.5);
    assert_eq!(settings.far_plane, defaults.far_plane);
    assert_eq!(settings.tree.iterations, 4);
    assert!(settings.tree.replicate_forest);
    assert_eq!(settings.tree.angle_degrees, defaults.tree.angle_degrees);
    assert_eq!(settings.plant_tessellation.cylinder, Tessellation::new(2, 8));
    assert_eq!(settings.plant_tessellation.cube, Tessellation::default());
    assert_eq!(settings.textures.leaf, Some(PathBuf::from("textures/leaf.png")));
    assert_eq!(settings.textures.trunk, None);

    assert_eq!(Settings::from_toml_str("").unwrap(), defaults);
}

#[test]
fn test_invalid_settings_are_rejected() {
    assert!(matches!(
        Settings::from_toml_str("[tree]\niterations = \"many\""),
        Err(GroveError::SettingsParse(_))
    ));

    let missing = std::env::temp_dir().join("symbios-grove-missing/settings.toml");
    match Settings::load(&missing) {
        Err(GroveError::SettingsIo { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn test_settings_round_trip_through_file() {
    let path = std::env::temp_dir().join(format!("symbios-grove-{}.toml", std::process::id()));
    std::fs::write(&path, "[tree]\ndense_leaves = true\n").unwrap();
    let settings = Settings::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(settings.tree.dense_leaves);
    assert_eq!(settings.max_iterations, 5);
}

#[test]
fn test_change_detection() {
    let old = Settings::default();
    assert!(SettingsChange::between(&old, &old.clone()).is_empty());

    let mut angle = old.clone();
    angle.tree.angle_degrees += 5.0;
    let change = SettingsChange::between(&old, &angle);
    assert!(change.plant && !change.grammar && !change.scene && !change.projection);

    let mut iterations = old.clone();
    iterations.tree.iterations += 1;
    let change = SettingsChange::between(&old, &iterations);
    assert!(change.grammar && change.plant);

    let mut leaves = old.clone();
    leaves.tree.dense_leaves = true;
    assert!(SettingsChange::between(&old, &leaves).grammar);

    let mut projection = old.clone();
    projection.far_plane = 50.0;
    assert_eq!(
        SettingsChange::between(&old, &projection),
        SettingsChange {
            projection: true,
            ..Default::default()
        }
    );

    let mut scene = old.clone();
    scene.scene_tessellation = Tessellation::new(4, 4);
    assert_eq!(
        SettingsChange::between(&old, &scene),
        SettingsChange {
            scene: true,
            ..Default::default()
        }
    );

    let mut textures = old.clone();
    textures.textures.trunk = Some(PathBuf::from("bark.png"));
    let change = SettingsChange::between(&old, &textures);
    assert!(change.textures && change.plant && !change.grammar);
}

#[test]
fn test_iterations_beyond_maximum_are_equivalent() {
    let mut old = Settings::default();
    old.max_iterations = 4;
    old.tree.iterations = 6;
    let mut new = old.clone();
    new.tree.iterations = 9;

    assert_eq!(old.bounded_iterations(), 4);
    assert!(!SettingsChange::between(&old, &new).grammar);
}

#[test]
fn test_grove_runs_every_stage() {
    let mut backend = Recorder::default();
    let grove = Grove::new(Settings::default(), &mut backend);

    assert_eq!(grove.symbols(), Grammar::tree(false).generate(3));
    assert_eq!(grove.plant_units().len(), grove.blueprint().len());
    assert_eq!(grove.blueprint().count(PartKind::Ground), 1);
    assert!(grove.scene_units().is_empty());
    assert!(backend.requested.is_empty());

    grove.submit(&mut backend);
    assert_eq!(backend.submitted, grove.blueprint().len());
}

#[test]
fn test_angle_change_reuses_symbols() {
    let mut backend = Recorder::default();
    let mut grove = Grove::new(Settings::default(), &mut backend);
    let symbols = grove.symbols().to_string();
    let before = grove.blueprint().clone();

    let mut new = grove.settings().clone();
    new.tree.angle_degrees = 40.0;
    let change = grove.apply_settings(new, &mut backend);

    assert!(change.plant && !change.grammar);
    assert_eq!(grove.symbols(), symbols);
    assert_eq!(grove.blueprint().len(), before.len());
    assert_ne!(grove.blueprint(), &before);
}

#[test]
fn test_forest_toggle_rebuilds_plant() {
    let mut backend = Recorder::default();
    let mut grove = Grove::new(Settings::default(), &mut backend);
    let single = grove.blueprint().len();

    let mut new = grove.settings().clone();
    new.tree.replicate_forest = true;
    grove.apply_settings(new, &mut backend);

    assert_eq!(grove.blueprint().len(), 6 * (single - 1) + 1);
    assert_eq!(grove.plant_units().len(), grove.blueprint().len());
}

#[test]
fn test_projection_change_leaves_geometry_alone() {
    let mut backend = Recorder::default();
    let mut grove = Grove::new(Settings::default(), &mut backend);
    let mesh = Arc::clone(&grove.plant_units()[0].mesh);

    let mut new = grove.settings().clone();
    new.near_plane = 0.01;
    let change = grove.apply_settings(new, &mut backend);

    assert!(change.projection && !change.plant && !change.scene);
    assert!(Arc::ptr_eq(&grove.plant_units()[0].mesh, &mesh));
    assert_eq!(grove.settings().near_plane, 0.01);
}

#[test]
fn test_iteration_count_is_clamped() {
    let mut settings = Settings::default();
    settings.max_iterations = 2;
    settings.tree.iterations = 7;

    let mut backend = Recorder::default();
    let grove = Grove::new(settings, &mut backend);
    assert_eq!(grove.symbols(), Grammar::tree(false).generate(2));
}

#[test]
fn test_texture_change_requests_and_binds() {
    let mut backend = Recorder::default();
    let mut grove = Grove::new(Settings::default(), &mut backend);

    let mut new = grove.settings().clone();
    new.textures.ground = Some(PathBuf::from("soil.png"));
    let change = grove.apply_settings(new, &mut backend);

    assert!(change.textures);
    assert_eq!(backend.requested, [PathBuf::from("soil.png")]);
    let ground = grove.blueprint().instances.last().unwrap();
    assert_eq!(ground.material.texture.map(|t| t.handle), Some(TextureHandle(1)));
}

#[test]
fn test_scene_follows_scene_tessellation() {
    let mut backend = Recorder::default();
    let mut grove = Grove::new(Settings::default(), &mut backend);
    grove.set_scene(vec![SceneShape {
        geometry: SceneGeometry::Primitive(PrimitiveShape::Sphere),
        transform: Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)),
        material: Material::default(),
    }]);
    assert_eq!(grove.scene_units()[0].mesh.triangle_count(), 2 * 12 * 12);

    let mut new = grove.settings().clone();
    new.scene_tessellation = Tessellation::new(3, 4);
    let change = grove.apply_settings(new, &mut backend);

    assert!(change.scene && !change.plant);
    assert_eq!(grove.scene_units()[0].mesh.triangle_count(), 2 * 3 * 4);
    assert_eq!(grove.units().count(), grove.blueprint().len() + 1);
}

#[test]
fn test_symbol_budget_lowers_iterations() {
    let mut settings = Settings::default();
    settings.tree.iterations = 5;
    settings.tree.dense_leaves = true;
    settings.max_symbols = Grammar::tree(true).expanded_len(3);
    assert_eq!(settings.effective_iterations(), 3);

    let mut backend = Recorder::default();
    let mut grove = Grove::new(settings.clone(), &mut backend);
    assert_eq!(grove.symbols(), Grammar::tree(true).generate(3));
    assert!(grove.symbols().len() <= settings.max_symbols);

    // Raising the budget lets the requested depth through.
    let mut roomier = settings.clone();
    roomier.max_symbols = 1_000_000;
    let change = grove.apply_settings(roomier, &mut backend);
    assert!(change.grammar);
    assert_eq!(grove.symbols(), Grammar::tree(true).generate(5));
}

#[test]
fn test_default_bounds_keep_deep_requests_small() {
    let mut settings = Settings::default();
    settings.tree.iterations = 8;
    settings.tree.dense_leaves = true;
    assert_eq!(settings.bounded_iterations(), 5);
    assert!(settings.grammar().expanded_len(settings.effective_iterations()) <= settings.max_symbols);
}

#[test]
fn test_forest_layout_comes_from_settings() {
    let settings = Settings::from_toml_str(
        r#"
        [tree]
        replicate_forest = true

        [forest]
        trees = 3
        "#,
    )
    .unwrap();
    assert_eq!(
        settings.forest,
        ForestLayout {
            trees: 3,
            radius: 4.0
        }
    );

    let mut backend = Recorder::default();
    let mut grove = Grove::new(settings, &mut backend);
    let tree = Grammar::tree(false).generate(3);
    let per_tree = grove.blueprint().count(PartKind::Trunk) / 3;
    assert_eq!(per_tree, tree.matches('F').count());
    assert_eq!(grove.blueprint().count(PartKind::Ground), 1);

    let mut wider = grove.settings().clone();
    wider.forest.radius = 8.0;
    let change = grove.apply_settings(wider, &mut backend);
    assert!(change.plant && !change.grammar);
    let ground = grove.blueprint().instances.last().unwrap();
    assert!(ground.transform.x_axis.x > 2.0 * 8.0);
}

#[test]
fn test_superseded_meshes_are_evicted() {
    let mut backend = Recorder::default();
    let mut grove = Grove::new(Settings::default(), &mut backend);
    // Cylinders for wood, one cube for the ground.
    assert_eq!(grove.assembler().cached_meshes(), 2);

    for n in 3..8 {
        let mut new = grove.settings().clone();
        new.plant_tessellation = TessellationTable::uniform(Tessellation::new(n, n));
        grove.apply_settings(new, &mut backend);
        assert_eq!(grove.assembler().cached_meshes(), 2);
    }
    let trunk = &grove.plant_units()[0].mesh;
    assert_eq!(trunk.triangle_count(), 6 * 7 * 7);

    grove.set_scene(vec![SceneShape {
        geometry: SceneGeometry::Primitive(PrimitiveShape::Sphere),
        transform: Mat4::IDENTITY,
        material: Material::default(),
    }]);
    assert_eq!(grove.assembler().cached_meshes(), 3);
    grove.set_scene(Vec::new());
    assert_eq!(grove.assembler().cached_meshes(), 2);
}
