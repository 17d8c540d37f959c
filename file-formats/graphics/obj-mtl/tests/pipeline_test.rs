use obj_mtl::{
    MaterialNameResolver, MaterialPipeline, ObjMtlError, RescaleEngine, RescaleOutcome,
    ShaderLibrary, SkipReason, TargetUnit, TextureIndex,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const RANKIN: &str = "\
# Blender export
o Rankin
v 100.0 0.0 -50.0
v 0.0 200.0 0.0
v 1.0 2.0 3.0
vt 0.0 1.0
vn 0.0 0.0 1.0
usemtl Rock_01.skin
f 1/1/1 2/1/1 3/1/1
usemtl Hull_Plate
f 1/1/1 3/1/1 2/1/1
usemtl Moss
f 2/1/1 3/1/1 1/1/1
usemtl Rock_01.skin
f 3/1/1 2/1/1 1/1/1
";

/// Asset tree with a map directory and a texture directory next to it
struct Fixture {
    _dir: TempDir,
    root: PathBuf,
    mesh: PathBuf,
}

impl Fixture {
    fn new(mesh_text: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let root = dir.path().to_path_buf();

        let textures = root.join("assets/textures");
        fs::create_dir_all(&textures).unwrap();
        fs::write(textures.join("Rock_01.png"), b"").unwrap();
        fs::write(textures.join("hull_base.tga"), b"").unwrap();
        fs::write(textures.join("hull_alpha.dds"), b"").unwrap();

        let shaders = root.join("assets/shaders");
        fs::create_dir_all(&shaders).unwrap();
        fs::write(
            shaders.join("Hull_Plate.props.txt"),
            "Diffuse=Texture'ShipPkg.Hull.Hull_Base'\nOpacity=Texture'ShipPkg.Hull.Hull_Alpha'\n",
        )
        .unwrap();

        let maps = root.join("maps");
        fs::create_dir_all(&maps).unwrap();
        let mesh = maps.join("rankin.obj");
        fs::write(&mesh, mesh_text).unwrap();

        Self {
            _dir: dir,
            root,
            mesh,
        }
    }

    fn assets(&self) -> PathBuf {
        self.root.join("assets")
    }

    fn sibling(&self, name: &str) -> PathBuf {
        self.mesh.with_file_name(name)
    }
}

fn run(fixture: &Fixture, unit: TargetUnit) -> obj_mtl::Result<obj_mtl::ProcessReport> {
    let roots = [fixture.assets()];
    let textures = TextureIndex::build(&roots)?;
    let shaders = ShaderLibrary::scan(&roots)?;
    let resolver = MaterialNameResolver::new(&textures).with_shaders(&shaders);
    MaterialPipeline::new(resolver, RescaleEngine::new(unit)).process_file(&fixture.mesh)
}

fn material_blocks(mtl: &str) -> Vec<&str> {
    mtl.lines()
        .filter_map(|line| line.strip_prefix("newmtl "))
        .collect()
}

#[test]
fn test_process_writes_all_outputs() {
    let fixture = Fixture::new(RANKIN);
    let report = run(&fixture, TargetUnit::Centimeters).unwrap();

    assert_eq!(report.material_count, 3);
    assert_eq!(report.missing_materials, ["Moss"]);
    assert!(report.mesh_rewritten);
    assert_eq!(
        report.rescale,
        RescaleOutcome::Applied {
            vertices_scaled: 3,
            malformed_vertices: 0
        }
    );

    let mtl = fs::read_to_string(&report.material_path).unwrap();
    assert_eq!(report.material_path, fixture.sibling("rankin.mtl"));
    assert_eq!(material_blocks(&mtl), ["Hull_Plate", "Moss", "Rock_01.skin"]);
    assert!(mtl.contains("map_Kd ../assets/textures/Rock_01.png\n"), "{mtl}");
    assert!(mtl.contains("map_Kd ../assets/textures/hull_base.tga\n"), "{mtl}");
    assert!(mtl.contains("map_d ../assets/textures/hull_alpha.dds\n"), "{mtl}");

    let missing = fs::read_to_string(fixture.sibling("rankin_missing_materials.txt")).unwrap();
    assert_eq!(missing, "Moss\n");
    assert_eq!(
        report.missing_report_path,
        Some(fixture.sibling("rankin_missing_materials.txt"))
    );

    let mesh = fs::read_to_string(&fixture.mesh).unwrap();
    let mut lines = mesh.lines();
    assert_eq!(lines.next(), Some("# UT2_SCALED_TO_CENTIMETERS = 1.905"));
    assert_eq!(lines.next(), Some("mtllib rankin.mtl"));
    assert_eq!(lines.next(), Some("# Blender export"));
    assert!(mesh.contains("\nv 190.5 0 -95.25\n"), "{mesh}");
    assert!(mesh.contains("\nvt 0.0 1.0\nvn 0.0 0.0 1.0\n"));
}

#[test]
fn test_second_run_is_a_no_op() {
    let fixture = Fixture::new(RANKIN);
    run(&fixture, TargetUnit::Meters).unwrap();
    let mesh_once = fs::read_to_string(&fixture.mesh).unwrap();
    let mtl_once = fs::read_to_string(fixture.sibling("rankin.mtl")).unwrap();

    let report = run(&fixture, TargetUnit::Meters).unwrap();
    assert!(!report.mesh_rewritten);
    assert_eq!(
        report.rescale,
        RescaleOutcome::Skipped(SkipReason::MaterialLibraryPresent)
    );
    assert_eq!(fs::read_to_string(&fixture.mesh).unwrap(), mesh_once);
    assert_eq!(
        fs::read_to_string(fixture.sibling("rankin.mtl")).unwrap(),
        mtl_once
    );
    assert_eq!(mesh_once.matches("UT2_SCALED_TO_").count(), 1);
}

#[test]
fn test_existing_mtllib_is_not_rescaled() {
    let text = "mtllib custom.mtl\nv 1.0 2.0 3.0\nusemtl Rock_01\n";
    let fixture = Fixture::new(text);
    let report = run(&fixture, TargetUnit::Meters).unwrap();

    assert!(!report.mesh_rewritten);
    assert_eq!(fs::read_to_string(&fixture.mesh).unwrap(), text);
    // Materials are still generated
    assert!(fixture.sibling("rankin.mtl").exists());
}

#[test]
fn test_no_report_when_everything_resolves() {
    let fixture = Fixture::new("v 0 0 0\nusemtl Rock_01\nusemtl Hull_Plate\n");
    let report_path = fixture.sibling("rankin_missing_materials.txt");
    fs::write(&report_path, "Stale\n").unwrap();

    let report = run(&fixture, TargetUnit::Meters).unwrap();
    assert!(report.missing_materials.is_empty());
    assert_eq!(report.missing_report_path, None);
    assert!(!report_path.exists());
}

#[test]
fn test_unresolved_material_has_no_map() {
    let fixture = Fixture::new("usemtl Granite\n");
    run(&fixture, TargetUnit::Uu).unwrap();

    let mtl = fs::read_to_string(fixture.sibling("rankin.mtl")).unwrap();
    assert_eq!(
        mtl,
        "newmtl Granite\nKa 1.000 1.000 1.000\nKd 1.000 1.000 1.000\nKs 0.000 0.000 0.000\nd 1.0\nillum 2\n\n"
    );
}

#[test]
fn test_missing_input() {
    let fixture = Fixture::new("");
    let missing = fixture.sibling("absent.obj");
    let textures = TextureIndex::new();
    let pipeline = MaterialPipeline::new(
        MaterialNameResolver::new(&textures),
        RescaleEngine::new(TargetUnit::Meters),
    );

    match pipeline.process_file(&missing) {
        Err(ObjMtlError::InputNotFound(path)) => assert_eq!(path, missing),
        other => panic!("expected InputNotFound, got {other:?}"),
    }
    assert!(!fixture.sibling("absent.mtl").exists());
}

#[test]
fn test_cached_index_resolves_same_as_scan() {
    let fixture = Fixture::new(RANKIN);
    let cache = fixture.root.join("texture_cache.json");
    let roots = [fixture.assets()];

    let built = TextureIndex::load_or_build(&cache, &roots, false).unwrap();
    let loaded = TextureIndex::load(&cache).unwrap().unwrap();
    assert_eq!(built, loaded);
    assert!(loaded.lookup("rock_01").is_some_and(|p| Path::new(p).exists()));
}
